use anyhow::Result;
use obs_kernel::config::SettingsLoader;
use obs_kernel::feeds::FeedPlan;

/// Lists every enabled feed with its output pattern.
///
/// # Errors
/// Returns an error if the settings cannot be loaded.
pub fn run(loader: &SettingsLoader) -> Result<()> {
    let settings = loader.load()?;
    let plan = FeedPlan::from_settings(&settings);

    if plan.is_empty() {
        println!("No feeds enabled.");
        return Ok(());
    }

    for request in &plan {
        println!(
            "{:<22} {:<4} {:<11} {}",
            request.option_name(),
            request.format.as_ref(),
            request.scope.as_ref(),
            request.pattern
        );
    }

    let items = plan.max_items().map_or_else(|| "all".to_owned(), |n| n.to_string());
    let content = if plan.summary_only() { "summaries" } else { "full content" };
    println!("{} feed(s), {items} item(s) each, {content}", plan.len());

    Ok(())
}
