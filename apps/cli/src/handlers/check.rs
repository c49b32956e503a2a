use anyhow::{Context, Result};
use obs_kernel::config::SettingsLoader;
use obs_kernel::locate::ThemeLocation;
use std::path::Path;
use tracing::info;

/// Loads and validates the settings, then prints a short summary.
///
/// # Errors
/// Returns an error if the settings cannot be loaded or fail validation, or if
/// `with_locations` is set and the theme or a plugin is missing.
pub fn run(loader: SettingsLoader, file: &Path, with_locations: bool) -> Result<()> {
    let loader = if with_locations {
        // Relative paths in the settings are relative to the file itself.
        let base = file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        info!(base = %base.display(), "Locating theme and plugins");
        loader.locate(base)
    } else {
        loader
    };

    let (settings, located) =
        loader.load_located().with_context(|| format!("{} is not usable", file.display()))?;

    println!("{}: OK", file.display());
    println!("  site       {}", settings.sitename);
    println!("  theme      {}", settings.theme);
    println!("  plugins    {}", settings.plugins.len());
    println!("  feeds      {}", settings.enabled_feeds().iter().count());
    println!("  pagination {}", settings.default_pagination);

    if let Some(located) = located {
        match &located.theme {
            ThemeLocation::Builtin(name) => println!("  theme at   (built-in {name})"),
            ThemeLocation::Directory(dir) => println!("  theme at   {}", dir.display()),
        }
        for plugin in &located.plugins {
            println!("  plugin     {} -> {}", plugin.name, plugin.path.display());
        }
    }

    Ok(())
}
