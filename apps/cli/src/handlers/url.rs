use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use obs_kernel::config::SettingsLoader;
use obs_kernel::domain::constants as opt;
use obs_kernel::url::{UrlContext, UrlTemplate};

/// Prints where a piece of content is linked from and written to.
///
/// # Errors
/// Returns an error if the settings cannot be loaded or a pattern needs a
/// value that was not given (typically `--date` for dated article URLs).
pub fn run(
    loader: &SettingsLoader,
    slug: &str,
    page: bool,
    date: Option<NaiveDate>,
    lang: Option<&str>,
) -> Result<()> {
    let settings = loader.load()?;

    let patterns = if page {
        [(opt::PAGE_URL, &settings.page_url), (opt::PAGE_SAVE_AS, &settings.page_save_as)]
    } else {
        [
            (opt::ARTICLE_URL, &settings.article_url),
            (opt::ARTICLE_SAVE_AS, &settings.article_save_as),
        ]
    };

    let mut ctx = UrlContext::with_slug(slug).lang(lang.unwrap_or(&settings.default_lang));
    if let Some(date) = date {
        ctx = ctx.date(date.and_time(NaiveTime::MIN));
    }

    let [url, save_as] = patterns.map(|(option, pattern)| {
        UrlTemplate::parse(pattern)
            .and_then(|template| template.render(&ctx))
            .with_context(|| format!("Cannot render {option} `{pattern}`"))
    });

    println!("url      {}", url?);
    println!("save_as  {}", save_as?);

    Ok(())
}
