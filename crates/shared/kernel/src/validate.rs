//! Consistency checks run after the record has been deserialized.
//!
//! Types are already enforced by the schema; these checks catch values that
//! are well-typed but would break the build.

use crate::error::SettingsError;
use crate::feeds::{describe, slot_count};
use crate::url::{UrlTemplate, is_valid_strftime};
use fxhash::FxHashSet;
use obs_domain::config::{Link, SiteSettings};
use obs_domain::constants as opt;
use std::fmt;

/// One problem found in the record, tagged with the option it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub option: &'static str,
    pub message: String,
}

impl Issue {
    fn new(option: &'static str, message: impl Into<String>) -> Self {
        Self { option, message: message.into() }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.option, self.message)
    }
}

/// Returns every problem in `settings`; an empty list means the record is usable.
#[must_use]
pub fn validate(settings: &SiteSettings) -> Vec<Issue> {
    let mut issues = Vec::new();

    check_identity(settings, &mut issues);
    check_plugins(settings, &mut issues);
    check_links(opt::LINKS, &settings.links, &mut issues);
    check_links(opt::SOCIAL, &settings.social, &mut issues);
    check_links(opt::MENUITEMS, &settings.menuitems, &mut issues);
    check_templates(settings, &mut issues);
    check_feeds(settings, &mut issues);
    check_integrations(settings, &mut issues);

    issues
}

/// Like [`validate`], but folds the issues into a [`SettingsError::Invalid`].
///
/// # Errors
/// Returns [`SettingsError::Invalid`] when at least one issue is found.
pub fn ensure_valid(settings: &SiteSettings) -> Result<(), SettingsError> {
    let issues = validate(settings);
    if issues.is_empty() { Ok(()) } else { Err(SettingsError::Invalid { issues, context: None }) }
}

fn check_identity(settings: &SiteSettings, issues: &mut Vec<Issue>) {
    for (option, value) in [
        (opt::SITENAME, &settings.sitename),
        (opt::DEFAULT_LANG, &settings.default_lang),
        (opt::TIMEZONE, &settings.timezone),
        (opt::THEME, &settings.theme),
        (opt::PYGMENTS_STYLE, &settings.pygments_style),
    ] {
        if value.trim().is_empty() {
            issues.push(Issue::new(option, "must not be empty"));
        }
    }

    if settings.timezone.contains(char::is_whitespace) {
        issues.push(Issue::new(opt::TIMEZONE, "must be a zone name such as `Europe/Paris`"));
    }

    let url = settings.siteurl.as_str();
    if !url.is_empty() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(Issue::new(opt::SITEURL, "must be empty or an absolute http(s) URL"));
        }
        if url.ends_with('/') {
            issues.push(Issue::new(opt::SITEURL, "must not end with `/`"));
        }
    }

    if !is_valid_strftime(&settings.default_date_format) {
        issues.push(Issue::new(
            opt::DEFAULT_DATE_FORMAT,
            format!("`{}` is not a valid strftime pattern", settings.default_date_format),
        ));
    }

    if settings.markup.is_empty() {
        issues.push(Issue::new(opt::MARKUP, "at least one markup format is required"));
    }
}

fn check_plugins(settings: &SiteSettings, issues: &mut Vec<Issue>) {
    let mut seen = FxHashSet::default();
    for name in &settings.plugins {
        if name.trim().is_empty() {
            issues.push(Issue::new(opt::PLUGINS, "plugin names must not be empty"));
        } else if !seen.insert(name.as_str()) {
            issues.push(Issue::new(opt::PLUGINS, format!("`{name}` is listed more than once")));
        }
    }
}

fn check_links(option: &'static str, links: &[Link], issues: &mut Vec<Issue>) {
    for (index, link) in links.iter().enumerate() {
        if link.label.trim().is_empty() {
            issues.push(Issue::new(option, format!("entry {index} has an empty label")));
        }
        if link.url.trim().is_empty() {
            let message = format!("entry {index} (`{}`) has an empty URL", link.label);
            issues.push(Issue::new(option, message));
        }
    }
}

fn check_templates(settings: &SiteSettings, issues: &mut Vec<Issue>) {
    let templates = [
        (opt::ARTICLE_URL, &settings.article_url, false),
        (opt::ARTICLE_SAVE_AS, &settings.article_save_as, true),
        (opt::PAGE_URL, &settings.page_url, false),
        (opt::PAGE_SAVE_AS, &settings.page_save_as, true),
        (opt::TAGS_URL, &settings.tags_url, false),
    ];

    for (option, template, is_output_path) in templates {
        if let Err(err) = UrlTemplate::parse(template) {
            issues.push(Issue::new(option, err.to_string()));
            continue;
        }
        if is_output_path && let Some(problem) = output_path_problem(template) {
            issues.push(Issue::new(option, problem));
        }
    }
}

fn check_feeds(settings: &SiteSettings, issues: &mut Vec<Issue>) {
    for feed in settings.enabled_feeds().iter() {
        let (Some(option), Some(pattern), Some((scope, _))) =
            (feed.option_name(), settings.feed_path(feed), describe(feed))
        else {
            continue;
        };

        let found = slot_count(scope, pattern);
        let expected = scope.expected_slots();
        if found != expected {
            let message = match scope.placeholder() {
                Some(placeholder) => format!(
                    "`{pattern}` needs exactly one `%s` or `{placeholder}`, found {found}"
                ),
                None => format!("`{pattern}` is a site-wide feed and takes no substitution"),
            };
            issues.push(Issue::new(option, message));
        }

        if let Some(problem) = output_path_problem(pattern) {
            issues.push(Issue::new(option, problem));
        }
    }

    if settings.feed_max_items == Some(0) {
        issues.push(Issue::new(
            opt::FEED_MAX_ITEMS,
            "must be at least 1 (omit it to include every item)",
        ));
    }
}

fn check_integrations(settings: &SiteSettings, issues: &mut Vec<Issue>) {
    match (&settings.piwik_url, settings.piwik_site_id) {
        (Some(_), None) => {
            issues.push(Issue::new(opt::PIWIK_SITE_ID, "required when PIWIK_URL is set"));
        },
        (None, Some(_)) => {
            issues.push(Issue::new(opt::PIWIK_URL, "required when PIWIK_SITE_ID is set"));
        },
        (Some(url), Some(_)) if url.contains("://") => issues.push(Issue::new(
            opt::PIWIK_URL,
            "must be a bare host such as `analytics.example.org`, without a scheme",
        )),
        _ => {},
    }

    if settings.twitter_widget_id.is_some() && settings.twitter_username.is_none() {
        issues.push(Issue::new(opt::TWITTER_USERNAME, "required when TWITTER_WIDGET_ID is set"));
    }

    if settings.shariff && settings.shariff_services.is_none() {
        issues.push(Issue::new(opt::SHARIFF_SERVICES, "required when SHARIFF is enabled"));
    }
}

/// Output paths are joined onto the output directory and must stay inside it.
fn output_path_problem(path: &str) -> Option<&'static str> {
    if path.starts_with('/') {
        Some("must be relative to the output directory")
    } else if path.split('/').any(|segment| segment == "..") {
        Some("must not contain `..`")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(issues: &[Issue]) -> Vec<&'static str> {
        issues.iter().map(|i| i.option).collect()
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate(&SiteSettings::default()), []);
    }

    #[test]
    fn empty_sitename_is_reported() {
        let settings = SiteSettings { sitename: "  ".to_owned(), ..SiteSettings::default() };
        assert_eq!(options(&validate(&settings)), [opt::SITENAME]);
    }

    #[test]
    fn siteurl_must_be_absolute_without_trailing_slash() {
        let relative =
            SiteSettings { siteurl: "obs.example".to_owned(), ..SiteSettings::default() };
        assert_eq!(options(&validate(&relative)), [opt::SITEURL]);

        let trailing =
            SiteSettings { siteurl: "https://obs.example/".to_owned(), ..SiteSettings::default() };
        assert_eq!(options(&validate(&trailing)), [opt::SITEURL]);

        let good =
            SiteSettings { siteurl: "https://obs.example".to_owned(), ..SiteSettings::default() };
        assert!(validate(&good).is_empty());
    }

    #[test]
    fn duplicate_plugin_is_reported() {
        let settings = SiteSettings {
            plugins: vec!["render_math".to_owned(), "render_math".to_owned()],
            ..SiteSettings::default()
        };
        let issues = validate(&settings);
        assert_eq!(options(&issues), [opt::PLUGINS]);
        assert!(issues[0].message.contains("render_math"));
    }

    #[test]
    fn bad_template_and_escaping_save_as_are_reported() {
        let settings = SiteSettings {
            article_url: "{title}/".to_owned(),
            page_save_as: "../{slug}.html".to_owned(),
            ..SiteSettings::default()
        };
        assert_eq!(options(&validate(&settings)), [opt::ARTICLE_URL, opt::PAGE_SAVE_AS]);
    }

    #[test]
    fn per_item_feed_needs_one_slot() {
        let settings = SiteSettings {
            tag_feed_rss: Some("feeds/tags.rss.xml".to_owned()),
            feed_all_rss: Some("feeds/%s.rss.xml".to_owned()),
            ..SiteSettings::default()
        };
        let issues = validate(&settings);
        assert_eq!(options(&issues), ["FEED_ALL_RSS", "TAG_FEED_RSS"]);
    }

    #[test]
    fn paired_integrations_are_checked() {
        let settings = SiteSettings {
            piwik_url: Some("analytics.nomics.world".to_owned()),
            twitter_widget_id: Some("573544104640049152".to_owned()),
            shariff: true,
            ..SiteSettings::default()
        };
        assert_eq!(
            options(&validate(&settings)),
            [opt::PIWIK_SITE_ID, opt::TWITTER_USERNAME, opt::SHARIFF_SERVICES]
        );
    }

    #[test]
    fn empty_link_parts_are_reported() {
        let settings = SiteSettings {
            links: vec![Link::new("", "https://db.nomics.world/")],
            menuitems: vec![Link::new("About", " ")],
            ..SiteSettings::default()
        };
        assert_eq!(options(&validate(&settings)), [opt::LINKS, opt::MENUITEMS]);
    }

    #[test]
    fn ensure_valid_wraps_issues() {
        let settings = SiteSettings { default_lang: String::new(), ..SiteSettings::default() };
        let err = ensure_valid(&settings).expect_err("invalid");
        assert_eq!(options(err.issues()), [opt::DEFAULT_LANG]);
        assert!(err.to_string().contains("DEFAULT_LANG: must not be empty"));
    }
}
