//! Option names as the site generator spells them.

pub const AUTHOR: &str = "AUTHOR";
pub const SITENAME: &str = "SITENAME";
pub const SITEURL: &str = "SITEURL";
pub const TIMEZONE: &str = "TIMEZONE";
pub const DEFAULT_LANG: &str = "DEFAULT_LANG";
pub const DEFAULT_DATE_FORMAT: &str = "DEFAULT_DATE_FORMAT";

pub const PATH: &str = "PATH";
pub const MARKUP: &str = "MARKUP";
pub const STATIC_PATHS: &str = "STATIC_PATHS";
pub const PLUGIN_PATHS: &str = "PLUGIN_PATHS";
pub const PLUGINS: &str = "PLUGINS";
pub const THEME: &str = "THEME";
pub const PUBLICATIONS_SRC: &str = "PUBLICATIONS_SRC";

pub const ARTICLE_URL: &str = "ARTICLE_URL";
pub const ARTICLE_SAVE_AS: &str = "ARTICLE_SAVE_AS";
pub const PAGE_URL: &str = "PAGE_URL";
pub const PAGE_SAVE_AS: &str = "PAGE_SAVE_AS";
pub const TAGS_URL: &str = "TAGS_URL";

pub const LINKS: &str = "LINKS";
pub const SOCIAL: &str = "SOCIAL";
pub const MENUITEMS: &str = "MENUITEMS";

pub const FEED_MAX_ITEMS: &str = "FEED_MAX_ITEMS";

pub const DEFAULT_PAGINATION: &str = "DEFAULT_PAGINATION";
pub const PYGMENTS_STYLE: &str = "PYGMENTS_STYLE";

pub const TWITTER_USERNAME: &str = "TWITTER_USERNAME";
pub const TWITTER_WIDGET_ID: &str = "TWITTER_WIDGET_ID";
pub const PIWIK_URL: &str = "PIWIK_URL";
pub const PIWIK_SITE_ID: &str = "PIWIK_SITE_ID";
pub const SHARIFF: &str = "SHARIFF";
pub const SHARIFF_SERVICES: &str = "SHARIFF_SERVICES";

/// Themes shipped with the generator, resolved without a directory lookup.
pub const BUILTIN_THEMES: &[&str] = &["notmyidea", "simple"];
