use crate::feeds::FeedSet;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// The flat settings record of one site build.
///
/// Every option is optional in the source; missing options take the generator's
/// defaults. Unknown options are rejected so that a typo never passes silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    // --- Identity ---
    pub author: String,
    pub sitename: String,
    pub siteurl: String,
    pub banner_subtitle: Option<String>,
    pub locale: String,
    pub timezone: String,
    pub default_lang: String,
    pub default_date_format: String,

    // --- Content layout ---
    pub path: PathBuf,
    #[serde(deserialize_with = "one_or_many")]
    pub markup: Vec<String>,
    pub static_paths: Vec<String>,
    pub direct_templates: Vec<String>,
    pub plugin_paths: Vec<PathBuf>,
    pub plugins: Vec<String>,
    pub theme: String,
    pub publications_src: Option<PathBuf>,

    // --- URL patterns ---
    pub article_url: String,
    pub article_save_as: String,
    pub page_url: String,
    pub page_save_as: String,
    pub tags_url: String,

    // --- Feeds ---
    #[serde(deserialize_with = "feed_toggle")]
    pub feed_all_atom: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub feed_all_rss: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub category_feed_atom: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub category_feed_rss: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub tag_feed_atom: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub tag_feed_rss: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub author_feed_atom: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub author_feed_rss: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub translation_feed_atom: Option<String>,
    #[serde(deserialize_with = "feed_toggle")]
    pub translation_feed_rss: Option<String>,
    pub rss_feed_summary_only: bool,
    pub feed_max_items: Option<u32>,

    // --- Navigation ---
    pub links: Vec<Link>,
    pub social: Vec<Link>,
    pub menuitems: Vec<Link>,
    pub display_pages_on_menu: bool,
    pub display_categories_on_menu: bool,
    pub display_breadcrumbs: bool,
    pub display_category_in_breadcrumbs: bool,

    // --- Presentation ---
    pub default_pagination: u32,
    pub pygments_style: String,
    pub typogrify: bool,
    pub tag_cloud_max_items: u32,
    pub related_posts_max: u32,
    pub hide_sidebar: bool,
    pub show_article_author: bool,
    pub display_article_info_on_index: bool,
    pub display_tags_inline: bool,
    pub cc_license: Option<String>,
    pub math_jax: BTreeMap<String, String>,

    // --- Integrations ---
    pub twitter_username: Option<String>,
    pub twitter_widget_id: Option<String>,
    pub piwik_url: Option<String>,
    pub piwik_site_id: Option<u32>,
    pub shariff: bool,
    pub shariff_lang: Option<String>,
    pub shariff_theme: Option<String>,
    pub shariff_services: Option<String>,
    pub rmd_reader_rename_plot: Option<String>,
    pub rmd_reader_knitr_opts_chunk: BTreeMap<String, String>,

    // --- Build behaviour ---
    pub load_content_cache: bool,
    pub delete_output_directory: bool,
    pub relative_urls: bool,
}

impl SiteSettings {
    /// Feeds whose option holds an output path.
    #[must_use]
    pub fn enabled_feeds(&self) -> FeedSet {
        self.feed_slots().into_iter().filter(|(_, path)| path.is_some()).map(|(f, _)| f).collect()
    }

    /// Output path pattern of a single feed, `None` when disabled.
    ///
    /// Passing a set with more than one flag yields `None`.
    #[must_use]
    pub fn feed_path(&self, feed: FeedSet) -> Option<&str> {
        self.feed_slots().into_iter().find(|(f, _)| *f == feed).and_then(|(_, path)| path)
    }

    fn feed_slots(&self) -> [(FeedSet, Option<&str>); 10] {
        [
            (FeedSet::FEED_ALL_ATOM, self.feed_all_atom.as_deref()),
            (FeedSet::FEED_ALL_RSS, self.feed_all_rss.as_deref()),
            (FeedSet::CATEGORY_FEED_ATOM, self.category_feed_atom.as_deref()),
            (FeedSet::CATEGORY_FEED_RSS, self.category_feed_rss.as_deref()),
            (FeedSet::TAG_FEED_ATOM, self.tag_feed_atom.as_deref()),
            (FeedSet::TAG_FEED_RSS, self.tag_feed_rss.as_deref()),
            (FeedSet::AUTHOR_FEED_ATOM, self.author_feed_atom.as_deref()),
            (FeedSet::AUTHOR_FEED_RSS, self.author_feed_rss.as_deref()),
            (FeedSet::TRANSLATION_FEED_ATOM, self.translation_feed_atom.as_deref()),
            (FeedSet::TRANSLATION_FEED_RSS, self.translation_feed_rss.as_deref()),
        ]
    }

    #[must_use]
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p == name)
    }
}

/// A `[label, url]` pair used by menus, the blogroll and the social widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "(String, String)")]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self { label: label.into(), url: url.into() }
    }
}

impl TryFrom<Vec<String>> for Link {
    type Error = String;

    fn try_from(pair: Vec<String>) -> Result<Self, Self::Error> {
        match <[String; 2]>::try_from(pair) {
            Ok([label, url]) => Ok(Self { label, url }),
            Err(other) => Err(format!(
                "expected a [label, url] pair, found {} element(s)",
                other.len()
            )),
        }
    }
}

impl From<Link> for (String, String) {
    fn from(link: Link) -> Self {
        (link.label, link.url)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.label, self.url)
    }
}

/// Immutable, cheaply clonable handle to the loaded settings.
///
/// Built once at startup and passed by reference (or clone) to every consumer.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    inner: Arc<SiteSettings>,
}

impl Settings {
    #[must_use]
    pub fn new(settings: SiteSettings) -> Self {
        Self { inner: Arc::new(settings) }
    }
}

impl From<SiteSettings> for Settings {
    fn from(settings: SiteSettings) -> Self {
        Self::new(settings)
    }
}

impl Deref for Settings {
    type Target = SiteSettings;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<SiteSettings> for Settings {
    fn as_ref(&self) -> &SiteSettings {
        &self.inner
    }
}

// --- Deserialization helpers ---

/// Accepts `"md"` as well as `["md", "rst"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(one) => vec![one],
        OneOrMany::Many(many) => many,
    })
}

/// A feed option holds its output path; `false`, `""` and null disable it.
///
/// Environment overrides arrive as text, so `"false"` and `"true"` are read
/// like the booleans.
fn feed_toggle<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Toggle {
        Path(String),
        Flag(bool),
    }

    let flag = match Option::<Toggle>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Toggle::Flag(flag)) => flag,
        Some(Toggle::Path(path)) if path.trim().is_empty() => return Ok(None),
        Some(Toggle::Path(path)) if path.eq_ignore_ascii_case("false") => false,
        Some(Toggle::Path(path)) if path.eq_ignore_ascii_case("true") => true,
        Some(Toggle::Path(path)) => return Ok(Some(path)),
    };

    if flag {
        Err(de::Error::custom("a feed is enabled by giving its output path, not `true`"))
    } else {
        Ok(None)
    }
}

// --- Default ---

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            author: String::new(),
            sitename: "A Pelican Blog".to_owned(),
            siteurl: String::new(),
            banner_subtitle: None,
            locale: String::new(),
            timezone: "UTC".to_owned(),
            default_lang: "en".to_owned(),
            default_date_format: "%a %d %B %Y".to_owned(),

            path: PathBuf::from("content"),
            markup: vec!["rst".to_owned(), "md".to_owned()],
            static_paths: vec!["images".to_owned()],
            direct_templates: ["index", "tags", "categories", "authors", "archives"]
                .map(str::to_owned)
                .to_vec(),
            plugin_paths: Vec::new(),
            plugins: Vec::new(),
            theme: "notmyidea".to_owned(),
            publications_src: None,

            article_url: "{slug}.html".to_owned(),
            article_save_as: "{slug}.html".to_owned(),
            page_url: "pages/{slug}.html".to_owned(),
            page_save_as: "pages/{slug}.html".to_owned(),
            tags_url: "tags.html".to_owned(),

            feed_all_atom: Some("feeds/all.atom.xml".to_owned()),
            feed_all_rss: None,
            category_feed_atom: Some("feeds/{slug}.atom.xml".to_owned()),
            category_feed_rss: None,
            tag_feed_atom: None,
            tag_feed_rss: None,
            author_feed_atom: Some("feeds/{slug}.atom.xml".to_owned()),
            author_feed_rss: Some("feeds/{slug}.rss.xml".to_owned()),
            translation_feed_atom: Some("feeds/all-{lang}.atom.xml".to_owned()),
            translation_feed_rss: None,
            rss_feed_summary_only: true,
            feed_max_items: None,

            links: Vec::new(),
            social: Vec::new(),
            menuitems: Vec::new(),
            display_pages_on_menu: true,
            display_categories_on_menu: true,
            display_breadcrumbs: false,
            display_category_in_breadcrumbs: false,

            default_pagination: 0,
            pygments_style: "default".to_owned(),
            typogrify: false,
            tag_cloud_max_items: 100,
            related_posts_max: 5,
            hide_sidebar: false,
            show_article_author: false,
            display_article_info_on_index: false,
            display_tags_inline: false,
            cc_license: None,
            math_jax: BTreeMap::new(),

            twitter_username: None,
            twitter_widget_id: None,
            piwik_url: None,
            piwik_site_id: None,
            shariff: false,
            shariff_lang: None,
            shariff_theme: None,
            shariff_services: None,
            rmd_reader_rename_plot: None,
            rmd_reader_knitr_opts_chunk: BTreeMap::new(),

            load_content_cache: false,
            delete_output_directory: false,
            relative_urls: false,
        }
    }
}
