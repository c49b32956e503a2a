//! The list of feeds a build will ask the generator for.

use obs_domain::config::SiteSettings;
use obs_domain::feeds::FeedSet;
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::debug;

/// Python-style substitution slot accepted in per-item feed paths.
const PERCENT_SLOT: &str = "%s";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FeedFormat {
    Atom,
    Rss,
}

/// What one feed file covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FeedScope {
    All,
    Category,
    Tag,
    Author,
    Translation,
}

impl FeedScope {
    /// Named placeholder replaced by the item name, `None` for site-wide feeds.
    #[must_use]
    pub const fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Category | Self::Tag | Self::Author => Some("{slug}"),
            Self::Translation => Some("{lang}"),
        }
    }

    /// Number of substitution slots a path for this scope must contain.
    #[must_use]
    pub const fn expected_slots(self) -> usize {
        if self.placeholder().is_some() { 1 } else { 0 }
    }
}

/// Scope and format of a single feed flag.
#[must_use]
pub fn describe(feed: FeedSet) -> Option<(FeedScope, FeedFormat)> {
    const TABLE: [(FeedSet, FeedScope, FeedFormat); 10] = [
        (FeedSet::FEED_ALL_ATOM, FeedScope::All, FeedFormat::Atom),
        (FeedSet::FEED_ALL_RSS, FeedScope::All, FeedFormat::Rss),
        (FeedSet::CATEGORY_FEED_ATOM, FeedScope::Category, FeedFormat::Atom),
        (FeedSet::CATEGORY_FEED_RSS, FeedScope::Category, FeedFormat::Rss),
        (FeedSet::TAG_FEED_ATOM, FeedScope::Tag, FeedFormat::Atom),
        (FeedSet::TAG_FEED_RSS, FeedScope::Tag, FeedFormat::Rss),
        (FeedSet::AUTHOR_FEED_ATOM, FeedScope::Author, FeedFormat::Atom),
        (FeedSet::AUTHOR_FEED_RSS, FeedScope::Author, FeedFormat::Rss),
        (FeedSet::TRANSLATION_FEED_ATOM, FeedScope::Translation, FeedFormat::Atom),
        (FeedSet::TRANSLATION_FEED_RSS, FeedScope::Translation, FeedFormat::Rss),
    ];

    TABLE.iter().find(|(flag, _, _)| *flag == feed).map(|(_, scope, format)| (*scope, *format))
}

/// Counts the substitution slots (`%s` or the scope's placeholder) in `pattern`.
#[must_use]
pub fn slot_count(scope: FeedScope, pattern: &str) -> usize {
    let named = scope.placeholder().map_or(0, |p| pattern.matches(p).count());
    pattern.matches(PERCENT_SLOT).count() + named
}

/// One feed the generator will be asked to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub feed: FeedSet,
    pub scope: FeedScope,
    pub format: FeedFormat,
    pub pattern: String,
}

impl FeedRequest {
    /// Option name this request comes from (e.g., `TAG_FEED_RSS`).
    #[must_use]
    pub fn option_name(&self) -> &'static str {
        self.feed.option_name().unwrap_or("FEED")
    }

    /// Output path for one category/tag/author/language.
    ///
    /// Site-wide feeds ignore `name` and return their fixed path.
    #[must_use]
    pub fn path_for(&self, name: &str) -> String {
        let Some(placeholder) = self.scope.placeholder() else {
            return self.pattern.clone();
        };
        self.pattern.replace(PERCENT_SLOT, name).replace(placeholder, name)
    }
}

/// Every enabled feed, in option order. Disabled feeds never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPlan {
    requests: Vec<FeedRequest>,
    summary_only: bool,
    max_items: Option<u32>,
}

impl FeedPlan {
    #[must_use]
    pub fn from_settings(settings: &SiteSettings) -> Self {
        let requests: Vec<FeedRequest> = FeedSet::all()
            .iter()
            .filter_map(|feed| {
                let pattern = settings.feed_path(feed)?;
                let (scope, format) = describe(feed)?;
                Some(FeedRequest { feed, scope, format, pattern: pattern.to_owned() })
            })
            .collect();

        debug!(
            feeds = requests.len(),
            disabled = (FeedSet::all() - settings.enabled_feeds()).bits(),
            "Feed plan built"
        );

        Self {
            requests,
            summary_only: settings.rss_feed_summary_only,
            max_items: settings.feed_max_items,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedRequest> {
        self.requests.iter()
    }

    #[must_use]
    pub fn get(&self, feed: FeedSet) -> Option<&FeedRequest> {
        self.requests.iter().find(|r| r.feed == feed)
    }

    #[must_use]
    pub fn contains(&self, feed: FeedSet) -> bool {
        self.get(feed).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Whether RSS items carry only the summary.
    #[must_use]
    pub const fn summary_only(&self) -> bool {
        self.summary_only
    }

    #[must_use]
    pub const fn max_items(&self) -> Option<u32> {
        self.max_items
    }
}

impl<'a> IntoIterator for &'a FeedPlan {
    type Item = &'a FeedRequest;
    type IntoIter = std::slice::Iter<'a, FeedRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}
