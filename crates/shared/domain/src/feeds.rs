use bitflags::bitflags;

bitflags! {
    /// One flag per feed option. Flag names match the option names.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FeedSet: u16 {
        const FEED_ALL_ATOM = 1 << 0;
        const FEED_ALL_RSS = 1 << 1;
        const CATEGORY_FEED_ATOM = 1 << 2;
        const CATEGORY_FEED_RSS = 1 << 3;
        const TAG_FEED_ATOM = 1 << 4;
        const TAG_FEED_RSS = 1 << 5;
        const AUTHOR_FEED_ATOM = 1 << 6;
        const AUTHOR_FEED_RSS = 1 << 7;
        const TRANSLATION_FEED_ATOM = 1 << 8;
        const TRANSLATION_FEED_RSS = 1 << 9;

        const ATOM = Self::FEED_ALL_ATOM.bits()
            | Self::CATEGORY_FEED_ATOM.bits()
            | Self::TAG_FEED_ATOM.bits()
            | Self::AUTHOR_FEED_ATOM.bits()
            | Self::TRANSLATION_FEED_ATOM.bits();
        const RSS = Self::FEED_ALL_RSS.bits()
            | Self::CATEGORY_FEED_RSS.bits()
            | Self::TAG_FEED_RSS.bits()
            | Self::AUTHOR_FEED_RSS.bits()
            | Self::TRANSLATION_FEED_RSS.bits();
    }
}

impl FeedSet {
    /// Option name of a single feed flag.
    #[must_use]
    pub fn option_name(self) -> Option<&'static str> {
        self.iter_names().find(|(_, flag)| *flag == self).map(|(name, _)| name)
    }
}

impl From<&str> for FeedSet {
    /// Parses an option name in either case; `"all"`/`"*"` select every feed.
    fn from(s: &str) -> Self {
        match s {
            "all" | "*" => Self::all(),
            name => Self::from_name(&name.to_ascii_uppercase()).unwrap_or_else(Self::empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_names_round_trip() {
        for flag in FeedSet::all().iter() {
            let name = flag.option_name().expect("single flag has a name");
            assert_eq!(FeedSet::from(name), flag);
        }
    }

    #[test]
    fn parses_lower_case_names() {
        assert_eq!(FeedSet::from("tag_feed_rss"), FeedSet::TAG_FEED_RSS);
        assert_eq!(FeedSet::from("nope"), FeedSet::empty());
        assert_eq!(FeedSet::from("*"), FeedSet::all());
    }

    #[test]
    fn format_groups_partition_all_feeds() {
        assert_eq!(FeedSet::ATOM | FeedSet::RSS, FeedSet::all());
        assert!(FeedSet::ATOM.intersection(FeedSet::RSS).is_empty());
    }

    #[test]
    fn composite_has_no_single_name() {
        assert_eq!((FeedSet::TAG_FEED_RSS | FeedSet::TAG_FEED_ATOM).option_name(), None);
    }
}
