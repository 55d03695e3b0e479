//! Group / channel / keyword filtering for channel headers.

use caseless::default_case_fold_str;
use std::collections::HashSet;

/// Case-folded filter configuration for one source.
///
/// Values are compared after full Unicode case folding, so `Straße` and
/// `STRASSE` are the same group. Blank values are ignored. An entirely empty
/// set exports every channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    groups: HashSet<String>,
    channels: HashSet<String>,
    keywords: Vec<String>,
}

impl FilterSet {
    pub fn new<S: AsRef<str>>(groups: &[S], channels: &[S], keywords: &[S]) -> Self {
        Self {
            groups: fold_all(groups).collect(),
            channels: fold_all(channels).collect(),
            keywords: fold_all(keywords).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.channels.is_empty() && self.keywords.is_empty()
    }

    /// Decide whether a channel with this group and display name is exported
    pub fn should_keep(&self, group: &str, display_name: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let group = fold(group);
        let name = fold(display_name);

        self.groups.contains(&group)
            || self.channels.contains(&name)
            || self.keywords.iter().any(|k| name.contains(k.as_str()))
    }
}

pub fn should_keep(group: &str, display_name: &str, filters: &FilterSet) -> bool {
    filters.should_keep(group, display_name)
}

fn fold(value: &str) -> String {
    default_case_fold_str(value.trim())
}

fn fold_all<S: AsRef<str>>(values: &[S]) -> impl Iterator<Item = String> + '_ {
    values
        .iter()
        .map(|v| fold(v.as_ref()))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn groups(values: &[&str]) -> FilterSet {
        FilterSet::new(values, &[], &[])
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filters = FilterSet::default();
        assert!(filters.should_keep("", ""));
        assert!(filters.should_keep("News", "CNN"));
    }

    #[test]
    fn test_group_match_is_exact() {
        let filters = groups(&["News"]);
        assert!(filters.should_keep("news", "CNN"));
        assert!(!filters.should_keep("News HD", "CNN"));
        assert!(!filters.should_keep("Sports", "ESPN"));
    }

    #[test]
    fn test_channel_match_is_exact() {
        let filters = FilterSet::new(&[], &["CNN"], &[]);
        assert!(filters.should_keep("Whatever", "cnn"));
        assert!(!filters.should_keep("Whatever", "CNN International"));
    }

    #[test]
    fn test_keyword_is_substring_of_name() {
        let filters = FilterSet::new(&[], &[], &["cctv"]);
        assert!(filters.should_keep("", "CCTV-1 综合"));
        assert!(filters.should_keep("", "Hunan CCTV mirror"));
        // Keywords only look at the display name
        assert!(!filters.should_keep("cctv", "Phoenix"));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        assert!(FilterSet::new(&[], &[], &["", "  "]).is_empty());
        assert!(FilterSet::new(&[""], &[" "], &[]).is_empty());

        let filters = FilterSet::new(&["", "News"], &["  "], &[]);
        assert!(!filters.should_keep("", "Unnamed group"));
        assert!(filters.should_keep("NEWS", "CNN"));
    }

    #[test]
    fn test_full_case_folding() {
        let filters = groups(&["Straße"]);
        assert!(filters.should_keep("Straße", "Kanal"));
        assert!(filters.should_keep("STRASSE", "kanal"));
        assert!(filters.should_keep("strasse", "Kanal"));

        let filters = FilterSet::new(&[], &["ΣΠΟΡ"], &["ünï"]);
        assert!(filters.should_keep("", "σπορ"));
        assert!(filters.should_keep("", "KANAL ÜNÏ HD"));
    }

    #[test]
    fn test_malformed_header_dropped_when_filters_exist() {
        let filters = groups(&["News"]);
        assert!(!filters.should_keep("", ""));
    }

    proptest! {
        #[test]
        fn prop_empty_filter_exports_everything(group in ".*", name in ".*") {
            prop_assert!(should_keep(&group, &name, &FilterSet::default()));
        }

        #[test]
        fn prop_case_insensitive(
            group in "[A-Za-zßẞäöüÄÖÜéÉçÇσςΣﬁΩ ]{0,12}",
            name in "[A-Za-z0-9ßẞäöüÄÖÜéÉçÇσςΣﬁΩ ]{0,16}",
            cfg_group in "[A-Za-zßẞäöüÄÖÜéÉçÇσςΣﬁΩ ]{0,12}",
            cfg_name in "[A-Za-z0-9ßẞäöüÄÖÜéÉçÇσςΣﬁΩ ]{0,16}",
            keyword in "[A-Za-zßäöüσ]{0,4}",
        ) {
            let filters = FilterSet::new(&[cfg_group], &[cfg_name], &[keyword]);
            prop_assert_eq!(
                should_keep(&group, &name, &filters),
                should_keep(&group.to_uppercase(), &name.to_lowercase(), &filters)
            );
        }
    }
}
