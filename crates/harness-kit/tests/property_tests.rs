//! Property tests for criteria matching, selector combination and filter order.

#![allow(clippy::unwrap_used)]

use futures::executor::block_on;
use harness_kit::prelude::*;
use harness_kit::testing::MockDocument;
use harness_kit::{combine_selectors, split_selector_groups};
use proptest::prelude::*;

fn class_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,6}".prop_map(|s| format!(".{s}"))
}

fn selector_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(class_name(), 1..4)
}

proptest! {
    #[test]
    fn prop_unset_criterion_is_vacuous(actual in prop::option::of(".*")) {
        prop_assert!(string_matches(actual.as_deref(), None));
    }

    #[test]
    fn prop_exact_is_string_equality(a in "[a-c]{0,3}", b in "[a-c]{0,3}") {
        let pattern = TextPattern::exact(b.clone());
        prop_assert_eq!(string_matches(Some(a.as_str()), Some(&pattern)), a == b);
        prop_assert!(!string_matches(None, Some(&pattern)));
    }

    #[test]
    fn prop_escaped_regex_finds_substring(prefix in "[ -~]{0,5}", needle in "[ -~]{1,5}", suffix in "[ -~]{0,5}") {
        let pattern = TextPattern::regex(&regex::escape(&needle)).unwrap();
        let haystack = format!("{prefix}{needle}{suffix}");
        prop_assert!(pattern.matches(Some(haystack.as_str())));
    }

    #[test]
    fn prop_combine_is_cartesian(ancestors in selector_list(), hosts in selector_list()) {
        let combined = combine_selectors(&ancestors.join(", "), &hosts.join(", ")).unwrap();
        let groups = split_selector_groups(&combined).unwrap();
        prop_assert_eq!(groups.len(), ancestors.len() * hosts.len());
        for (index, group) in groups.iter().enumerate() {
            let ancestor = &ancestors[index / hosts.len()];
            let host = &hosts[index % hosts.len()];
            prop_assert_eq!(group, &format!("{ancestor} {host}"));
        }
    }

    #[test]
    fn prop_filter_preserves_tree_order(labels in prop::collection::vec(prop::bool::ANY, 0..12)) {
        let html: String = labels
            .iter()
            .enumerate()
            .map(|(index, keep)| {
                let text = if *keep { "Keep" } else { "Drop" };
                format!("<button class='ui-button' id='b{index}'>{text}</button>")
            })
            .collect();
        let document = MockDocument::from_html(&html).unwrap();

        let kept = block_on(document.loader().get_all_harnesses(ButtonHarness::with(ButtonFilters {
            text: Some("Keep".into()),
            ..Default::default()
        })))
        .unwrap();
        let ids: Vec<String> = kept
            .iter()
            .map(|button| block_on(button.host_id()).unwrap().unwrap())
            .collect();
        let expected: Vec<String> = labels
            .iter()
            .enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(index, _)| format!("b{index}"))
            .collect();
        prop_assert_eq!(ids, expected);
    }
}
