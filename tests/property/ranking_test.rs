//! Property-based tests for fuzzy ranking.

use fuzzytabber::overlay::search::TabSearcher;
use fuzzytabber::types::settings::SearchSettings;
use fuzzytabber::types::tab::Tab;
use proptest::prelude::*;

fn arb_tabs() -> impl Strategy<Value = Vec<Tab>> {
    prop::collection::vec(
        (
            prop::option::of("[a-zA-Z ]{0,16}"),
            prop::option::of("https://[a-z]{1,10}\\.example/[a-z]{0,8}"),
        ),
        0..24,
    )
    .prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (title, url))| Tab {
                id: Some(i as i64 + 1),
                title,
                url,
                window_id: 1,
                index: i,
                ..Tab::default()
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_empty_query_is_identity(tabs in arb_tabs(), match_urls in any::<bool>()) {
        let settings = SearchSettings { ignore_case: true, match_urls };
        let searcher = TabSearcher::new(&tabs, &settings);
        prop_assert_eq!(searcher.rank(""), (0..tabs.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_ranked_results_are_matching_distinct_and_ordered(
        tabs in arb_tabs(),
        query in "[a-z]{1,3}",
    ) {
        let searcher = TabSearcher::new(&tabs, &SearchSettings::default());
        let ranked = searcher.rank(&query);

        let mut seen = vec![false; tabs.len()];
        for &index in &ranked {
            prop_assert!(index < tabs.len());
            prop_assert!(!seen[index]);
            seen[index] = true;
        }

        for (index, matched) in seen.iter().enumerate() {
            prop_assert_eq!(*matched, searcher.score(index, &query).is_some());
        }

        for pair in ranked.windows(2) {
            let a = searcher.score(pair[0], &query);
            let b = searcher.score(pair[1], &query);
            prop_assert!(a > b || (a == b && pair[0] < pair[1]));
        }
    }

    #[test]
    fn prop_case_insensitive_by_default(tabs in arb_tabs(), query in "[a-z]{1,3}") {
        let searcher = TabSearcher::new(&tabs, &SearchSettings::default());
        prop_assert_eq!(searcher.rank(&query), searcher.rank(&query.to_uppercase()));
    }
}
