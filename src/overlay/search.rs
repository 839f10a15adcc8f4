//! Fuzzy ranking of tabs against the overlay query.
//!
//! Scoring is delegated to the skim matcher from `fuzzy-matcher`; this module
//! only decides which fields are scored and how results are ordered.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::types::settings::SearchSettings;
use crate::types::tab::Tab;

/// A matcher bound to one tab snapshot.
///
/// Keys are extracted once per snapshot so typing only pays for scoring.
pub struct TabSearcher {
    matcher: SkimMatcherV2,
    keys: Vec<Vec<String>>,
    fold_case: bool,
}

impl TabSearcher {
    pub fn new(tabs: &[Tab], settings: &SearchSettings) -> Self {
        let matcher = if settings.ignore_case {
            SkimMatcherV2::default().ignore_case()
        } else {
            SkimMatcherV2::default().respect_case()
        };

        let keys = tabs
            .iter()
            .map(|tab| search_keys(tab, settings.match_urls, settings.ignore_case))
            .collect();

        Self {
            matcher,
            keys,
            fold_case: settings.ignore_case,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Best score of any key of the tab at `index`, `None` if nothing matches.
    pub fn score(&self, index: usize, query: &str) -> Option<i64> {
        let query = self.fold(query);
        self.score_folded(index, &query)
    }

    /// Lowercases the query when case is ignored; keys are stored lowercased.
    fn fold(&self, query: &str) -> String {
        if self.fold_case {
            query.to_lowercase()
        } else {
            query.to_string()
        }
    }

    fn score_folded(&self, index: usize, query: &str) -> Option<i64> {
        self.keys
            .get(index)?
            .iter()
            .filter_map(|key| self.matcher.fuzzy_match(key, query))
            .max()
    }

    /// Snapshot indices ordered best match first.
    ///
    /// An empty query keeps every tab in snapshot order. Otherwise tabs that
    /// match no key are dropped and equal scores keep snapshot order.
    pub fn rank(&self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return (0..self.keys.len()).collect();
        }

        let query = self.fold(query);
        let mut scored: Vec<(i64, usize)> = (0..self.keys.len())
            .filter_map(|index| self.score_folded(index, &query).map(|score| (score, index)))
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, index)| index).collect()
    }
}

fn search_keys(tab: &Tab, match_urls: bool, fold_case: bool) -> Vec<String> {
    let url = if match_urls { tab.url.as_deref() } else { None };
    [tab.title.as_deref(), url]
        .into_iter()
        .flatten()
        .filter(|key| !key.is_empty())
        .map(|key| {
            if fold_case {
                key.to_lowercase()
            } else {
                key.to_string()
            }
        })
        .collect()
}

/// One-shot ranking without keeping the searcher around.
pub fn rank_tabs(tabs: &[Tab], query: &str, settings: &SearchSettings) -> Vec<usize> {
    TabSearcher::new(tabs, settings).rank(query)
}
