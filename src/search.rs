//! Fuzzy matching for the resource picker.
//!
//! Record tables use the exact substring search of [`crate::table`]; this
//! module only ranks short names against a typed query.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Match score of `pattern` against `text`, higher is better.
    pub fn score(&self, text: &str, pattern: &str) -> Option<i64> {
        self.inner.fuzzy_match(text, pattern)
    }

    /// Best score of `pattern` against any of `texts`.
    pub fn best_score<'a>(
        &self,
        texts: impl IntoIterator<Item = &'a str>,
        pattern: &str,
    ) -> Option<i64> {
        texts
            .into_iter()
            .filter_map(|text| self.score(text, pattern))
            .max()
    }

    /// Keep the items matching `pattern`, best match first.
    ///
    /// Items with equal scores keep their original order. An empty pattern
    /// keeps everything.
    pub fn rank<T, F>(&self, items: Vec<T>, pattern: &str, texts: F) -> Vec<T>
    where
        F: Fn(&T) -> Vec<&str>,
    {
        if pattern.trim().is_empty() {
            return items;
        }
        let mut scored: Vec<(i64, T)> = items
            .into_iter()
            .filter_map(|item| {
                let score = self.best_score(texts(&item), pattern)?;
                Some((score, item))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, item)| item).collect()
    }
}
