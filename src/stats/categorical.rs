//! Categorical Summarizer
//! Most frequent classification value within a slice.

use std::collections::BTreeMap;

use crate::data::FilteredSubset;
use crate::AnalyticsError;

pub struct CategoricalSummarizer;

impl CategoricalSummarizer {
    /// Most frequent non-missing value of `column`.
    ///
    /// Ties resolve to the lexicographically smallest value. `None` when the
    /// column is unknown or the slice holds no value for it.
    pub fn mode(slice: &FilteredSubset<'_>, column: &str) -> Result<Option<String>, AnalyticsError> {
        let Some(values) = slice.category_values(column)? else {
            return Ok(None);
        };
        Ok(Self::mode_of(values.into_iter().flatten()))
    }

    pub fn mode_of<I>(values: I) -> Option<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }

        let mut best: Option<(String, usize)> = None;
        for (value, count) in counts {
            // strict comparison keeps the earliest key on ties
            if best.as_ref().is_none_or(|(_, c)| count > *c) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }
}
