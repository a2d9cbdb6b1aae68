//! Statistics Calculator Module
//! Per-period bucketing and missing-aware means shared by the aggregator
//! and the comparator.

use std::collections::BTreeMap;

use crate::data::FilteredSubset;
use crate::AnalyticsError;

/// Non-missing metric values of a subset grouped by period, ascending.
///
/// Periods whose rows are all missing for the metric do not appear.
pub type PeriodBuckets = BTreeMap<i32, Vec<f64>>;

/// Handles the arithmetic behind series and comparisons.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean as sum over count; `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        let n = values.len();
        if n == 0 {
            return None;
        }
        Some(values.iter().sum::<f64>() / n as f64)
    }

    /// Group the non-missing values of `metric` by period.
    ///
    /// Returns `None` when the metric is not part of the schema.
    pub fn bucket_by_period(
        subset: &FilteredSubset<'_>,
        metric: &str,
    ) -> Result<Option<PeriodBuckets>, AnalyticsError> {
        let Some(values) = subset.metric_values(metric)? else {
            return Ok(None);
        };
        let periods = subset.periods()?;

        let mut buckets = PeriodBuckets::new();
        for (period, value) in periods.into_iter().zip(values) {
            if let (Some(period), Some(value)) = (period, value) {
                buckets.entry(period).or_default().push(value);
            }
        }
        Ok(Some(buckets))
    }

    /// Mean of `metric` per period, ascending, skipping empty periods.
    pub fn period_means(
        subset: &FilteredSubset<'_>,
        metric: &str,
    ) -> Result<BTreeMap<i32, f64>, AnalyticsError> {
        let buckets = Self::bucket_by_period(subset, metric)?.unwrap_or_default();
        Ok(buckets
            .into_iter()
            .filter_map(|(period, values)| Self::mean(&values).map(|m| (period, m)))
            .collect())
    }
}
