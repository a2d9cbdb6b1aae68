//! Period Comparator
//! Latest period versus the one before it, per metric.

use serde::Serialize;

use super::calculator::StatsCalculator;
use crate::data::FilteredSubset;
use crate::AnalyticsError;

/// The two most recent distinct periods of a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub current: i32,
    pub prior: i32,
}

/// Sign class of a percent change, used only for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    NonNegative,
    Negative,
}

impl Direction {
    pub fn of(percent_change: f64) -> Self {
        if percent_change >= 0.0 {
            Direction::NonNegative
        } else {
            Direction::Negative
        }
    }
}

/// Numeric comparison of one metric across a period window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub metric: String,
    pub current_mean: f64,
    pub prior_mean: f64,
    pub percent_change: f64,
    pub direction: Direction,
}

pub struct PeriodComparator;

impl PeriodComparator {
    /// Latest period and its predecessor among the distinct periods present.
    ///
    /// Gaps between the two are allowed. `None` with fewer than two periods.
    pub fn window(subset: &FilteredSubset<'_>) -> Result<Option<PeriodWindow>, AnalyticsError> {
        let periods = subset.distinct_periods()?;
        Ok(match periods.as_slice() {
            [.., prior, current] => Some(PeriodWindow {
                current: *current,
                prior: *prior,
            }),
            _ => None,
        })
    }

    /// Compare one metric over a known window.
    ///
    /// `None` when either mean is undefined or the prior mean is exactly zero.
    pub fn compare_in(
        subset: &FilteredSubset<'_>,
        window: PeriodWindow,
        metric: &str,
    ) -> Result<Option<PeriodComparison>, AnalyticsError> {
        let Some(buckets) = StatsCalculator::bucket_by_period(subset, metric)? else {
            return Ok(None);
        };

        let mean_of = |period: i32| {
            buckets
                .get(&period)
                .and_then(|values| StatsCalculator::mean(values))
        };
        let (Some(current_mean), Some(prior_mean)) = (mean_of(window.current), mean_of(window.prior))
        else {
            return Ok(None);
        };
        if prior_mean == 0.0 {
            return Ok(None);
        }

        let mut percent_change = (current_mean - prior_mean) / prior_mean * 100.0;
        if percent_change == 0.0 {
            // -0.0 from a negative base
            percent_change = 0.0;
        }

        Ok(Some(PeriodComparison {
            metric: metric.to_string(),
            current_mean,
            prior_mean,
            percent_change,
            direction: Direction::of(percent_change),
        }))
    }

    /// Compare every metric; all `None` when the subset has fewer than two periods.
    pub fn compare_all(
        subset: &FilteredSubset<'_>,
        metrics: &[&str],
    ) -> Result<Vec<Option<PeriodComparison>>, AnalyticsError> {
        let Some(window) = Self::window(subset)? else {
            return Ok(vec![None; metrics.len()]);
        };
        metrics
            .iter()
            .map(|metric| Self::compare_in(subset, window, metric))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnRole, ColumnSpec};
    use crate::data::{CanonicalTable, Normalizer, Selection};
    use polars::prelude::*;

    fn table(years: &[i32], values: &[Option<f64>]) -> CanonicalTable {
        let raw = df!(
            "Region" => vec!["X"; years.len()],
            "Year" => years.to_vec(),
            "Score" => values.to_vec()
        )
        .unwrap();
        let columns = vec![
            ColumnSpec {
                source: "Region".into(),
                name: "Region".into(),
                role: ColumnRole::Dimension,
                required: true,
                label: None,
            },
            ColumnSpec {
                source: "Year".into(),
                name: "Year".into(),
                role: ColumnRole::Period,
                required: true,
                label: None,
            },
            ColumnSpec {
                source: "Score".into(),
                name: "Score".into(),
                role: ColumnRole::Metric,
                required: false,
                label: None,
            },
        ];
        Normalizer::new(&columns).normalize(&raw).unwrap().0
    }

    fn compare(table: &CanonicalTable) -> Option<PeriodComparison> {
        let subset = FilteredSubset::select(table, &Selection::new("Region", "X")).unwrap();
        PeriodComparator::compare_all(&subset, &["Score"]).unwrap().remove(0)
    }

    #[test]
    fn test_increase() {
        let t = table(&[2019, 2020], &[Some(100.0), Some(110.0)]);
        let c = compare(&t).unwrap();
        assert!((c.percent_change - 10.0).abs() < 1e-9);
        assert_eq!(c.direction, Direction::NonNegative);
        assert_eq!(c.current_mean, 110.0);
        assert_eq!(c.prior_mean, 100.0);
    }

    #[test]
    fn test_decrease() {
        let t = table(&[2019, 2020], &[Some(100.0), Some(90.0)]);
        let c = compare(&t).unwrap();
        assert!((c.percent_change + 10.0).abs() < 1e-9);
        assert_eq!(c.direction, Direction::Negative);
    }

    #[test]
    fn test_prior_is_previous_distinct_period_across_gap() {
        let t = table(
            &[2010, 2015, 2015, 2020],
            &[Some(1.0), Some(40.0), Some(60.0), Some(75.0)],
        );
        let subset = FilteredSubset::select(&t, &Selection::new("Region", "X")).unwrap();
        let window = PeriodComparator::window(&subset).unwrap().unwrap();
        assert_eq!(window, PeriodWindow { current: 2020, prior: 2015 });
        let c = compare(&t).unwrap();
        assert_eq!(c.prior_mean, 50.0);
        assert!((c.percent_change - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_period_is_unavailable() {
        let t = table(&[2020, 2020], &[Some(1.0), Some(2.0)]);
        assert!(compare(&t).is_none());
    }

    #[test]
    fn test_zero_prior_is_unavailable() {
        for current in [0.0, 5.0, -5.0] {
            let t = table(&[2019, 2020], &[Some(0.0), Some(current)]);
            assert!(compare(&t).is_none());
        }
    }

    #[test]
    fn test_tiny_nonzero_prior_is_available() {
        let t = table(&[2019, 2020], &[Some(1e-300), Some(2e-300)]);
        let c = compare(&t).unwrap();
        assert!((c.percent_change - 100.0).abs() < 1e-9);
        assert_eq!(c.direction, Direction::NonNegative);

        let t = table(&[2019, 2020], &[Some(-1e-12), Some(1e-12)]);
        let c = compare(&t).unwrap();
        assert!((c.percent_change + 200.0).abs() < 1e-9);
        assert_eq!(c.direction, Direction::Negative);
    }

    #[test]
    fn test_prior_mean_residue_is_not_zero() {
        let t = table(
            &[2019, 2019, 2019, 2020],
            &[Some(0.7), Some(0.1), Some(-0.8), Some(1.0)],
        );
        let c = compare(&t).unwrap();
        assert_eq!(c.prior_mean, (0.7 + 0.1 - 0.8) / 3.0);
        assert_eq!(c.direction, Direction::Negative);
    }

    #[test]
    fn test_missing_side_is_unavailable() {
        let t = table(&[2019, 2020], &[Some(3.0), None]);
        assert!(compare(&t).is_none());
        let t = table(&[2019, 2020], &[None, Some(3.0)]);
        assert!(compare(&t).is_none());
    }

    #[test]
    fn test_unchanged_from_negative_base_is_non_negative() {
        let t = table(&[2019, 2020], &[Some(-4.0), Some(-4.0)]);
        let c = compare(&t).unwrap();
        assert_eq!(c.percent_change, 0.0);
        assert!(c.percent_change.is_sign_positive());
        assert_eq!(c.direction, Direction::NonNegative);
    }

    #[test]
    fn test_unknown_metric_is_unavailable() {
        let t = table(&[2019, 2020], &[Some(1.0), Some(2.0)]);
        let subset = FilteredSubset::select(&t, &Selection::new("Region", "X")).unwrap();
        let result = PeriodComparator::compare_all(&subset, &["Score", "Nope"]).unwrap();
        assert!(result[0].is_some());
        assert!(result[1].is_none());
    }
}
