//! Time-Series Aggregator
//! One averaged point per period for a single metric.

use serde::Serialize;

use super::calculator::StatsCalculator;
use crate::data::FilteredSubset;
use crate::AnalyticsError;

/// Mean of a metric across all subset rows of one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatedPoint {
    pub period: i32,
    pub value: f64,
}

/// Ordered chart series. Iterate as many times as needed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub metric: String,
    points: Vec<AggregatedPoint>,
}

impl TimeSeries {
    pub fn empty(metric: &str) -> Self {
        Self {
            metric: metric.to_string(),
            points: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = AggregatedPoint> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<'s> IntoIterator for &'s TimeSeries {
    type Item = AggregatedPoint;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, AggregatedPoint>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter().copied()
    }
}

pub struct SeriesAggregator;

impl SeriesAggregator {
    /// Average `metric` per period, ascending by period.
    ///
    /// Unknown metrics and empty subsets give an empty series.
    pub fn aggregate(subset: &FilteredSubset<'_>, metric: &str) -> Result<TimeSeries, AnalyticsError> {
        if subset.is_empty() {
            return Ok(TimeSeries::empty(metric));
        }

        let points = StatsCalculator::period_means(subset, metric)?
            .into_iter()
            .map(|(period, value)| AggregatedPoint { period, value })
            .collect();

        Ok(TimeSeries {
            metric: metric.to_string(),
            points,
        })
    }
}
