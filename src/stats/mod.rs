//! Stats module - Series aggregation, period comparison and categorical mode

mod calculator;
mod categorical;
mod comparator;
mod series;

pub use calculator::{PeriodBuckets, StatsCalculator};
pub use categorical::CategoricalSummarizer;
pub use comparator::{Direction, PeriodComparator, PeriodComparison, PeriodWindow};
pub use series::{AggregatedPoint, SeriesAggregator, TimeSeries};
