//! Selection Filter Module
//! Narrows the canonical table to one entity of one dimension.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::table::{CanonicalTable, TableSchema};
use crate::AnalyticsError;

/// Inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start: i32,
    pub end: i32,
}

impl PeriodRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

/// A user choice of grouping dimension, entity and optional year range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub dimension: String,
    pub entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<PeriodRange>,
}

impl Selection {
    pub fn new(dimension: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            entity: entity.into(),
            range: None,
        }
    }

    pub fn with_range(mut self, range: PeriodRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Rows of a canonical table matching a selection, in table order.
#[derive(Debug, Clone)]
pub struct FilteredSubset<'a> {
    schema: &'a TableSchema,
    df: DataFrame,
}

impl<'a> FilteredSubset<'a> {
    /// Apply a selection. An unknown dimension gives an empty subset.
    pub fn select(table: &'a CanonicalTable, selection: &Selection) -> Result<Self, AnalyticsError> {
        let schema = table.schema();
        if !schema.has_dimension(&selection.dimension) {
            return Ok(Self {
                schema,
                df: table.frame().clear(),
            });
        }

        let mut predicate = col(selection.dimension.as_str()).eq(lit(selection.entity.as_str()));
        if let Some(range) = selection.range {
            let period = col(schema.period.as_str());
            predicate = predicate
                .and(period.clone().gt_eq(lit(range.start)))
                .and(period.lt_eq(lit(range.end)));
        }

        let df = table.frame().clone().lazy().filter(predicate).collect()?;
        Ok(Self { schema, df })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn schema(&self) -> &TableSchema {
        self.schema
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Period of every row, in row order.
    pub fn periods(&self) -> Result<Vec<Option<i32>>, AnalyticsError> {
        let ca = self.df.column(&self.schema.period)?.i32()?;
        Ok(ca.into_iter().collect())
    }

    /// Distinct periods, ascending.
    pub fn distinct_periods(&self) -> Result<Vec<i32>, AnalyticsError> {
        let periods: BTreeSet<i32> = self.periods()?.into_iter().flatten().collect();
        Ok(periods.into_iter().collect())
    }

    /// Metric values in row order, or `None` if the metric is not in the schema.
    pub fn metric_values(&self, metric: &str) -> Result<Option<Vec<Option<f64>>>, AnalyticsError> {
        if !self.schema.has_metric(metric) {
            return Ok(None);
        }
        let ca = self.df.column(metric)?.f64()?;
        Ok(Some(ca.into_iter().collect()))
    }

    /// Category values in row order, or `None` if the column is not in the schema.
    pub fn category_values(&self, column: &str) -> Result<Option<Vec<Option<String>>>, AnalyticsError> {
        if !self.schema.has_category(column) {
            return Ok(None);
        }
        let ca = self.df.column(column)?.str()?;
        Ok(Some(ca.into_iter().map(|v| v.map(str::to_string)).collect()))
    }

    /// Rows belonging to a single period.
    pub fn period_slice(&self, period: i32) -> Result<FilteredSubset<'a>, AnalyticsError> {
        let df = self
            .df
            .clone()
            .lazy()
            .filter(col(self.schema.period.as_str()).eq(lit(period)))
            .collect()?;
        Ok(FilteredSubset {
            schema: self.schema,
            df,
        })
    }
}
