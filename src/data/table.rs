//! Canonical Table Module
//! The normalized, read-only dataset shared by every selection.

use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// Column layout of a canonical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub dimensions: Vec<String>,
    pub period: String,
    pub metrics: Vec<String>,
    pub categories: Vec<String>,
}

impl TableSchema {
    pub fn has_dimension(&self, name: &str) -> bool {
        self.dimensions.iter().any(|d| d == name)
    }

    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics.iter().any(|m| m == name)
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }
}

/// Normalized dataset. Built once by the normalizer and never mutated.
///
/// The period column is `Int32` and never null; dimension and category
/// columns are `String`; metric columns are `Float64` with nulls for
/// missing values (NaN never appears).
#[derive(Debug, Clone)]
pub struct CanonicalTable {
    df: DataFrame,
    schema: TableSchema,
}

impl CanonicalTable {
    pub(crate) fn new(df: DataFrame, schema: TableSchema) -> Self {
        Self { df, schema }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Sorted distinct non-missing values of a dimension.
    ///
    /// Unknown dimensions yield an empty list.
    pub fn entity_values(&self, dimension: &str) -> Vec<String> {
        if !self.schema.has_dimension(dimension) {
            return Vec::new();
        }

        let Ok(ca) = self.df.column(dimension).and_then(|col| col.str()) else {
            return Vec::new();
        };
        ca.into_iter()
            .flatten()
            .map(str::to_string)
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest observed period.
    pub fn period_bounds(&self) -> Option<(i32, i32)> {
        let ca = self.df.column(&self.schema.period).ok()?.i32().ok()?;
        Some((ca.min()?, ca.max()?))
    }
}
