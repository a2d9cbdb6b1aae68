//! Dataset Normalizer Module
//! Renames and selects raw columns into the canonical schema and drops
//! rows that cannot take part in any grouping.

use polars::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use super::table::{CanonicalTable, TableSchema};
use crate::config::{ColumnRole, ColumnSpec};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column '{0}' not found in dataset")]
    MissingColumn(String),
    #[error("Column mapping must contain exactly one period column")]
    MissingPeriod,
}

/// Counts reported after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
}

/// Parse a raw period cell into a year.
///
/// Accepts `2019`, ` 2019 ` and integral floats such as `2019.0`.
pub fn parse_period(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// Converts a raw wide table into a canonical table.
pub struct Normalizer<'a> {
    columns: &'a [ColumnSpec],
}

impl<'a> Normalizer<'a> {
    pub fn new(columns: &'a [ColumnSpec]) -> Self {
        Self { columns }
    }

    /// Select, rename and type the mapped columns, then drop rows missing a
    /// required dimension or a parseable period.
    pub fn normalize(
        &self,
        raw: &DataFrame,
    ) -> Result<(CanonicalTable, NormalizeReport), NormalizeError> {
        let period_spec = self
            .columns
            .iter()
            .find(|c| c.role == ColumnRole::Period)
            .ok_or(NormalizeError::MissingPeriod)?;

        let mut schema = TableSchema {
            dimensions: Vec::new(),
            period: period_spec.name.clone(),
            metrics: Vec::new(),
            categories: Vec::new(),
        };
        let mut columns: Vec<Column> = Vec::new();
        let mut required: Vec<String> = vec![period_spec.name.clone()];

        for spec in self.columns {
            let Ok(source) = raw.column(&spec.source) else {
                if spec.required || spec.role == ColumnRole::Period {
                    return Err(NormalizeError::MissingColumn(spec.source.clone()));
                }
                warn!(column = %spec.source, "configured column absent from dataset, skipping");
                continue;
            };

            let column = match spec.role {
                ColumnRole::Dimension | ColumnRole::Category => {
                    Self::text_column(source, &spec.name)?
                }
                ColumnRole::Period => Self::period_column(source, &spec.name)?,
                ColumnRole::Metric => Self::metric_column(source, &spec.name)?,
            };

            match spec.role {
                ColumnRole::Dimension => schema.dimensions.push(spec.name.clone()),
                ColumnRole::Metric => schema.metrics.push(spec.name.clone()),
                ColumnRole::Category => schema.categories.push(spec.name.clone()),
                ColumnRole::Period => {}
            }
            if spec.required && spec.role != ColumnRole::Period {
                required.push(spec.name.clone());
            }
            columns.push(column);
        }

        let df = DataFrame::new(columns)?;
        let total_rows = df.height();

        let mut keep = vec![true; total_rows];
        for name in &required {
            let col = df.column(name)?;
            for (i, flag) in keep.iter_mut().enumerate() {
                if col.get(i).map(|v| v.is_null()).unwrap_or(true) {
                    *flag = false;
                }
            }
        }
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let df = df.filter(&mask)?;

        let report = NormalizeReport {
            total_rows,
            kept_rows: df.height(),
            dropped_rows: total_rows - df.height(),
        };
        info!(
            total = report.total_rows,
            kept = report.kept_rows,
            dropped = report.dropped_rows,
            "normalized dataset"
        );

        Ok((CanonicalTable::new(df, schema), report))
    }

    /// Trimmed strings; blank cells become missing.
    fn text_column(source: &Column, name: &str) -> Result<Column, NormalizeError> {
        let text = source.cast(&DataType::String)?;
        let ca = text.str()?;
        let values: Vec<Option<String>> = ca
            .into_iter()
            .map(|v| {
                v.map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
            .collect();
        Ok(Column::new(name.into(), values))
    }

    fn period_column(source: &Column, name: &str) -> Result<Column, NormalizeError> {
        let text = source.cast(&DataType::String)?;
        let ca = text.str()?;
        let values: Vec<Option<i32>> = ca
            .into_iter()
            .map(|v| v.and_then(parse_period))
            .collect();
        Ok(Column::new(name.into(), values))
    }

    /// Float64 with NaN folded into missing so means skip it.
    fn metric_column(source: &Column, name: &str) -> Result<Column, NormalizeError> {
        let numeric = source.cast(&DataType::Float64)?;
        let ca = numeric.f64()?;
        let values: Vec<Option<f64>> = ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(Column::new(name.into(), values))
    }
}
