//! Sustainview - analytics core for a sustainability dashboard
//!
//! Turns a wide multi-country, multi-year dataset plus a user selection into
//! chart-ready time series and period-over-period KPI cards.

pub mod config;
pub mod dashboard;
pub mod data;
pub mod stats;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure inside per-selection evaluation.
///
/// Selections themselves never fail: unknown dimensions, entities and
/// metrics produce empty or unavailable results instead.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardView, PanelChoices};
pub use data::{CanonicalTable, DataLoader, Selection};
