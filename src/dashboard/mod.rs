//! Dashboard module - Formatting and per-selection orchestration

mod formatter;
mod view;

pub use formatter::{format_fixed, format_percent_change, format_scaled, ValueFormat, UNAVAILABLE};
pub use view::{
    CategoryCard, ChartPanel, Dashboard, DashboardView, EntityOptions, KpiCard, KpiReading,
    PanelChoices,
};
