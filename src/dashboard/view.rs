//! Dashboard View
//! Runs the full pipeline for one selection: filter, chart series, KPI
//! cards and the categorical card.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::formatter::{format_percent_change, UNAVAILABLE};
use crate::config::{DashboardConfig, KpiSpec, PanelSpec};
use crate::data::{CanonicalTable, FilteredSubset, Selection};
use crate::stats::{
    CategoricalSummarizer, Direction, PeriodComparator, PeriodComparison, PeriodWindow,
    SeriesAggregator, TimeSeries,
};
use crate::AnalyticsError;

/// Metric picked for each chart panel, keyed by panel id.
///
/// Panels without an explicit choice use their configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelChoices {
    choices: BTreeMap<String, String>,
}

impl PanelChoices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, panel: impl Into<String>, metric: impl Into<String>) -> Self {
        self.choices.insert(panel.into(), metric.into());
        self
    }

    pub fn metric_for<'p>(&'p self, panel: &'p PanelSpec) -> &'p str {
        self.choices
            .get(&panel.id)
            .map(String::as_str)
            .unwrap_or(&panel.default)
    }
}

/// Entities available for a grouping dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityOptions {
    pub dimension: String,
    pub label: String,
    pub options: Vec<String>,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub id: String,
    pub title: String,
    pub metric: String,
    pub series: TimeSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KpiReading {
    Available {
        current: String,
        prior: String,
        change: String,
        direction: Direction,
    },
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub id: String,
    pub title: String,
    pub metric: String,
    pub reading: KpiReading,
}

impl KpiCard {
    fn new(spec: &KpiSpec, comparison: Option<PeriodComparison>) -> Self {
        let reading = match comparison {
            Some(c) => {
                let (change, direction) = format_percent_change(c.percent_change);
                KpiReading::Available {
                    current: spec.format.format(Some(c.current_mean)),
                    prior: spec.format.format(Some(c.prior_mean)),
                    change,
                    direction,
                }
            }
            None => KpiReading::Unavailable,
        };
        Self {
            id: spec.id.clone(),
            title: spec.title.clone(),
            metric: spec.metric.clone(),
            reading,
        }
    }

    pub fn value_text(&self) -> &str {
        match &self.reading {
            KpiReading::Available { current, .. } => current,
            KpiReading::Unavailable => UNAVAILABLE,
        }
    }

    /// `vs prev 100.0 (+25.0%)`
    pub fn subtitle(&self) -> String {
        match &self.reading {
            KpiReading::Available { prior, change, .. } => format!("vs prev {prior} ({change})"),
            KpiReading::Unavailable => UNAVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCard {
    pub title: String,
    pub column: String,
    pub value: Option<String>,
}

impl CategoryCard {
    pub fn value_text(&self) -> &str {
        self.value.as_deref().unwrap_or(UNAVAILABLE)
    }
}

/// Everything presentation needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub matched_rows: usize,
    pub window: Option<PeriodWindow>,
    pub charts: Vec<ChartPanel>,
    pub kpis: Vec<KpiCard>,
    pub category: CategoryCard,
}

impl DashboardView {
    pub fn chart(&self, id: &str) -> Option<&ChartPanel> {
        self.charts.iter().find(|c| c.id == id)
    }

    pub fn kpi(&self, id: &str) -> Option<&KpiCard> {
        self.kpis.iter().find(|k| k.id == id)
    }
}

/// Pipeline entry point over a shared read-only table.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    table: &'a CanonicalTable,
    config: &'a DashboardConfig,
}

impl<'a> Dashboard<'a> {
    pub fn new(table: &'a CanonicalTable, config: &'a DashboardConfig) -> Self {
        Self { table, config }
    }

    /// Options for a dimension; the default is the configured entity when
    /// it exists for this dimension, otherwise the first option.
    pub fn entity_options(&self, dimension: &str) -> EntityOptions {
        let options = self.table.entity_values(dimension);
        let configured = self
            .config
            .defaults
            .entity
            .as_ref()
            .filter(|_| self.config.defaults.group == dimension)
            .filter(|entity| options.contains(*entity));
        let default = configured.or_else(|| options.first()).cloned();

        EntityOptions {
            dimension: dimension.to_string(),
            label: self.config.dimension_label(dimension),
            options,
            default,
        }
    }

    /// Evaluate every panel and card for one selection.
    pub fn evaluate(
        &self,
        selection: &Selection,
        choices: &PanelChoices,
    ) -> Result<DashboardView, AnalyticsError> {
        let subset = FilteredSubset::select(self.table, selection)?;
        debug!(
            dimension = %selection.dimension,
            entity = %selection.entity,
            rows = subset.len(),
            "evaluating selection"
        );

        let charts = self
            .config
            .panels
            .iter()
            .map(|panel| {
                let metric = choices.metric_for(panel);
                if !panel.metrics.iter().any(|m| m == metric) {
                    warn!(panel = %panel.id, metric, "metric is not one of the panel options");
                }
                Ok(ChartPanel {
                    id: panel.id.clone(),
                    title: panel.title.clone(),
                    metric: metric.to_string(),
                    series: SeriesAggregator::aggregate(&subset, metric)?,
                })
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;

        let window = PeriodComparator::window(&subset)?;

        let metrics: Vec<&str> = self.config.kpis.iter().map(|k| k.metric.as_str()).collect();
        let kpis: Vec<KpiCard> = self
            .config
            .kpis
            .iter()
            .zip(PeriodComparator::compare_all(&subset, &metrics)?)
            .map(|(spec, comparison)| KpiCard::new(spec, comparison))
            .collect();

        let category_value = match window {
            Some(window) => {
                let current = subset.period_slice(window.current)?;
                CategoricalSummarizer::mode(&current, &self.config.category.column)?
            }
            None => None,
        };

        Ok(DashboardView {
            selection: selection.clone(),
            matched_rows: subset.len(),
            window,
            charts,
            kpis,
            category: CategoryCard {
                title: self.config.category.title.clone(),
                column: self.config.category.column.clone(),
                value: category_value,
            },
        })
    }

    /// Evaluate every entity of a dimension in parallel, in sorted entity order.
    pub fn evaluate_all(
        &self,
        dimension: &str,
        choices: &PanelChoices,
    ) -> Result<Vec<DashboardView>, AnalyticsError> {
        self.table
            .entity_values(dimension)
            .par_iter()
            .map(|entity| self.evaluate(&Selection::new(dimension, entity.as_str()), choices))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::ValueFormat;

    #[test]
    fn test_panel_choices_fall_back_to_default() {
        let config = DashboardConfig::default();
        let econ = config.panel("econ").unwrap();
        let choices = PanelChoices::new().with("env", "Elec_Access");
        assert_eq!(choices.metric_for(econ), "GDP");
        let env = config.panel("env").unwrap();
        assert_eq!(choices.metric_for(env), "Elec_Access");
    }

    #[test]
    fn test_kpi_card_text() {
        let spec = KpiSpec {
            id: "gdp".into(),
            title: "GDP".into(),
            metric: "GDP".into(),
            format: ValueFormat::Scaled,
        };
        let card = KpiCard::new(
            &spec,
            Some(PeriodComparison {
                metric: "GDP".into(),
                current_mean: 2_500_000_000.0,
                prior_mean: 2_000_000_000.0,
                percent_change: 25.0,
                direction: Direction::NonNegative,
            }),
        );
        assert_eq!(card.value_text(), "2.5B");
        assert_eq!(card.subtitle(), "vs prev 2.0B (+25.0%)");

        let missing = KpiCard::new(&spec, None);
        assert_eq!(missing.value_text(), "-");
        assert_eq!(missing.subtitle(), "-");
    }
}
