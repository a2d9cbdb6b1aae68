//! Dashboard Configuration Module
//! Column mapping, chart panels and KPI cards, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::dashboard::ValueFormat;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Role a canonical column plays in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Grouping candidate (region, country, income bracket, ...)
    Dimension,
    /// Year-granularity time axis
    Period,
    /// Numeric indicator
    Metric,
    /// Categorical classification (mode only)
    Category,
}

/// Mapping of one raw source column onto the canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub source: String,
    pub name: String,
    pub role: ColumnRole,
    /// Rows with a missing value here are dropped, and the source column must exist.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl ColumnSpec {
    fn new(source: &str, name: &str, role: ColumnRole) -> Self {
        Self {
            source: source.to_string(),
            name: name.to_string(),
            role,
            required: false,
            label: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn labelled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Display label, falling back to the canonical name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A chart panel with a user-switchable metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub id: String,
    pub title: String,
    pub metrics: Vec<String>,
    pub default: String,
}

/// A headline indicator card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSpec {
    pub id: String,
    pub title: String,
    pub metric: String,
    #[serde(default)]
    pub format: ValueFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub title: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDefaults {
    pub group: String,
    #[serde(default)]
    pub entity: Option<String>,
}

/// Full dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub columns: Vec<ColumnSpec>,
    pub panels: Vec<PanelSpec>,
    pub kpis: Vec<KpiSpec>,
    pub category: CategorySpec,
    pub defaults: SelectionDefaults,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        use ColumnRole::*;

        let columns = vec![
            ColumnSpec::new("Continent", "Continent", Dimension)
                .required()
                .labelled("Continent"),
            ColumnSpec::new("Country Name", "Country", Dimension).labelled("Country"),
            ColumnSpec::new(
                "Income Classification (World Bank Definition)",
                "Income_Group",
                Dimension,
            )
            .labelled("Income Group"),
            ColumnSpec::new("World Regions (UN SDG Definition)", "SDG_Region", Dimension)
                .labelled("SDG Region"),
            ColumnSpec::new("Year", "Year", Period).required(),
            ColumnSpec::new(
                "Access to electricity (% of population) - EG.ELC.ACCS.ZS",
                "Elec_Access",
                Metric,
            ),
            ColumnSpec::new("GDP (current US$) - NY.GDP.MKTP.CD", "GDP", Metric),
            ColumnSpec::new(
                "Annual production-based emissions of carbon dioxide (CO2), measured in million tonnes",
                "CO2_Emissions",
                Metric,
            ),
            ColumnSpec::new(
                "Life expectancy at birth, total (years) - SP.DYN.LE00.IN",
                "Life_Exp",
                Metric,
            ),
            ColumnSpec::new(
                "Proportion of seats held by women in national parliaments (%) - SG.GEN.PARL.ZS",
                "Women_Parliament",
                Metric,
            ),
            ColumnSpec::new(
                "Adjusted savings: carbon dioxide damage (% of GNI) - NY.ADJ.DCO2.GN.ZS",
                "CO2_Damage_GNI",
                Metric,
            ),
            ColumnSpec::new(
                "Adjusted savings: natural resources depletion (% of GNI) - NY.ADJ.DRES.GN.ZS",
                "Nat_Res_Depletion",
                Metric,
            ),
            ColumnSpec::new(
                "Inflation, consumer prices (annual %) - FP.CPI.TOTL.ZG",
                "Inflation",
                Metric,
            ),
            ColumnSpec::new("Regime Type (RoW Measure Definition)", "Regime_Type", Category),
        ];

        let panel = |id: &str, title: &str, metrics: &[&str], default: &str| PanelSpec {
            id: id.to_string(),
            title: title.to_string(),
            metrics: metrics.iter().map(|m| m.to_string()).collect(),
            default: default.to_string(),
        };
        let panels = vec![
            panel(
                "env",
                "Environment Factors",
                &["CO2_Emissions", "CO2_Damage_GNI", "Elec_Access"],
                "CO2_Emissions",
            ),
            panel("econ", "Economic Trackers", &["GDP", "Inflation"], "GDP"),
            panel(
                "sdg",
                "SDG Tracker",
                &["Life_Exp", "Women_Parliament"],
                "Women_Parliament",
            ),
        ];

        let kpi = |id: &str, title: &str, metric: &str, format: ValueFormat| KpiSpec {
            id: id.to_string(),
            title: title.to_string(),
            metric: metric.to_string(),
            format,
        };
        let kpis = vec![
            kpi("co2", "CO2 Emissions (% GNI)", "CO2_Emissions", ValueFormat::Scaled),
            kpi("gdp", "GDP", "GDP", ValueFormat::Scaled),
            kpi(
                "natres",
                "Natural Resources Depletion (%)",
                "Nat_Res_Depletion",
                ValueFormat::Fixed,
            ),
            kpi("inflation", "Inflation (%)", "Inflation", ValueFormat::Fixed),
            kpi("women", "Women Representation", "Women_Parliament", ValueFormat::Fixed),
            kpi("health", "Health (Life Expectancy)", "Life_Exp", ValueFormat::Fixed),
        ];

        Self {
            columns,
            panels,
            kpis,
            category: CategorySpec {
                title: "Regime Type".to_string(),
                column: "Regime_Type".to_string(),
            },
            defaults: SelectionDefaults {
                group: "Continent".to_string(),
                entity: Some("Asia".to_string()),
            },
        }
    }
}

impl DashboardConfig {
    /// Load and validate a TOML config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural consistency of the mapping, panels and defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = self
            .columns
            .iter()
            .filter(|c| c.role == ColumnRole::Period)
            .count();
        if periods != 1 {
            return Err(ConfigError::Invalid(format!(
                "expected exactly one period column, found {periods}"
            )));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate canonical column '{}'",
                    column.name
                )));
            }
        }

        for panel in &self.panels {
            if !panel.metrics.contains(&panel.default) {
                return Err(ConfigError::Invalid(format!(
                    "panel '{}' default '{}' is not one of its metrics",
                    panel.id, panel.default
                )));
            }
        }

        if !self
            .dimensions()
            .any(|c| c.name == self.defaults.group)
        {
            return Err(ConfigError::Invalid(format!(
                "default group '{}' is not a dimension column",
                self.defaults.group
            )));
        }

        Ok(())
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns
            .iter()
            .filter(|c| c.role == ColumnRole::Dimension)
    }

    /// Display label for a dimension; "Selection" when unknown.
    pub fn dimension_label(&self, dimension: &str) -> String {
        self.dimensions()
            .find(|c| c.name == dimension)
            .map(|c| c.display_label().to_string())
            .unwrap_or_else(|| "Selection".to_string())
    }

    pub fn panel(&self, id: &str) -> Option<&PanelSpec> {
        self.panels.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.kpis.len(), 6);
        assert_eq!(config.panels.len(), 3);
        assert_eq!(config.dimension_label("Income_Group"), "Income Group");
        assert_eq!(config.dimension_label("Planet"), "Selection");
    }

    #[test]
    fn test_default_config_survives_toml() {
        let config = DashboardConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed = DashboardConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_missing_period() {
        let mut config = DashboardConfig::default();
        for column in &mut config.columns {
            if column.role == ColumnRole::Period {
                column.role = ColumnRole::Metric;
            }
        }
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let mut config = DashboardConfig::default();
        config.columns[1].name = "Continent".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_panel_default_outside_options() {
        let mut config = DashboardConfig::default();
        config.panels[1].default = "CO2_Emissions".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_kpi_format_defaults_to_fixed() {
        let text = r#"
            id = "x"
            title = "X"
            metric = "X"
        "#;
        let kpi: KpiSpec = toml::from_str(text).unwrap();
        assert_eq!(kpi.format, ValueFormat::Fixed);
    }
}
