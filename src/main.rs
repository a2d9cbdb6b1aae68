//! Sustainview - Sustainability Dataset Analytics
//!
//! Loads the dataset once and prints the dashboard view for a selection as JSON.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};

use sustainview::data::PeriodRange;
use sustainview::{DashboardConfig, Dashboard, DataLoader, PanelChoices, Selection};

#[derive(Parser, Debug)]
#[command(name = "sustainview", version, about = "Sustainability dataset time series and KPIs")]
struct Args {
    /// Path to the dataset CSV
    path: PathBuf,

    /// TOML file overriding the built-in column mapping, panels and KPIs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grouping dimension (e.g. Continent, Country, Income_Group, SDG_Region)
    #[arg(long)]
    group: Option<String>,

    /// Entity within the grouping dimension
    #[arg(long)]
    entity: Option<String>,

    /// First year of the range (inclusive)
    #[arg(long)]
    from: Option<i32>,

    /// Last year of the range (inclusive)
    #[arg(long)]
    to: Option<i32>,

    /// Chart metric per panel, as panel=metric (e.g. econ=Inflation)
    #[arg(long = "panel", value_parser = parse_panel_choice)]
    panels: Vec<(String, String)>,

    /// Print the entity options of the grouping dimension and exit
    #[arg(long)]
    list_entities: bool,

    /// Evaluate every entity of the grouping dimension
    #[arg(long, conflicts_with = "entity")]
    all: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_panel_choice(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((panel, metric)) if !panel.is_empty() && !metric.is_empty() => {
            Ok((panel.trim().to_string(), metric.trim().to_string()))
        }
        _ => Err(format!("expected panel=metric, got '{s}'")),
    }
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{text}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let (table, _) = DataLoader::new(&config.columns)
        .load(&args.path)
        .with_context(|| format!("loading dataset {}", args.path.display()))?;

    let dashboard = Dashboard::new(&table, &config);
    let group = args.group.as_deref().unwrap_or(&config.defaults.group);
    let options = dashboard.entity_options(group);

    if args.list_entities {
        return print_json(&options, args.compact);
    }

    let choices = args
        .panels
        .iter()
        .fold(PanelChoices::new(), |choices, (panel, metric)| {
            choices.with(panel.as_str(), metric.as_str())
        });
    for (panel, _) in &args.panels {
        if config.panel(panel).is_none() {
            bail!("unknown panel '{panel}'");
        }
    }

    if args.all {
        let views = dashboard.evaluate_all(group, &choices)?;
        info!(entities = views.len(), "evaluated all entities");
        return print_json(&views, args.compact);
    }

    let Some(entity) = args.entity.clone().or(options.default) else {
        bail!("no entities available for group '{group}'");
    };

    let mut selection = Selection::new(group, entity);
    if args.from.is_some() || args.to.is_some() {
        let (first, last) = table.period_bounds().unwrap_or((i32::MIN, i32::MAX));
        selection = selection.with_range(PeriodRange::new(
            args.from.unwrap_or(first),
            args.to.unwrap_or(last),
        ));
    }

    let view = dashboard.evaluate(&selection, &choices)?;
    print_json(&view, args.compact)
}
