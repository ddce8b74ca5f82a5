#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for exploring monthly housing inventory metrics.

mod commands;
mod config;
mod render;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use housing_market_analytics_models::DEFAULT_OVERLAY_YEARS;
use housing_market_geography_models::GeoLevel;
use housing_market_panel_models::Period;
use housing_market_panel_models::month::parse_month;

use crate::commands::Context;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "housing_market", about = "Monthly housing inventory metrics by geography")]
struct Cli {
    /// Path to a TOML config file (defaults to `housing_market.toml` if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the panel CSV files (overrides the config and
    /// `HOUSING_MARKET_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the geographic levels
    Levels,
    /// List the metrics with their titles and formatting family
    Metrics,
    /// List the entities of a level, sorted by name
    Entities {
        /// Geographic level (country, state, metro, county, zip)
        level: GeoLevel,
        /// Maximum number of entities to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the monthly series of one or more entities
    Series {
        /// Geographic level
        level: GeoLevel,
        /// Entity ids (e.g. "CA", "06", "California" for a state)
        #[arg(required = true)]
        ids: Vec<String>,
        /// Metric column (e.g. `median_listing_price`)
        #[arg(long)]
        metric: String,
        /// First month to include (YYYY-MM)
        #[arg(long, value_parser = parse_month_arg, conflicts_with = "period")]
        since: Option<NaiveDate>,
        /// Time window ending at the level's latest month (3M, 6M, YTD, 1Y, 5Y, Max)
        #[arg(long)]
        period: Option<Period>,
    },
    /// Compare an entity's metric against a baseline
    Compare {
        /// Geographic level
        level: GeoLevel,
        /// Entity id
        id: String,
        /// Metric column
        #[arg(long)]
        metric: String,
        /// Comparison mode (value, mom, yoy, seasonality, since, since-YYYY)
        #[arg(long, default_value = "yoy")]
        mode: String,
        /// Month to compare (YYYY-MM). Defaults to the latest month.
        #[arg(long, value_parser = parse_month_arg, conflicts_with = "all")]
        at: Option<NaiveDate>,
        /// Compare every month of the series
        #[arg(long)]
        all: bool,
    },
    /// Latest value with every comparison, per metric
    Summary {
        /// Geographic level
        level: GeoLevel,
        /// Entity id
        id: String,
        /// Metric column. All metrics when omitted.
        #[arg(long)]
        metric: Option<String>,
    },
    /// Month-by-year table with the historical monthly average
    Seasonal {
        /// Geographic level
        level: GeoLevel,
        /// Entity id
        id: String,
        /// Metric column
        #[arg(long)]
        metric: String,
        /// Number of most recent calendar years to show
        #[arg(long, default_value_t = DEFAULT_OVERLAY_YEARS)]
        years: usize,
    },
    /// Compare every entity of a level at one month
    Snapshot {
        /// Geographic level
        level: GeoLevel,
        /// Metric column
        #[arg(long)]
        metric: String,
        /// Comparison mode (value, mom, yoy, seasonality, since, since-YYYY)
        #[arg(long, default_value = "value")]
        mode: String,
        /// Month to compare (YYYY-MM). Defaults to the latest month.
        #[arg(long, value_parser = parse_month_arg)]
        at: Option<NaiveDate>,
        /// Maximum number of entities to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn parse_month_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_month(raw).ok_or_else(|| format!("expected a month like 2024-01, got '{raw}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    log::debug!("Using data directory {}", config.data_dir.display());

    let ctx = Context::new(&config, cli.json);

    let output = match cli.command {
        Commands::Levels => ctx.levels()?,
        Commands::Metrics => ctx.metrics()?,
        Commands::Entities { level, limit } => ctx.entities(level, limit)?,
        Commands::Series {
            level,
            ids,
            metric,
            since,
            period,
        } => ctx.series(level, &ids, &metric, since, period)?,
        Commands::Compare {
            level,
            id,
            metric,
            mode,
            at,
            all,
        } => ctx.compare(level, &id, &metric, ctx.parse_mode(&mode)?, at, all)?,
        Commands::Summary { level, id, metric } => ctx.summary(level, &id, metric.as_deref())?,
        Commands::Seasonal {
            level,
            id,
            metric,
            years,
        } => ctx.seasonal(level, &id, &metric, years)?,
        Commands::Snapshot {
            level,
            metric,
            mode,
            at,
            limit,
        } => ctx.snapshot(level, &metric, ctx.parse_mode(&mode)?, at, limit)?,
    };
    print!("{output}");

    Ok(())
}
