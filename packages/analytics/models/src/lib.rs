#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Comparison modes and result types.
//!
//! Every derived view in the dashboard (cards, tables, overlays, maps) is
//! expressed with these types so that deltas are computed in exactly one
//! place.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference year for [`ComparisonMode::SinceBaselineYear`] in the product.
pub const DEFAULT_BASELINE_YEAR: i32 = 2019;

/// Number of calendar years shown in a seasonal overlay by default.
pub const DEFAULT_OVERLAY_YEARS: usize = 6;

/// How a point is compared against its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// The raw value, no baseline.
    Value,
    /// Against exactly one calendar month earlier.
    #[serde(rename = "mom")]
    MoM,
    /// Against exactly twelve calendar months earlier.
    #[serde(rename = "yoy")]
    YoY,
    /// Against the same calendar month of a fixed year.
    SinceBaselineYear(i32),
    /// Against the mean of the same calendar month in all prior years.
    Seasonality,
}

impl ComparisonMode {
    /// The five modes, with `baseline_year` for the fixed-year mode.
    #[must_use]
    pub const fn all(baseline_year: i32) -> [Self; 5] {
        [
            Self::Value,
            Self::MoM,
            Self::YoY,
            Self::SinceBaselineYear(baseline_year),
            Self::Seasonality,
        ]
    }

    /// Whether the mode produces a percent delta.
    #[must_use]
    pub const fn has_baseline(self) -> bool {
        !matches!(self, Self::Value)
    }

    /// Short description of the baseline, e.g. `"from last month"`.
    #[must_use]
    pub fn baseline_description(self) -> String {
        match self {
            Self::Value => "as of latest month".to_owned(),
            Self::MoM => "from last month".to_owned(),
            Self::YoY => "from last year".to_owned(),
            Self::SinceBaselineYear(year) => format!("since same month of {year}"),
            Self::Seasonality => "from historical average".to_owned(),
        }
    }
}

impl std::fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value => write!(f, "Value"),
            Self::MoM => write!(f, "MoM"),
            Self::YoY => write!(f, "YoY"),
            Self::SinceBaselineYear(year) => write!(f, "Since {year}"),
            Self::Seasonality => write!(f, "Seasonality"),
        }
    }
}

/// A string that does not name a [`ComparisonMode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown comparison mode '{0}' (expected value, mom, yoy, seasonality, since or since-YYYY)")]
pub struct ParseModeError(pub String);

impl FromStr for ComparisonMode {
    type Err = ParseModeError;

    /// Parses `value`, `mom`, `yoy`, `seasonality`, `since` (the default
    /// baseline year) or `since-YYYY` / `since_YYYY` / `since YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "value" => return Ok(Self::Value),
            "mom" => return Ok(Self::MoM),
            "yoy" => return Ok(Self::YoY),
            "seasonality" | "seasonal" => return Ok(Self::Seasonality),
            "since" => return Ok(Self::SinceBaselineYear(DEFAULT_BASELINE_YEAR)),
            _ => {}
        }

        lower
            .strip_prefix("since")
            .map(|rest| rest.trim_start_matches(['-', '_', ' ']))
            .filter(|year| year.len() == 4)
            .and_then(|year| year.parse().ok())
            .map(Self::SinceBaselineYear)
            .ok_or_else(|| ParseModeError(s.to_owned()))
    }
}

/// A point compared against its baseline.
///
/// `delta_pct` is `None` whenever either operand is missing or the baseline
/// is zero. Missing history is a normal condition, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Month being compared.
    pub point_date: NaiveDate,
    /// Value at `point_date`.
    pub raw_value: Option<f64>,
    /// Value compared against.
    pub baseline_value: Option<f64>,
    /// Month the baseline was read from, when it is a single month.
    pub baseline_date: Option<NaiveDate>,
    /// `(raw - baseline) / baseline * 100`.
    pub delta_pct: Option<f64>,
}

impl ComparisonResult {
    /// Difference in the metric's own units.
    #[must_use]
    pub fn absolute_change(&self) -> Option<f64> {
        Some(self.raw_value? - self.baseline_value?)
    }
}

/// Comparison for every point of a series, aligned date-for-date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSeries {
    /// Entity id.
    pub geo_id: String,
    /// Metric column name.
    pub metric: String,
    /// Mode applied.
    pub mode: ComparisonMode,
    /// One result per source point.
    pub points: Vec<ComparisonResult>,
}

/// Every comparison for the latest point of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    /// Entity id.
    pub geo_id: String,
    /// Metric column name.
    pub metric: String,
    /// Latest month of the series.
    pub date: NaiveDate,
    /// Value at `date`.
    pub value: Option<f64>,
    /// Month-over-month comparison.
    pub month_over_month: ComparisonResult,
    /// Year-over-year comparison.
    pub year_over_year: ComparisonResult,
    /// Year used for `since_baseline`.
    pub baseline_year: i32,
    /// Same-month-of-baseline-year comparison.
    pub since_baseline: ComparisonResult,
    /// Historical same-month average comparison.
    pub seasonality: ComparisonResult,
}

/// One calendar year of a seasonal overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalYear {
    /// Calendar year.
    pub year: i32,
    /// January..December values.
    pub months: [Option<f64>; 12],
}

/// Month-by-year pivot of a series for drawing one line per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalOverlay {
    /// Entity id.
    pub geo_id: String,
    /// Metric column name.
    pub metric: String,
    /// Years ascending; the last one is the current year.
    pub years: Vec<SeasonalYear>,
    /// Per-month mean over every overlay year except the last.
    pub historical_average: [Option<f64>; 12],
}

/// One entity's row in a [`LevelSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    /// Entity id.
    pub geo_id: String,
    /// Comparison at the snapshot date.
    pub result: ComparisonResult,
}

/// Spread of the displayed quantity across a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// Entities with a non-null displayed quantity.
    pub count: usize,
    /// Smallest displayed quantity.
    pub min: f64,
    /// Largest displayed quantity.
    pub max: f64,
}

/// All entities of a level compared at a single month (the map view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSnapshot {
    /// Metric column name.
    pub metric: String,
    /// Mode applied.
    pub mode: ComparisonMode,
    /// Snapshot month.
    pub date: NaiveDate,
    /// Entries ordered by `geo_id`.
    pub entries: Vec<SnapshotEntry>,
    /// Spread of raw values (for [`ComparisonMode::Value`]) or deltas.
    pub range: Option<ValueRange>,
}
