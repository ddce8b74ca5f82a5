#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Comparison engine for monthly metric series.
//!
//! Every derived number shown next to a metric (month-over-month,
//! year-over-year, since a baseline year, against the seasonal norm) comes
//! from [`ComparisonEngine`]. Missing history never fails a comparison; it
//! resolves to a `None` delta instead.

pub mod comparison;
pub mod seasonality;
pub mod snapshot;
pub mod summary;

pub use comparison::{ComparisonEngine, delta_pct};
pub use housing_market_analytics_models::{
    ChangeSummary, ComparisonMode, ComparisonResult, ComparisonSeries, DEFAULT_BASELINE_YEAR,
    DEFAULT_OVERLAY_YEARS, LevelSnapshot, SeasonalOverlay, SeasonalYear, SnapshotEntry,
    ValueRange,
};

/// Arithmetic mean of the values, `None` when there are none.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}
