#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Display formatting for metric values, deltas, and absolute changes.

use housing_market_panel_models::Metric;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How a metric's values are presented.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricFamily {
    /// Dollar amounts.
    Currency,
    /// Dimensionless ratios.
    Ratio,
    /// Counts and everything else.
    Count,
}

/// Decimal places and prefix for a metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatHint {
    /// Digits after the decimal point.
    pub decimals: usize,
    /// Prepended to the number, after any sign.
    pub prefix: &'static str,
}

/// Placeholder for a missing value.
pub const MISSING_VALUE: &str = "N/A";

/// Placeholder for a missing delta or change.
pub const MISSING_DELTA: &str = "-";

/// Formats metric values for display.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricFormatter;

impl MetricFormatter {
    /// Classifies a metric column name. Unknown names are counts.
    #[must_use]
    pub fn classify(metric: &str) -> MetricFamily {
        match Metric::from_column(metric) {
            Some(
                Metric::MedianListingPrice
                | Metric::AverageListingPrice
                | Metric::MedianListingPricePerSquareFoot,
            ) => MetricFamily::Currency,
            Some(Metric::PendingRatio) => MetricFamily::Ratio,
            _ => MetricFamily::Count,
        }
    }

    /// Formatting hint for a metric column name.
    #[must_use]
    pub fn hint(metric: &str) -> FormatHint {
        match Self::classify(metric) {
            MetricFamily::Currency => FormatHint {
                decimals: 0,
                prefix: "$",
            },
            MetricFamily::Ratio => FormatHint {
                decimals: 2,
                prefix: "",
            },
            MetricFamily::Count => FormatHint {
                decimals: 0,
                prefix: "",
            },
        }
    }

    /// `"$412,000"`, `"0.53"`, `"1,234"`, or [`MISSING_VALUE`].
    #[must_use]
    pub fn format_value(value: Option<f64>, metric: &str) -> String {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return MISSING_VALUE.to_owned();
        };

        let hint = Self::hint(metric);
        let digits = group_thousands(value.abs(), hint.decimals);
        let sign = if value < 0.0 && !is_zero(&digits) { "-" } else { "" };

        format!("{sign}{}{digits}", hint.prefix)
    }

    /// Signed percent with one decimal, e.g. `"+14.3%"`.
    #[must_use]
    pub fn format_delta(delta_pct: Option<f64>) -> String {
        delta_pct
            .filter(|d| d.is_finite())
            .map_or_else(|| MISSING_DELTA.to_owned(), |d| format!("{d:+.1}%"))
    }

    /// Signed change in the metric's own units, e.g. `"+$5,000"`.
    #[must_use]
    pub fn format_change(change: Option<f64>, metric: &str) -> String {
        let Some(change) = change.filter(|c| c.is_finite()) else {
            return MISSING_DELTA.to_owned();
        };

        let hint = Self::hint(metric);
        let digits = group_thousands(change.abs(), hint.decimals);
        let sign = if change < 0.0 && !is_zero(&digits) { '-' } else { '+' };

        format!("{sign}{}{digits}", hint.prefix)
    }
}

/// Formats a non-negative number with `decimals` places and comma
/// separators in the integer part.
fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let grouped = integer.parse::<u128>().map_or_else(
        |_| integer.to_owned(),
        |n| n.to_formatted_string(&Locale::en),
    );

    if fraction.is_empty() {
        grouped
    } else {
        format!("{grouped}.{fraction}")
    }
}

fn is_zero(digits: &str) -> bool {
    digits.chars().all(|c| matches!(c, '0' | ',' | '.'))
}
