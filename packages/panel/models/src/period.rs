//! Date-range presets relative to the latest month of a panel.

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::month::{month_start, shift_months};

/// A lookback window ending at the panel's latest month.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Period {
    /// Last three months.
    #[serde(rename = "3M")]
    #[strum(serialize = "3M")]
    ThreeMonths,
    /// Last six months.
    #[serde(rename = "6M")]
    #[strum(serialize = "6M")]
    SixMonths,
    /// Since January of the latest year.
    #[serde(rename = "YTD")]
    #[strum(serialize = "YTD")]
    YearToDate,
    /// Last twelve months.
    #[serde(rename = "1Y")]
    #[strum(serialize = "1Y")]
    OneYear,
    /// Last five years.
    #[serde(rename = "5Y")]
    #[strum(serialize = "5Y")]
    FiveYears,
    /// Entire history.
    #[serde(rename = "Max")]
    #[strum(serialize = "Max")]
    Max,
}

impl Period {
    /// Returns all presets, shortest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ThreeMonths,
            Self::SixMonths,
            Self::YearToDate,
            Self::OneYear,
            Self::FiveYears,
            Self::Max,
        ]
    }

    /// Inclusive date floor for this window, or `None` for [`Period::Max`].
    #[must_use]
    pub fn since(self, latest: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::ThreeMonths => shift_months(latest, -3),
            Self::SixMonths => shift_months(latest, -6),
            Self::YearToDate => month_start(latest.year(), 1),
            Self::OneYear => shift_months(latest, -12),
            Self::FiveYears => shift_months(latest, -60),
            Self::Max => None,
        }
    }
}
