#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Monthly listing-panel types.
//!
//! A [`Panel`] is the full month-by-entity table for one geo level. Queries
//! slice it into [`MetricSeries`] values, which are what every comparison
//! and formatting step downstream consumes.

pub mod month;
pub mod panel;
pub mod period;
pub mod series;

pub use panel::{DuplicateRecordError, Panel, PanelBuilder, PanelRecord};
pub use period::Period;
pub use series::{MetricSeries, SeriesPoint};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// The twelve listing metrics published in every panel.
///
/// The string form of each variant is the panel column name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Listings active during the month.
    ActiveListingCount,
    /// Listings that came on the market during the month.
    NewListingCount,
    /// Listings under contract.
    PendingListingCount,
    /// Active plus pending listings.
    TotalListingCount,
    /// Pending listings divided by active listings.
    PendingRatio,
    /// Median asking price.
    MedianListingPrice,
    /// Mean asking price.
    AverageListingPrice,
    /// Median home size.
    MedianSquareFeet,
    /// Median asking price per square foot.
    MedianListingPricePerSquareFoot,
    /// Median days a listing stays active.
    MedianDaysOnMarket,
    /// Listings with a price increase during the month.
    PriceIncreasedCount,
    /// Listings with a price reduction during the month.
    PriceReducedCount,
}

impl Metric {
    /// Returns all metrics in dashboard order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ActiveListingCount,
            Self::NewListingCount,
            Self::PendingListingCount,
            Self::TotalListingCount,
            Self::PendingRatio,
            Self::MedianListingPrice,
            Self::AverageListingPrice,
            Self::MedianSquareFeet,
            Self::MedianListingPricePerSquareFoot,
            Self::MedianDaysOnMarket,
            Self::PriceIncreasedCount,
            Self::PriceReducedCount,
        ]
    }

    /// Panel column name.
    #[must_use]
    pub fn column(self) -> &'static str {
        self.into()
    }

    /// Display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ActiveListingCount => "Active Listing Count",
            Self::NewListingCount => "New Listing Count",
            Self::PendingListingCount => "Pending Listing Count",
            Self::TotalListingCount => "Total Listing Count",
            Self::PendingRatio => "Pending Ratio",
            Self::MedianListingPrice => "Median Listing Price",
            Self::AverageListingPrice => "Average Listing Price",
            Self::MedianSquareFeet => "Median Square Feet",
            Self::MedianListingPricePerSquareFoot => "Price per Square Foot",
            Self::MedianDaysOnMarket => "Median Days on Market",
            Self::PriceIncreasedCount => "Price Increased Count",
            Self::PriceReducedCount => "Price Reduced Count",
        }
    }

    /// Looks up a metric by column name.
    #[must_use]
    pub fn from_column(column: &str) -> Option<Self> {
        column.trim().parse().ok()
    }
}
