#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Panel loading, entity catalog, and metric queries.
//!
//! [`PanelStore`] reads each level's panel from a [`PanelSource`] once and
//! shares it read-only for the rest of the process. [`GeoCatalog`] and
//! [`MetricQueryEngine`] are thin projections over the cached panels and
//! are constructed with an explicit `Arc<PanelStore>`.

pub mod catalog;
pub mod csv_source;
mod normalize;
pub mod query;
pub mod source;
pub mod store;

pub use catalog::GeoCatalog;
pub use csv_source::CsvPanelSource;
pub use query::MetricQueryEngine;
pub use source::{MemoryPanelSource, PanelSource, RawTable, SourceError};
pub use store::PanelStore;

use chrono::NaiveDate;
use housing_market_geography_models::GeoLevel;
use thiserror::Error;

/// Column holding the panel month as `YYYYMM`.
pub const MONTH_COLUMN: &str = "month_date_yyyymm";

/// Errors that can occur while loading or querying panels.
///
/// Load failures are cached alongside successful loads, so the type is
/// [`Clone`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// The level's source could not be read or parsed.
    #[error("Data source error for {level} panel: {message}")]
    DataSource {
        /// Level whose load failed.
        level: GeoLevel,
        /// Description of what went wrong.
        message: String,
    },

    /// The source contains the same entity/month twice.
    #[error("Duplicate {level} row for {geo_id} at {}", date.format("%Y-%m"))]
    DuplicateRow {
        /// Level whose load failed.
        level: GeoLevel,
        /// Entity with the duplicate month.
        geo_id: String,
        /// Duplicated month.
        date: NaiveDate,
    },

    /// No entity with this id exists at the level.
    #[error("No {level} entity with id '{id}'")]
    NotFound {
        /// Level searched.
        level: GeoLevel,
        /// Identifier as supplied by the caller.
        id: String,
    },

    /// The panel has no column for the requested metric.
    #[error("Unknown metric '{metric}' for {level} panel")]
    UnknownMetric {
        /// Level queried.
        level: GeoLevel,
        /// Metric name as supplied by the caller.
        metric: String,
    },
}
