//! Per-entity metric time series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month of a [`MetricSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// First day of the month.
    pub date: NaiveDate,
    /// Observed value, `None` when the month is missing.
    pub value: Option<f64>,
}

/// A metric's monthly values for one entity, ascending by date.
///
/// Dates are unique. Series are rebuilt on every query and own their data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    /// Canonical entity id.
    pub geo_id: String,
    /// Metric column name.
    pub metric: String,
    /// Points sorted ascending by date.
    pub points: Vec<SeriesPoint>,
}

impl MetricSeries {
    /// Builds a series, sorting `points` by date.
    #[must_use]
    pub fn new(geo_id: impl Into<String>, metric: impl Into<String>, mut points: Vec<SeriesPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            geo_id: geo_id.into(),
            metric: metric.into(),
            points,
        }
    }

    /// A series with no points.
    #[must_use]
    pub fn empty(geo_id: impl Into<String>, metric: impl Into<String>) -> Self {
        Self::new(geo_id, metric, Vec::new())
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Latest point.
    #[must_use]
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Latest date.
    #[must_use]
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.latest().map(|p| p.date)
    }

    /// Point at exactly `date`.
    #[must_use]
    pub fn point_at(&self, date: NaiveDate) -> Option<&SeriesPoint> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| &self.points[i])
    }

    /// Value at exactly `date`; `None` when the month is absent or null.
    #[must_use]
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.point_at(date).and_then(|p| p.value)
    }
}
