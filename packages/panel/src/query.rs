//! Slices cached panels into per-entity metric series.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use housing_market_geography_models::GeoLevel;
use housing_market_panel_models::month::truncate_to_month;
use housing_market_panel_models::{MetricSeries, Panel, SeriesPoint};

use crate::PanelError;
use crate::store::PanelStore;

/// Answers metric time-series queries against a [`PanelStore`].
#[derive(Debug, Clone)]
pub struct MetricQueryEngine {
    store: Arc<PanelStore>,
}

impl MetricQueryEngine {
    /// Creates an engine over `store`.
    #[must_use]
    pub const fn new(store: Arc<PanelStore>) -> Self {
        Self { store }
    }

    /// Returns one series per requested id, keyed by the id as passed.
    ///
    /// Ids are canonicalized for the level first, so `"CA"` and `"06"`
    /// both find California. An id with no rows yields an empty series.
    /// Rows dated before the month of `since` are excluded. The panel is
    /// loaded and the metric checked even when `geo_ids` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownMetric`] if the panel has no such
    /// column, or the load error if the panel fails to load.
    pub fn query<S: AsRef<str>>(
        &self,
        level: GeoLevel,
        geo_ids: &[S],
        metric: &str,
        since: Option<NaiveDate>,
    ) -> Result<BTreeMap<String, MetricSeries>, PanelError> {
        let panel = self.store.load(level)?;
        let metric_index = metric_index(&panel, metric)?;

        Ok(geo_ids
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                let geo_id = level
                    .canonical_id(raw)
                    .unwrap_or_else(|| raw.trim().to_owned());
                let series = slice(&panel, geo_id, metric, metric_index, since);
                (raw.to_owned(), series)
            })
            .collect())
    }

    /// Single-entity form of [`MetricQueryEngine::query`].
    ///
    /// # Errors
    ///
    /// See [`MetricQueryEngine::query`].
    pub fn query_one(
        &self,
        level: GeoLevel,
        geo_id: &str,
        metric: &str,
        since: Option<NaiveDate>,
    ) -> Result<MetricSeries, PanelError> {
        let mut series = self.query(level, &[geo_id], metric, since)?;
        Ok(series
            .remove(geo_id)
            .unwrap_or_else(|| MetricSeries::empty(geo_id, metric)))
    }

    /// Returns the series of every entity at `level`, keyed by `geo_id`.
    ///
    /// # Errors
    ///
    /// See [`MetricQueryEngine::query`].
    pub fn query_level(
        &self,
        level: GeoLevel,
        metric: &str,
        since: Option<NaiveDate>,
    ) -> Result<BTreeMap<String, MetricSeries>, PanelError> {
        let panel = self.store.load(level)?;
        let metric_index = metric_index(&panel, metric)?;

        Ok(panel
            .geo_ids()
            .map(|id| {
                (
                    id.to_owned(),
                    slice(&panel, id.to_owned(), metric, metric_index, since),
                )
            })
            .collect())
    }

    /// Earliest and latest month in the level's panel.
    ///
    /// # Errors
    ///
    /// Returns the load error if the panel fails to load.
    pub fn date_range(&self, level: GeoLevel) -> Result<Option<(NaiveDate, NaiveDate)>, PanelError> {
        Ok(self.store.load(level)?.date_range())
    }

    /// Latest month in the level's panel.
    ///
    /// # Errors
    ///
    /// Returns the load error if the panel fails to load.
    pub fn latest_date(&self, level: GeoLevel) -> Result<Option<NaiveDate>, PanelError> {
        Ok(self.store.load(level)?.latest_date())
    }
}

fn metric_index(panel: &Panel, metric: &str) -> Result<usize, PanelError> {
    panel
        .metric_index(metric)
        .ok_or_else(|| PanelError::UnknownMetric {
            level: panel.level(),
            metric: metric.to_owned(),
        })
}

fn slice(
    panel: &Panel,
    geo_id: String,
    metric: &str,
    metric_index: usize,
    since: Option<NaiveDate>,
) -> MetricSeries {
    let floor = since.map(truncate_to_month);
    let points = panel
        .rows_for(&geo_id)
        .filter(|r| floor.is_none_or(|floor| r.date >= floor))
        .map(|r| SeriesPoint {
            date: r.date,
            value: Panel::value(r, metric_index),
        })
        .collect();

    MetricSeries::new(geo_id, metric, points)
}

#[cfg(test)]
mod tests {
    use housing_market_panel_models::month::month_start;

    use super::*;
    use crate::source::MemoryPanelSource;

    fn engine() -> MetricQueryEngine {
        let source = MemoryPanelSource::new()
            .with_csv(
                GeoLevel::State,
                "month_date_yyyymm,state,active_listing_count,median_listing_price\n\
                 202401,California,50000,750000\n\
                 202301,California,45000,\n\
                 202312,California,48000,740000\n\
                 202401,Texas,90000,350000\n",
            )
            .unwrap()
            .with_csv(
                GeoLevel::Zip,
                "month_date_yyyymm,postal_code,zip_name,active_listing_count\n\
                 202401,90210,\"beverly hills, ca\",120\n",
            )
            .unwrap();
        MetricQueryEngine::new(Arc::new(PanelStore::new(source)))
    }

    #[test]
    fn returns_sorted_series_keyed_by_requested_id() {
        let result = engine()
            .query(GeoLevel::State, &["CA", "48"], "active_listing_count", None)
            .unwrap();

        let ca = &result["CA"];
        assert_eq!(ca.geo_id, "06");
        let dates: Vec<_> = ca.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                month_start(2023, 1).unwrap(),
                month_start(2023, 12).unwrap(),
                month_start(2024, 1).unwrap(),
            ]
        );
        assert_eq!(result["48"].len(), 1);
    }

    #[test]
    fn applies_date_floor() {
        let series = engine()
            .query_one(
                GeoLevel::State,
                "California",
                "active_listing_count",
                month_start(2023, 12),
            )
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].value, Some(48000.0));
    }

    #[test]
    fn mid_month_floor_keeps_that_month() {
        let series = engine()
            .query_one(
                GeoLevel::State,
                "CA",
                "active_listing_count",
                NaiveDate::from_ymd_opt(2023, 12, 15),
            )
            .unwrap();
        let dates: Vec<_> = series.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![month_start(2023, 12).unwrap(), month_start(2024, 1).unwrap()]
        );
    }

    #[test]
    fn empty_id_list_still_loads_the_panel() {
        let engine = engine();
        let result = engine
            .query::<&str>(GeoLevel::State, &[], "active_listing_count", None)
            .unwrap();
        assert!(result.is_empty());

        assert!(matches!(
            engine.query::<&str>(GeoLevel::Metro, &[], "active_listing_count", None),
            Err(PanelError::DataSource { level: GeoLevel::Metro, .. })
        ));
        assert!(matches!(
            engine.query::<&str>(GeoLevel::State, &[], "no_such_metric", None),
            Err(PanelError::UnknownMetric { .. })
        ));
    }

    #[test]
    fn keeps_missing_values_as_none() {
        let series = engine()
            .query_one(GeoLevel::State, "06", "median_listing_price", None)
            .unwrap();
        assert_eq!(series.points[0].value, None);
    }

    #[test]
    fn zip_without_rows_is_empty_not_error() {
        let result = engine()
            .query(GeoLevel::Zip, &["00501"], "active_listing_count", None)
            .unwrap();
        assert!(result["00501"].is_empty());
    }

    #[test]
    fn unknown_metric_is_an_error() {
        let err = engine()
            .query(GeoLevel::Zip, &["90210"], "median_listing_price", None)
            .unwrap_err();
        assert!(matches!(err, PanelError::UnknownMetric { .. }));
    }

    #[test]
    fn query_does_not_mutate_the_panel() {
        let engine = engine();
        let mut first = engine
            .query_one(GeoLevel::State, "CA", "active_listing_count", None)
            .unwrap();
        first.points.clear();
        let second = engine
            .query_one(GeoLevel::State, "CA", "active_listing_count", None)
            .unwrap();
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn queries_every_entity_in_a_level() {
        let engine = engine();
        let all = engine
            .query_level(GeoLevel::State, "median_listing_price", None)
            .unwrap();
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["06", "48"]);
        assert_eq!(
            engine.latest_date(GeoLevel::State).unwrap(),
            month_start(2024, 1)
        );
    }
}
