//! Cross-entity comparison at a single month.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use housing_market_analytics_models::{ComparisonMode, LevelSnapshot, SnapshotEntry, ValueRange};
use housing_market_panel_models::MetricSeries;
use housing_market_panel_models::month::truncate_to_month;

use crate::ComparisonEngine;

impl ComparisonEngine {
    /// Compares every entity's series at `date` under `mode`.
    ///
    /// `date` defaults to the latest month across all series. The range
    /// covers raw values for [`ComparisonMode::Value`] and deltas for the
    /// other modes. Returns `None` when there is nothing to compare.
    #[must_use]
    pub fn level_snapshot(
        &self,
        series_by_entity: &BTreeMap<String, MetricSeries>,
        mode: ComparisonMode,
        date: Option<NaiveDate>,
    ) -> Option<LevelSnapshot> {
        let metric = series_by_entity.values().next()?.metric.clone();
        let date = truncate_to_month(date.or_else(|| {
            series_by_entity
                .values()
                .filter_map(MetricSeries::latest_date)
                .max()
        })?);

        let entries: Vec<SnapshotEntry> = series_by_entity
            .iter()
            .map(|(geo_id, series)| SnapshotEntry {
                geo_id: geo_id.clone(),
                result: self.compare(series, mode, date),
            })
            .collect();

        let range = value_range(entries.iter().filter_map(|entry| {
            if mode.has_baseline() {
                entry.result.delta_pct
            } else {
                entry.result.raw_value
            }
        }));

        Some(LevelSnapshot {
            metric,
            mode,
            date,
            entries,
            range,
        })
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<ValueRange> {
    values.fold(None, |range, v| {
        Some(range.map_or(
            ValueRange {
                count: 1,
                min: v,
                max: v,
            },
            |r: ValueRange| ValueRange {
                count: r.count + 1,
                min: r.min.min(v),
                max: r.max.max(v),
            },
        ))
    })
}
