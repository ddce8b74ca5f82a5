//! Subcommand implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use housing_market_analytics::ComparisonEngine;
use housing_market_analytics_models::{ComparisonMode, ParseModeError};
use housing_market_format::{MetricFamily, MetricFormatter};
use housing_market_geography_models::{GeoEntity, GeoLevel};
use housing_market_panel::{GeoCatalog, MetricQueryEngine, PanelError, PanelStore};
use housing_market_panel_models::{Metric, Period};
use serde::Serialize;
use thiserror::Error;

use crate::config::AppConfig;
use crate::render;

/// Errors surfaced by a subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Loading or querying a panel failed.
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// The `--mode` value is not a comparison mode.
    #[error(transparent)]
    Mode(#[from] ParseModeError),

    /// JSON output could not be produced.
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelInfo {
    level: GeoLevel,
    label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricInfo {
    metric: Metric,
    title: &'static str,
    family: MetricFamily,
}

/// Shared engines for one invocation.
pub struct Context {
    catalog: GeoCatalog,
    queries: MetricQueryEngine,
    comparisons: ComparisonEngine,
    baseline_year: i32,
    json: bool,
}

impl Context {
    /// Builds the engines over the CSV source described by `config`.
    #[must_use]
    pub fn new(config: &AppConfig, json: bool) -> Self {
        let store = Arc::new(PanelStore::new(config.source()));
        Self {
            catalog: GeoCatalog::new(Arc::clone(&store)),
            queries: MetricQueryEngine::new(store),
            comparisons: ComparisonEngine::new(),
            baseline_year: config.baseline_year,
            json,
        }
    }

    /// Parses a comparison mode, reading a bare `since` as the configured
    /// baseline year.
    ///
    /// # Errors
    ///
    /// Returns [`ParseModeError`] for an unknown mode.
    pub fn parse_mode(&self, raw: &str) -> Result<ComparisonMode, ParseModeError> {
        if raw.trim().eq_ignore_ascii_case("since") {
            return Ok(ComparisonMode::SinceBaselineYear(self.baseline_year));
        }
        raw.parse()
    }

    /// JSON for `value` under `--json`, otherwise the text table.
    fn emit<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> Result<String, CommandError> {
        if self.json {
            Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
        } else {
            Ok(text())
        }
    }

    /// Resolves `id` for display. An id the level does not know is shown
    /// as itself, and its series is empty.
    fn entity(&self, level: GeoLevel, id: &str) -> Result<GeoEntity, CommandError> {
        match self.catalog.resolve(level, id) {
            Ok(entity) => Ok(entity),
            Err(PanelError::NotFound { .. }) => {
                log::warn!("No {level} entity '{id}'");
                Ok(GeoEntity::new(level, id.trim(), id.trim()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn levels(&self) -> Result<String, CommandError> {
        let levels: Vec<LevelInfo> = GeoLevel::all()
            .iter()
            .map(|&level| LevelInfo {
                level,
                label: level.label(),
            })
            .collect();

        self.emit(&levels, || {
            levels
                .iter()
                .map(|l| format!("{:<10} {}\n", l.level, l.label))
                .collect()
        })
    }

    pub fn metrics(&self) -> Result<String, CommandError> {
        let metrics: Vec<MetricInfo> = Metric::all()
            .iter()
            .map(|&metric| MetricInfo {
                metric,
                title: metric.title(),
                family: MetricFormatter::classify(metric.column()),
            })
            .collect();

        self.emit(&metrics, || {
            metrics
                .iter()
                .map(|m| format!("{:<38} {:<24} {}\n", m.metric, m.title, m.family))
                .collect()
        })
    }

    pub fn entities(&self, level: GeoLevel, limit: Option<usize>) -> Result<String, CommandError> {
        let mut entities = self.catalog.list_entities(level)?;
        if let Some(limit) = limit {
            entities.truncate(limit);
        }

        self.emit(&entities, || render::entities(&entities))
    }

    pub fn series(
        &self,
        level: GeoLevel,
        ids: &[String],
        metric: &str,
        since: Option<NaiveDate>,
        period: Option<Period>,
    ) -> Result<String, CommandError> {
        let since = match (since, period) {
            (Some(since), _) => Some(since),
            (None, Some(period)) => self
                .queries
                .latest_date(level)?
                .and_then(|latest| period.since(latest)),
            (None, None) => None,
        };

        let entities = self.resolve_all(level, ids)?;
        let series = self.queries.query(level, ids, metric, since)?;

        self.emit(&series, || {
            entities
                .iter()
                .zip(ids)
                .filter_map(|(entity, id)| series.get(id).map(|s| render::series(entity, s)))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn compare(
        &self,
        level: GeoLevel,
        id: &str,
        metric: &str,
        mode: ComparisonMode,
        at: Option<NaiveDate>,
        all: bool,
    ) -> Result<String, CommandError> {
        let entity = self.entity(level, id)?;
        let series = self.queries.query_one(level, id, metric, None)?;

        if all {
            let batch = self.comparisons.compare_series(&series, mode);
            return self.emit(&batch, || {
                render::comparisons(&entity, metric, mode, &batch.points)
            });
        }

        let result = match at {
            Some(at) => Some(self.comparisons.compare(&series, mode, at)),
            None => self.comparisons.compare_latest(&series, mode),
        };
        let results: Vec<_> = result.into_iter().collect();

        self.emit(&result, || render::comparisons(&entity, metric, mode, &results))
    }

    pub fn summary(
        &self,
        level: GeoLevel,
        id: &str,
        metric: Option<&str>,
    ) -> Result<String, CommandError> {
        let entity = self.entity(level, id)?;
        let columns: Vec<&str> = metric.map_or_else(
            || Metric::all().iter().map(|m| m.column()).collect(),
            |metric| vec![metric],
        );

        let mut summaries = Vec::with_capacity(columns.len());
        for column in columns {
            let series = match self.queries.query_one(level, id, column, None) {
                Ok(series) => series,
                Err(PanelError::UnknownMetric { .. }) if metric.is_none() => {
                    log::warn!("{level} panel has no {column} column, skipping");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            summaries.extend(self.comparisons.change_summary(&series, self.baseline_year));
        }

        self.emit(&summaries, || render::summaries(&entity, &summaries))
    }

    pub fn seasonal(
        &self,
        level: GeoLevel,
        id: &str,
        metric: &str,
        years: usize,
    ) -> Result<String, CommandError> {
        let entity = self.entity(level, id)?;
        let series = self.queries.query_one(level, id, metric, None)?;
        let overlay = self.comparisons.seasonal_overlay(&series, years);

        self.emit(&overlay, || {
            overlay.as_ref().map_or_else(
                || format!("{}\n  No data available\n", entity.display_name),
                |overlay| render::overlay(&entity, overlay),
            )
        })
    }

    pub fn snapshot(
        &self,
        level: GeoLevel,
        metric: &str,
        mode: ComparisonMode,
        at: Option<NaiveDate>,
        limit: Option<usize>,
    ) -> Result<String, CommandError> {
        let series = self.queries.query_level(level, metric, None)?;
        let snapshot = self.comparisons.level_snapshot(&series, mode, at);
        let names: BTreeMap<String, String> = self
            .catalog
            .list_entities(level)?
            .into_iter()
            .map(|e| (e.id, e.display_name))
            .collect();

        self.emit(&snapshot, || {
            snapshot.as_ref().map_or_else(
                || format!("No {level} data available for {metric}\n"),
                |snapshot| render::snapshot(snapshot, &names, limit),
            )
        })
    }

    fn resolve_all(&self, level: GeoLevel, ids: &[String]) -> Result<Vec<GeoEntity>, CommandError> {
        ids.iter().map(|id| self.entity(level, id)).collect()
    }
}
