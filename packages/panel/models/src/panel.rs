//! The immutable per-level panel and its builder.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use housing_market_geography_models::GeoLevel;

/// One month of metric values for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRecord {
    /// Canonical entity id.
    pub geo_id: String,
    /// First day of the month.
    pub date: NaiveDate,
    /// Metric values aligned with [`Panel::metrics`]. `None` is a missing
    /// observation, never zero.
    pub values: Vec<Option<f64>>,
}

/// Two source rows share the same `(geo_id, date)` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecordError {
    /// Entity the duplicate belongs to.
    pub geo_id: String,
    /// Month that appears more than once.
    pub date: NaiveDate,
}

impl std::fmt::Display for DuplicateRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "duplicate record for {} at {}",
            self.geo_id,
            self.date.format("%Y-%m")
        )
    }
}

impl std::error::Error for DuplicateRecordError {}

/// Accumulates records for a [`Panel`] and validates them on
/// [`PanelBuilder::build`].
#[derive(Debug)]
pub struct PanelBuilder {
    level: GeoLevel,
    metrics: Vec<String>,
    records: Vec<PanelRecord>,
    /// Latest-dated display name seen per entity.
    names: BTreeMap<String, (NaiveDate, String)>,
    dropped_rows: usize,
}

impl PanelBuilder {
    /// Creates a builder for `level` whose records carry values for
    /// `metrics`, in that order.
    #[must_use]
    pub const fn new(level: GeoLevel, metrics: Vec<String>) -> Self {
        Self {
            level,
            metrics,
            records: Vec::new(),
            names: BTreeMap::new(),
            dropped_rows: 0,
        }
    }

    /// Metric columns, in value order.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Adds a record. The display name replaces any earlier-dated name for
    /// the same entity.
    pub fn push(&mut self, mut record: PanelRecord, display_name: &str) {
        record.values.resize(self.metrics.len(), None);

        let newer = self
            .names
            .get(&record.geo_id)
            .is_none_or(|(date, _)| record.date >= *date);
        if newer {
            self.names.insert(
                record.geo_id.clone(),
                (record.date, display_name.to_owned()),
            );
        }

        self.records.push(record);
    }

    /// Counts a source row that was discarded before becoming a record.
    pub const fn drop_row(&mut self) {
        self.dropped_rows += 1;
    }

    /// Number of rows discarded so far.
    #[must_use]
    pub const fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Sorts, indexes, and freezes the panel.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateRecordError`] for the first `(geo_id, date)` key
    /// that occurs more than once.
    pub fn build(mut self, version: u64) -> Result<Panel, DuplicateRecordError> {
        self.records.sort_unstable_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.geo_id.cmp(&b.geo_id))
        });

        if let Some(pair) = self
            .records
            .windows(2)
            .find(|pair| pair[0].date == pair[1].date && pair[0].geo_id == pair[1].geo_id)
        {
            return Err(DuplicateRecordError {
                geo_id: pair[0].geo_id.clone(),
                date: pair[0].date,
            });
        }

        let mut by_geo: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, record) in self.records.iter().enumerate() {
            by_geo.entry(record.geo_id.clone()).or_default().push(i);
        }

        let names = self
            .names
            .into_iter()
            .map(|(id, (_, name))| (id, name))
            .collect();

        Ok(Panel {
            level: self.level,
            version,
            metrics: self.metrics,
            records: self.records,
            by_geo,
            names,
            dropped_rows: self.dropped_rows,
        })
    }
}

/// All monthly records for one geo level.
///
/// Records are ordered by date (then `geo_id`) and indexed by `geo_id`.
/// A panel is never mutated after [`PanelBuilder::build`].
#[derive(Debug)]
pub struct Panel {
    level: GeoLevel,
    version: u64,
    metrics: Vec<String>,
    records: Vec<PanelRecord>,
    /// Record indices per entity, ascending by date.
    by_geo: BTreeMap<String, Vec<usize>>,
    names: BTreeMap<String, String>,
    dropped_rows: usize,
}

impl Panel {
    /// Geo level of every record.
    #[must_use]
    pub const fn level(&self) -> GeoLevel {
        self.level
    }

    /// Load stamp, unique per load within a process.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Metric columns carried by each record.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Position of `metric` within each record's values.
    #[must_use]
    pub fn metric_index(&self, metric: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m == metric)
    }

    /// All records, ordered by date then `geo_id`.
    #[must_use]
    pub fn records(&self) -> &[PanelRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the panel holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Source rows dropped because no `geo_id` could be derived.
    #[must_use]
    pub const fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Distinct entity ids, ascending.
    pub fn geo_ids(&self) -> impl Iterator<Item = &str> {
        self.by_geo.keys().map(String::as_str)
    }

    /// `(geo_id, display_name)` for every entity.
    pub fn names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    /// Display name of one entity.
    #[must_use]
    pub fn display_name(&self, geo_id: &str) -> Option<&str> {
        self.names.get(geo_id).map(String::as_str)
    }

    /// Whether the panel has any record for `geo_id`.
    #[must_use]
    pub fn contains(&self, geo_id: &str) -> bool {
        self.by_geo.contains_key(geo_id)
    }

    /// Records for one entity, ascending by date.
    pub fn rows_for<'a>(&'a self, geo_id: &str) -> impl Iterator<Item = &'a PanelRecord> + 'a {
        self.by_geo
            .get(geo_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.records[i])
    }

    /// Value of the metric at `metric_index` in `record`.
    #[must_use]
    pub fn value(record: &PanelRecord, metric_index: usize) -> Option<f64> {
        record.values.get(metric_index).copied().flatten()
    }

    /// Earliest and latest month in the panel.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }

    /// Latest month in the panel.
    #[must_use]
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}
