//! The seam between the engine and wherever panel tables come from.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;

use housing_market_geography_models::GeoLevel;
use thiserror::Error;

/// Errors raised by a [`PanelSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the underlying bytes failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file backing a level does not exist.
    #[error("Panel file not found: {}", path.display())]
    MissingFile {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The source has nothing for this level.
    #[error("No panel available for {level}")]
    Unavailable {
        /// Level requested.
        level: GeoLevel,
    },

    /// The table has no header row.
    #[error("Panel table contains no header row")]
    NoHeader,
}

/// A header row plus string cells, exactly as the source provided them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Creates a table from already-split cells.
    #[must_use]
    pub const fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parses CSV with a header row. Headers and cells are trimmed and
    /// rows may have differing lengths.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the CSV is malformed or has no header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        if headers.iter().all(String::is_empty) {
            return Err(SourceError::NoHeader);
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_owned).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Parses CSV text. See [`RawTable::from_reader`].
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the CSV is malformed or has no header.
    pub fn from_csv_str(csv: &str) -> Result<Self, SourceError> {
        Self::from_reader(csv.as_bytes())
    }

    /// Column names.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of a column by exact name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Supplies the raw monthly table for a geo level.
///
/// Implementations may block (file or network I/O); [`crate::PanelStore`]
/// calls [`PanelSource::read`] at most once per level.
pub trait PanelSource: Send + Sync {
    /// Reads the full table for `level`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the table cannot be produced.
    fn read(&self, level: GeoLevel) -> Result<RawTable, SourceError>;
}

/// A [`PanelSource`] backed by tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPanelSource {
    tables: BTreeMap<GeoLevel, RawTable>,
}

impl MemoryPanelSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the table for `level`.
    #[must_use]
    pub fn with_table(mut self, level: GeoLevel, table: RawTable) -> Self {
        self.tables.insert(level, table);
        self
    }

    /// Registers CSV text for `level`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the CSV cannot be parsed.
    pub fn with_csv(self, level: GeoLevel, csv: &str) -> Result<Self, SourceError> {
        Ok(self.with_table(level, RawTable::from_csv_str(csv)?))
    }
}

impl PanelSource for MemoryPanelSource {
    fn read(&self, level: GeoLevel) -> Result<RawTable, SourceError> {
        self.tables
            .get(&level)
            .cloned()
            .ok_or(SourceError::Unavailable { level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_flexible_csv() {
        let table = RawTable::from_csv_str(
            " month_date_yyyymm , state ,active_listing_count\n202401, California ,50000\n202312,Texas\n",
        )
        .unwrap();

        assert_eq!(table.column("state"), Some(1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][1], "California");
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn memory_source_reports_missing_levels() {
        let source = MemoryPanelSource::new()
            .with_csv(GeoLevel::State, "month_date_yyyymm,state\n")
            .unwrap();

        assert!(source.read(GeoLevel::State).unwrap().is_empty());
        assert!(matches!(
            source.read(GeoLevel::Zip),
            Err(SourceError::Unavailable { level: GeoLevel::Zip })
        ));
    }
}
