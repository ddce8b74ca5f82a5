//! CSV directory panel source.
//!
//! Reads one CSV file per level from a data directory, transparently
//! decompressing files whose name ends in `.gz`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use housing_market_geography_models::GeoLevel;

use crate::source::{PanelSource, RawTable, SourceError};

/// [`PanelSource`] reading realtor.com inventory history CSVs from disk.
#[derive(Debug, Clone)]
pub struct CsvPanelSource {
    /// Directory relative file names are resolved against.
    data_dir: PathBuf,
    /// Per-level file overrides.
    files: BTreeMap<GeoLevel, PathBuf>,
}

impl CsvPanelSource {
    /// Creates a source reading the default file names from `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            files: BTreeMap::new(),
        }
    }

    /// Overrides the file for one level. Relative paths are resolved
    /// against the data directory.
    #[must_use]
    pub fn with_file(mut self, level: GeoLevel, path: impl Into<PathBuf>) -> Self {
        self.files.insert(level, path.into());
        self
    }

    /// File name published upstream for `level`.
    #[must_use]
    pub const fn default_file_name(level: GeoLevel) -> &'static str {
        match level {
            GeoLevel::Country => "RDC_Inventory_Core_Metrics_Country_History.csv",
            GeoLevel::State => "RDC_Inventory_Core_Metrics_State_History.csv",
            GeoLevel::Metro => "RDC_Inventory_Core_Metrics_Metro_History.csv",
            GeoLevel::County => "RDC_Inventory_Core_Metrics_County_History.csv",
            GeoLevel::Zip => "RDC_Inventory_Core_Metrics_Zip_History.csv",
        }
    }

    /// Data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolved path of the file backing `level`.
    #[must_use]
    pub fn path_for(&self, level: GeoLevel) -> PathBuf {
        self.files.get(&level).map_or_else(
            || self.data_dir.join(Self::default_file_name(level)),
            |file| self.data_dir.join(file),
        )
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

impl PanelSource for CsvPanelSource {
    fn read(&self, level: GeoLevel) -> Result<RawTable, SourceError> {
        let path = self.path_for(level);
        if !path.is_file() {
            return Err(SourceError::MissingFile { path });
        }

        log::debug!("Reading {level} panel from {}", path.display());

        let file = BufReader::new(File::open(&path)?);
        let table = if is_gzipped(&path) {
            RawTable::from_reader(flate2::read::GzDecoder::new(file))?
        } else {
            RawTable::from_reader(file)?
        };

        log::debug!(
            "Parsed {} rows x {} columns from {}",
            table.len(),
            table.headers().len(),
            path.display()
        );

        Ok(table)
    }
}
