//! TOML configuration for the panel data directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use housing_market_analytics_models::DEFAULT_BASELINE_YEAR;
use housing_market_geography_models::GeoLevel;
use housing_market_panel::CsvPanelSource;
use serde::Deserialize;
use thiserror::Error;

/// Overrides [`AppConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "HOUSING_MARKET_DATA_DIR";

/// Read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "housing_market.toml";

/// Errors reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`AppConfig`].
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Where the panels live and which baseline year to compare against.
///
/// ```toml
/// data_dir = "data/realtor"
/// baseline_year = 2019
///
/// [files]
/// zip = "zip_history.csv.gz"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding the per-level CSV files.
    pub data_dir: PathBuf,
    /// Year used by the "since" comparison mode.
    pub baseline_year: i32,
    /// Per-level file names, relative to `data_dir`.
    pub files: BTreeMap<GeoLevel, PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            baseline_year: DEFAULT_BASELINE_YEAR,
            files: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not a valid config.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the config from `path`, or from [`DEFAULT_CONFIG_FILE`] if it
    /// exists, falling back to defaults. [`DATA_DIR_ENV`] is applied last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit or present config file cannot
    /// be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let mut config = match path {
            Some(path) => {
                log::debug!("Reading config from {}", path.display());
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// CSV source for this config.
    #[must_use]
    pub fn source(&self) -> CsvPanelSource {
        self.files
            .iter()
            .fold(CsvPanelSource::new(&self.data_dir), |source, (level, file)| {
                source.with_file(*level, file)
            })
    }
}
