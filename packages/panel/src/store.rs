//! Load-once, cache-forever access to the per-level panels.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use housing_market_geography_models::GeoLevel;
use housing_market_panel_models::Panel;

use crate::PanelError;
use crate::normalize::build_panel;
use crate::source::PanelSource;

const LEVEL_COUNT: usize = GeoLevel::all().len();

/// Process-wide counter backing [`Panel::version`].
static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

type Slot = OnceLock<Result<Arc<Panel>, PanelError>>;

/// Caches one [`Panel`] per geo level for the life of the store.
///
/// Each level has its own [`OnceLock`] slot: reads after the first load are
/// lock-free, and concurrent first requests for the same level wait on the
/// single in-flight load instead of reading the source again. Failed loads
/// are cached too, since a refreshed panel requires a new process.
pub struct PanelStore {
    source: Box<dyn PanelSource>,
    slots: [Slot; LEVEL_COUNT],
    source_reads: AtomicUsize,
}

impl std::fmt::Debug for PanelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded: Vec<GeoLevel> = GeoLevel::all()
            .iter()
            .copied()
            .filter(|level| self.slots[level.index()].get().is_some())
            .collect();
        f.debug_struct("PanelStore")
            .field("loaded", &loaded)
            .field("source_reads", &self.source_reads())
            .finish_non_exhaustive()
    }
}

impl PanelStore {
    /// Creates an empty store reading from `source`.
    #[must_use]
    pub fn new(source: impl PanelSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            slots: std::array::from_fn(|_| OnceLock::new()),
            source_reads: AtomicUsize::new(0),
        }
    }

    /// Returns the panel for `level`, loading it on first access.
    ///
    /// # Errors
    ///
    /// Returns the (cached) [`PanelError`] if the level failed to load.
    pub fn load(&self, level: GeoLevel) -> Result<Arc<Panel>, PanelError> {
        let slot = &self.slots[level.index()];
        if let Some(cached) = slot.get() {
            log::trace!("{level} panel cache hit");
            return cached.clone();
        }
        slot.get_or_init(|| self.load_uncached(level)).clone()
    }

    /// Returns the panel for `level` only if it is already loaded.
    #[must_use]
    pub fn cached(&self, level: GeoLevel) -> Option<Arc<Panel>> {
        self.slots[level.index()]
            .get()
            .and_then(|r| r.as_ref().ok())
            .cloned()
    }

    /// Number of times the source has been read.
    #[must_use]
    pub fn source_reads(&self) -> usize {
        self.source_reads.load(Ordering::Relaxed)
    }

    fn load_uncached(&self, level: GeoLevel) -> Result<Arc<Panel>, PanelError> {
        self.source_reads.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();
        log::debug!("Loading {level} panel");

        let result = self
            .source
            .read(level)
            .map_err(|e| PanelError::DataSource {
                level,
                message: e.to_string(),
            })
            .and_then(|table| {
                build_panel(level, &table, NEXT_VERSION.fetch_add(1, Ordering::Relaxed))
            });

        match result {
            Ok(panel) => {
                log::info!(
                    "Loaded {level} panel: {} records, {} entities in {:.2?}",
                    panel.len(),
                    panel.geo_ids().count(),
                    start.elapsed()
                );
                Ok(Arc::new(panel))
            }
            Err(e) => {
                log::error!("Failed to load {level} panel: {e}");
                Err(e)
            }
        }
    }
}
