//! Selectable entity lists per geo level.

use std::sync::Arc;

use housing_market_geography_models::{GeoEntity, GeoLevel};

use crate::PanelError;
use crate::store::PanelStore;

/// Projects the cached panels into sorted, de-duplicated entity lists.
#[derive(Debug, Clone)]
pub struct GeoCatalog {
    store: Arc<PanelStore>,
}

impl GeoCatalog {
    /// Creates a catalog over `store`.
    #[must_use]
    pub const fn new(store: Arc<PanelStore>) -> Self {
        Self { store }
    }

    /// Lists every entity at `level`, sorted by display name
    /// (case-insensitive, ties broken by id).
    ///
    /// The country level is the fixed single entity "United States" and
    /// never touches the panel.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError`] if the level's panel fails to load.
    pub fn list_entities(&self, level: GeoLevel) -> Result<Vec<GeoEntity>, PanelError> {
        if level == GeoLevel::Country {
            return Ok(vec![GeoEntity::united_states()]);
        }

        let panel = self.store.load(level)?;
        let mut entities: Vec<GeoEntity> = panel
            .names()
            .map(|(id, name)| GeoEntity::new(level, id, name))
            .collect();

        entities.sort_by_cached_key(|e| (e.display_name.to_lowercase(), e.id.clone()));

        Ok(entities)
    }

    /// Resolves a raw identifier (any spelling the level accepts, e.g.
    /// `"CA"`, `"California"` or `"06"` for a state) to its entity.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotFound`] if no such entity exists, or the
    /// load error if the level's panel fails to load.
    pub fn resolve(&self, level: GeoLevel, id: &str) -> Result<GeoEntity, PanelError> {
        let not_found = || PanelError::NotFound {
            level,
            id: id.to_owned(),
        };

        let canonical = level.canonical_id(id).ok_or_else(not_found)?;

        if level == GeoLevel::Country {
            return Ok(GeoEntity::united_states());
        }

        let panel = self.store.load(level)?;
        panel
            .display_name(&canonical)
            .map(|name| GeoEntity::new(level, canonical.as_str(), name))
            .ok_or_else(not_found)
    }
}
