#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic level and entity types.
//!
//! Every panel is published at one of five [`GeoLevel`]s. Each level knows
//! which source columns carry its identifier and display name, and how a
//! user- or source-supplied identifier is canonicalized into the stable
//! `geo_id` used as the panel key.

pub mod codes;
pub mod fips;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Geographic granularity of a monthly panel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GeoLevel {
    /// National totals.
    Country,
    /// US states + DC.
    State,
    /// Core-based statistical areas.
    Metro,
    /// Counties.
    County,
    /// ZIP codes.
    Zip,
}

impl GeoLevel {
    /// Returns all variants, coarsest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Country,
            Self::State,
            Self::Metro,
            Self::County,
            Self::Zip,
        ]
    }

    /// Position of this level in [`GeoLevel::all`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::State => "State",
            Self::Metro => "Metro Area",
            Self::County => "County",
            Self::Zip => "ZIP Code",
        }
    }

    /// Source column the `geo_id` is derived from.
    #[must_use]
    pub const fn id_column(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::State => "state",
            Self::Metro => "cbsa_code",
            Self::County => "county_fips",
            Self::Zip => "postal_code",
        }
    }

    /// Secondary id column consulted when [`Self::id_column`] is absent or
    /// does not resolve.
    #[must_use]
    pub const fn fallback_id_column(self) -> Option<&'static str> {
        match self {
            Self::State => Some("state_id"),
            Self::Country | Self::Metro | Self::County | Self::Zip => None,
        }
    }

    /// Source column holding the display name.
    #[must_use]
    pub const fn name_column(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::State => "state",
            Self::Metro => "cbsa_title",
            Self::County => "county_name",
            Self::Zip => "zip_name",
        }
    }

    /// Canonicalizes a raw identifier into this level's `geo_id` form.
    ///
    /// * Country: name or alias -> `"840"`
    /// * State: name, abbreviation, or FIPS -> two-digit FIPS
    /// * Metro / County / Zip: numeric code zero-padded to five digits
    ///
    /// Returns `None` when the identifier cannot belong to this level.
    #[must_use]
    pub fn canonical_id(self, raw: &str) -> Option<String> {
        match self {
            Self::Country => codes::country_code(raw).map(str::to_owned),
            Self::State => fips::resolve_state(raw).map(str::to_owned),
            Self::Metro | Self::County | Self::Zip => codes::numeric_code(raw, 5),
        }
    }
}

/// A selectable geographic entity at one level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoEntity {
    /// Canonical `geo_id` (e.g. `"06"` for California, `"06037"` for
    /// Los Angeles County).
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Level the entity belongs to.
    pub level: GeoLevel,
}

impl GeoEntity {
    /// Creates an entity.
    #[must_use]
    pub fn new(level: GeoLevel, id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            level,
        }
    }

    /// The fixed national entity.
    #[must_use]
    pub fn united_states() -> Self {
        Self::new(
            GeoLevel::Country,
            codes::UNITED_STATES_CODE,
            codes::UNITED_STATES_NAME,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn parses_level_names() {
        assert_eq!(GeoLevel::from_str("zip").unwrap(), GeoLevel::Zip);
        assert_eq!(GeoLevel::from_str("Metro").unwrap(), GeoLevel::Metro);
        assert_eq!(GeoLevel::County.to_string(), "county");
        assert!(GeoLevel::from_str("city").is_err());
    }

    #[test]
    fn indices_follow_all() {
        for (i, level) in GeoLevel::all().iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn canonicalizes_per_level() {
        assert_eq!(GeoLevel::Country.canonical_id("USA").as_deref(), Some("840"));
        assert_eq!(GeoLevel::State.canonical_id("CA").as_deref(), Some("06"));
        assert_eq!(GeoLevel::State.canonical_id("Texas").as_deref(), Some("48"));
        assert_eq!(GeoLevel::County.canonical_id("6037").as_deref(), Some("06037"));
        assert_eq!(GeoLevel::Zip.canonical_id("501").as_deref(), Some("00501"));
        assert_eq!(GeoLevel::Metro.canonical_id("31080.0").as_deref(), Some("31080"));
        assert_eq!(GeoLevel::Zip.canonical_id("Beverly Hills"), None);
    }

    #[test]
    fn serializes_entity_camel_case() {
        let json = serde_json::to_value(GeoEntity::united_states()).unwrap();
        assert_eq!(json["displayName"], "United States");
        assert_eq!(json["level"], "country");
    }
}
