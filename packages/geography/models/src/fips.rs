//! US state FIPS code utilities.
//!
//! A single table of the 50 states + DC drives every lookup between
//! two-digit FIPS codes, two-letter abbreviations, and full state names.

/// `(fips, abbreviation, name)` for the 50 US states + DC, ordered by FIPS.
pub const STATES: &[(&str, &str, &str)] = &[
    ("01", "AL", "Alabama"),
    ("02", "AK", "Alaska"),
    ("04", "AZ", "Arizona"),
    ("05", "AR", "Arkansas"),
    ("06", "CA", "California"),
    ("08", "CO", "Colorado"),
    ("09", "CT", "Connecticut"),
    ("10", "DE", "Delaware"),
    ("11", "DC", "District of Columbia"),
    ("12", "FL", "Florida"),
    ("13", "GA", "Georgia"),
    ("15", "HI", "Hawaii"),
    ("16", "ID", "Idaho"),
    ("17", "IL", "Illinois"),
    ("18", "IN", "Indiana"),
    ("19", "IA", "Iowa"),
    ("20", "KS", "Kansas"),
    ("21", "KY", "Kentucky"),
    ("22", "LA", "Louisiana"),
    ("23", "ME", "Maine"),
    ("24", "MD", "Maryland"),
    ("25", "MA", "Massachusetts"),
    ("26", "MI", "Michigan"),
    ("27", "MN", "Minnesota"),
    ("28", "MS", "Mississippi"),
    ("29", "MO", "Missouri"),
    ("30", "MT", "Montana"),
    ("31", "NE", "Nebraska"),
    ("32", "NV", "Nevada"),
    ("33", "NH", "New Hampshire"),
    ("34", "NJ", "New Jersey"),
    ("35", "NM", "New Mexico"),
    ("36", "NY", "New York"),
    ("37", "NC", "North Carolina"),
    ("38", "ND", "North Dakota"),
    ("39", "OH", "Ohio"),
    ("40", "OK", "Oklahoma"),
    ("41", "OR", "Oregon"),
    ("42", "PA", "Pennsylvania"),
    ("44", "RI", "Rhode Island"),
    ("45", "SC", "South Carolina"),
    ("46", "SD", "South Dakota"),
    ("47", "TN", "Tennessee"),
    ("48", "TX", "Texas"),
    ("49", "UT", "Utah"),
    ("50", "VT", "Vermont"),
    ("51", "VA", "Virginia"),
    ("53", "WA", "Washington"),
    ("54", "WV", "West Virginia"),
    ("55", "WI", "Wisconsin"),
    ("56", "WY", "Wyoming"),
];

/// Maps a full state name (case-insensitive) to its FIPS code.
#[must_use]
pub fn name_to_fips(name: &str) -> Option<&'static str> {
    let name = name.trim();
    STATES
        .iter()
        .find(|(_, _, n)| n.eq_ignore_ascii_case(name))
        .map(|(fips, _, _)| *fips)
}

/// Maps a two-letter state abbreviation (case-insensitive) to its FIPS code.
#[must_use]
pub fn abbr_to_fips(abbr: &str) -> Option<&'static str> {
    let abbr = abbr.trim();
    STATES
        .iter()
        .find(|(_, a, _)| a.eq_ignore_ascii_case(abbr))
        .map(|(fips, _, _)| *fips)
}

/// Normalizes a numeric FIPS code (`"6"`, `"06"`, `"6.0"`) to the two-digit
/// form, provided it names a known state.
#[must_use]
pub fn normalize_fips(code: &str) -> Option<&'static str> {
    let padded = crate::codes::numeric_code(code, 2)?;
    STATES
        .iter()
        .find(|(fips, _, _)| *fips == padded)
        .map(|(fips, _, _)| *fips)
}

/// Resolves any state reference (name, abbreviation, or FIPS code) to the
/// two-digit FIPS code.
#[must_use]
pub fn resolve_state(raw: &str) -> Option<&'static str> {
    name_to_fips(raw)
        .or_else(|| abbr_to_fips(raw))
        .or_else(|| normalize_fips(raw))
}

/// Maps a two-digit FIPS code to the two-letter state abbreviation.
///
/// Returns `"??"` for unrecognized codes.
#[must_use]
pub fn state_abbr(fips: &str) -> &'static str {
    STATES
        .iter()
        .find(|(f, _, _)| *f == fips)
        .map_or("??", |(_, abbr, _)| *abbr)
}

/// Maps a two-digit FIPS code to the full state name.
///
/// Returns `"Unknown"` for unrecognized codes.
#[must_use]
pub fn state_name(fips: &str) -> &'static str {
    STATES
        .iter()
        .find(|(f, _, _)| *f == fips)
        .map_or("Unknown", |(_, _, name)| *name)
}
