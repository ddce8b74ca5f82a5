//! Identifier and display-name normalization shared by every geo level.
//!
//! Upstream panels carry codes in whatever shape the exporting tool left
//! them in (`6037`, `06037`, `6037.0`), so everything is funneled through
//! [`numeric_code`] before it is used as a key.

/// ISO 3166-1 numeric code for the United States.
pub const UNITED_STATES_CODE: &str = "840";

/// Display name of the only country in the panels.
pub const UNITED_STATES_NAME: &str = "United States";

/// Maps a country name or alias to its numeric code.
#[must_use]
pub fn country_code(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "united states" | "united states of america" | "us" | "usa" | "840" => {
            Some(UNITED_STATES_CODE)
        }
        _ => None,
    }
}

/// Normalizes a numeric code to a digit string zero-padded to `width`.
///
/// Accepts float renderings with an all-zero fraction (`"31080.0"`).
/// Returns `None` for empty, non-numeric, or all-zero input.
#[must_use]
pub fn numeric_code(raw: &str, width: usize) -> Option<String> {
    let raw = raw.trim();
    let digits = match raw.split_once('.') {
        Some((int, frac)) if frac.chars().all(|c| c == '0') => int,
        Some(_) => return None,
        None => raw,
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return None;
    }

    Some(format!("{significant:0>width$}"))
}

/// Title-cases a string: a letter is upper-cased when it follows a
/// non-letter and lower-cased otherwise (`"o'brien"` -> `"O'Brien"`).
#[must_use]
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Re-cases a county name to `"Title Case County, ST"`.
#[must_use]
pub fn county_display_name(raw: &str) -> String {
    match raw.split_once(',') {
        Some((county, state)) => format!(
            "{}, {}",
            title_case(county.trim()),
            state.trim().to_uppercase()
        ),
        None => title_case(raw.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_aliases() {
        assert_eq!(country_code("United States"), Some("840"));
        assert_eq!(country_code(" usa "), Some("840"));
        assert_eq!(country_code("840"), Some("840"));
        assert_eq!(country_code("Canada"), None);
    }

    #[test]
    fn pads_numeric_codes() {
        assert_eq!(numeric_code("6037", 5).as_deref(), Some("06037"));
        assert_eq!(numeric_code("06037", 5).as_deref(), Some("06037"));
        assert_eq!(numeric_code("6037.0", 5).as_deref(), Some("06037"));
        assert_eq!(numeric_code("501", 5).as_deref(), Some("00501"));
        assert_eq!(numeric_code("31080", 5).as_deref(), Some("31080"));
    }

    #[test]
    fn rejects_non_codes() {
        assert_eq!(numeric_code("", 5), None);
        assert_eq!(numeric_code("abc", 5), None);
        assert_eq!(numeric_code("12.5", 5), None);
        assert_eq!(numeric_code("000", 5), None);
        assert_eq!(numeric_code("-12", 5), None);
    }

    #[test]
    fn title_cases_words() {
        assert_eq!(title_case("los angeles"), "Los Angeles");
        assert_eq!(title_case("ST. LOUIS CITY"), "St. Louis City");
        assert_eq!(title_case("o'brien"), "O'Brien");
    }

    #[test]
    fn recases_county_names() {
        assert_eq!(county_display_name("los angeles, ca"), "Los Angeles, CA");
        assert_eq!(county_display_name("MIAMI-DADE,fl"), "Miami-Dade, FL");
        assert_eq!(county_display_name("cook"), "Cook");
    }
}
