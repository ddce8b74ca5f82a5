//! Month-granularity date helpers.
//!
//! Every date in a panel is the first day of a calendar month.

use chrono::{Datelike as _, Months, NaiveDate};

/// Returns the first day of the given month.
#[must_use]
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Truncates a date to the first day of its month.
#[must_use]
pub fn truncate_to_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shifts a date by a signed number of calendar months.
#[must_use]
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let delta = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(delta)
    } else {
        date.checked_sub_months(delta)
    }
}

/// Parses a month identifier into the first day of that month.
///
/// Accepts `YYYYMM` (the panel's `month_date_yyyymm` column, including a
/// float rendering such as `202401.0`), `YYYY-MM`, and `YYYY-MM-DD`.
#[must_use]
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let raw = raw.strip_suffix(".0").unwrap_or(raw);

    if raw.len() == 6 && raw.chars().all(|c| c.is_ascii_digit()) {
        let year = raw[..4].parse().ok()?;
        let month = raw[4..].parse().ok()?;
        return month_start(year, month);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(truncate_to_month(date));
    }

    let (year, month) = raw.split_once('-')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    month_start(year.parse().ok()?, month.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        month_start(y, m).unwrap()
    }

    #[test]
    fn parses_yyyymm() {
        assert_eq!(parse_month("202401"), Some(d(2024, 1)));
        assert_eq!(parse_month("201912.0"), Some(d(2019, 12)));
        assert_eq!(parse_month(" 202307 "), Some(d(2023, 7)));
    }

    #[test]
    fn parses_dashed_forms() {
        assert_eq!(parse_month("2024-03"), Some(d(2024, 3)));
        assert_eq!(parse_month("2024-3"), Some(d(2024, 3)));
        assert_eq!(parse_month("2024-03-17"), Some(d(2024, 3)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_month(""), None);
        assert_eq!(parse_month("202413"), None);
        assert_eq!(parse_month("quality_flag"), None);
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("24-01"), None);
    }

    #[test]
    fn shifts_across_year_boundaries() {
        assert_eq!(shift_months(d(2024, 1), -1), Some(d(2023, 12)));
        assert_eq!(shift_months(d(2024, 1), -12), Some(d(2023, 1)));
        assert_eq!(shift_months(d(2023, 11), 3), Some(d(2024, 2)));
    }
}
