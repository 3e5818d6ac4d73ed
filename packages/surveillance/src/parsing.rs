//! Field parsing for surveillance table cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Cell values treated as "no value" for optional numeric columns.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "null", "NULL"];

/// Parses the `date` column. Accepts a plain date (`2024-01-14`,
/// `2024/01/14`) or an ISO 8601 datetime, whose date part is kept.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.date());
    }
    None
}

/// Parses a required non-negative, finite number.
#[must_use]
pub fn parse_non_negative(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Parses an optional number. Returns `Ok(None)` for empty cells and the
/// usual missing-value markers, `Err(())` for anything else that is not
/// a finite number.
///
/// # Errors
///
/// Returns `Err(())` if the cell holds text that is neither a number nor
/// a missing-value marker.
#[allow(clippy::result_unit_err)]
pub fn parse_optional(s: &str) -> Result<Option<f64>, ()> {
    let s = s.trim();
    if MISSING_MARKERS.contains(&s) {
        return Ok(None);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or(())
}

/// Parses an integer column that may have been written as a float
/// (`"2"` or `"2.0"`).
#[must_use]
pub fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    #[allow(clippy::cast_possible_truncation)]
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}
