//! Field-level parsing helpers for tabular sources.
//!
//! Parsing is tolerant: counts coerce to numbers with missing or
//! negative input clamped to zero, rates distinguish "no data" from
//! zero, and periods come either from a year column or from a date
//! column's year.

use chrono::{Datelike as _, NaiveDate};

/// Parses a count field. Missing, unparseable, or negative input all
/// coerce to `0.0`.
#[must_use]
pub fn parse_value(s: Option<&str>) -> f64 {
    s.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

/// Parses a rate field. Returns `None` for missing or unparseable input
/// — "no data", which consumers render distinctly from zero.
#[must_use]
pub fn parse_rate(s: Option<&str>) -> Option<f64> {
    let v = s?.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Parses a period from a year column value.
#[must_use]
pub fn parse_period(s: &str) -> Option<i32> {
    s.trim().parse::<i32>().ok()
}

/// Extracts the year from a date column value (`2021-03-05` or
/// `03/05/2021`).
#[must_use]
pub fn parse_date_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.year());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some(date.year());
    }
    None
}

/// Normalizes a header name for matching: lowercase, spaces and dashes
/// collapsed to underscores.
#[must_use]
pub fn normalize_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}
