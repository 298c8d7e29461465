//! Timestamp and date value generators.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::Rng;
use relgen_core::GeneratedValue;

/// Generate the current UTC timestamp.
///
/// This is NOT deterministic - each call returns the current time.
pub fn generate_timestamp_now() -> GeneratedValue {
    GeneratedValue::DateTime(Utc::now())
}

/// Generate a random timestamp between two Unix timestamps (inclusive).
pub fn generate_timestamp_range<R: Rng>(rng: &mut R, start: i64, end: i64) -> GeneratedValue {
    let random_ts = rng.random_range(start..=end);
    match DateTime::from_timestamp(random_ts, 0) {
        Some(dt) => GeneratedValue::DateTime(dt),
        None => GeneratedValue::Null,
    }
}

/// Generate a random calendar date between two dates (inclusive).
pub fn generate_date_range<R: Rng>(
    rng: &mut R,
    start: NaiveDate,
    end: NaiveDate,
) -> GeneratedValue {
    let span = (end - start).num_days().max(0) as u64;
    let offset = rng.random_range(0..=span);
    match start.checked_add_days(Days::new(offset)) {
        Some(date) => GeneratedValue::Date(date),
        None => GeneratedValue::Null,
    }
}

/// Parse a timestamp string (RFC 3339 or `YYYY-MM-DD`).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    parse_date(s).and_then(|date| Some(date.and_hms_opt(0, 0, 0)?.and_utc()))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
