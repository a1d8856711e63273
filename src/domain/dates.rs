//! Calendar date helpers
//!
//! Dates are calendar days without a time of day. Input strings are
//! ISO-8601 dates (`2024-03-01`); full RFC 3339 timestamps are accepted and
//! truncated to their date. Years outside `-9999..=9999` are rejected.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate};
use log::warn;
use serde::{Deserialize, Deserializer};

const MAX_YEAR: i32 = 9999;

/// Parses an ISO-8601 date or RFC 3339 timestamp into a calendar date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .filter(|date| date.year().abs() <= MAX_YEAR)
}

/// Whole days from `from` to `to` (negative if `to` is earlier)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Shifts a date by whole days, saturating at the calendar limits
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Returns the first day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Advances a date by whole calendar months, clamping the day to the month length
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> i64 {
    let start = first_of_month(date);
    days_between(start, add_months(start, 1))
}

/// Serde adapter for optional dates
///
/// Never fails: anything other than a parsable date string degrades to `None`.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(raw)) if raw.trim().is_empty() => None,
        Some(serde_json::Value::String(raw)) => {
            let parsed = parse_date(&raw);
            if parsed.is_none() {
                warn!("Ignoring unparsable date {:?}", raw);
            }
            parsed
        }
        Some(other) => {
            warn!("Ignoring non-string date value: {}", other);
            None
        }
    })
}

/// Serde adapter for required dates
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {:?}", raw)))
}
