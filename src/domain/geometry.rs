//! Timeline geometry
//!
//! Maps dates onto a normalized `[0, 100]` axis relative to
//! [`TimelineBounds`]. Results are clamped so bars and markers stay inside
//! the band even when dates fall outside the bounds.

use chrono::NaiveDate;
use serde::Serialize;

use super::dates::days_between;
use super::timeline::TimelineBounds;

/// Horizontal placement of a work item bar, in percent of the axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarGeometry {
    pub left_percent: f64,
    pub width_percent: f64,
}

/// Horizontal placement of a milestone marker, in percent of the axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerGeometry {
    pub left_percent: f64,
}

fn percent_of(bounds: &TimelineBounds, days: i64) -> f64 {
    100.0 * days as f64 / bounds.total_days.max(1) as f64
}

/// Inclusive duration in days, never less than one
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (days_between(start, end) + 1).max(1)
}

/// Places a bar spanning `start..=end`
pub fn bar(bounds: &TimelineBounds, start: NaiveDate, end: NaiveDate) -> BarGeometry {
    let left = percent_of(bounds, days_between(bounds.start, start)).clamp(0.0, 100.0);
    let width = percent_of(bounds, inclusive_days(start, end)).clamp(0.0, 100.0 - left);
    BarGeometry {
        left_percent: left,
        width_percent: width,
    }
}

/// Places a marker on a single date
pub fn marker(bounds: &TimelineBounds, date: NaiveDate) -> MarkerGeometry {
    MarkerGeometry {
        left_percent: percent_of(bounds, days_between(bounds.start, date)).clamp(0.0, 100.0),
    }
}
