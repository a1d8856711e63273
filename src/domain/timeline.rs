//! Timeline range calculation
//!
//! Each zoom mode has its own anchoring and bucketing rule:
//!
//! | Zoom | Start | Length | Buckets |
//! |------|-------|--------|---------|
//! | day | earliest date | 30 days | 30 × 1 day |
//! | week | Monday on or before earliest date | 84 days | 12 × 7 days |
//! | month | first of earliest date's month | 12 calendar months | 12 × month length |
//!
//! The earliest date is taken over dated work items and milestones. With
//! nothing dated the range is anchored on `today`.

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::dates::{add_days, add_months, days_between, days_in_month, first_of_month};
use super::geometry::{self, BarGeometry, MarkerGeometry};
use super::milestone::Milestone;
use super::work_item::WorkItem;

const DAY_BUCKETS: i64 = 30;
const WEEK_BUCKETS: i64 = 12;
const MONTH_BUCKETS: u32 = 12;

#[derive(Debug, Error, PartialEq)]
#[error("Unknown zoom mode '{0}' (expected day, week or month)")]
pub struct ParseZoomError(String);

/// Timeline display granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoomMode {
    Day,
    #[default]
    Week,
    Month,
}

impl ZoomMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoomMode::Day => "day",
            ZoomMode::Week => "week",
            ZoomMode::Month => "month",
        }
    }
}

impl fmt::Display for ZoomMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoomMode {
    type Err = ParseZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(ZoomMode::Day),
            "week" | "weeks" => Ok(ZoomMode::Week),
            "month" | "months" => Ok(ZoomMode::Month),
            _ => Err(ParseZoomError(s.to_string())),
        }
    }
}

/// Start and end of the visible range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Whole days from start to end, never less than 1
    pub total_days: i64,
}

impl TimelineBounds {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            total_days: days_between(start, end).max(1),
        }
    }

    /// Returns true if `date` falls within `[start, end]`
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One bucket of the time axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePeriod {
    pub anchor: NaiveDate,
    pub label: String,
    pub span_days: i64,
}

impl TimelinePeriod {
    /// First day after this period
    pub fn next_anchor(&self) -> NaiveDate {
        add_days(self.anchor, self.span_days)
    }
}

/// Computed range and buckets for one zoom mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub zoom: ZoomMode,
    pub bounds: TimelineBounds,
    pub periods: Vec<TimelinePeriod>,
}

impl Timeline {
    /// Computes the timeline for a snapshot
    ///
    /// Work items only count when both of their dates are present.
    pub fn compute(
        zoom: ZoomMode,
        items: &[WorkItem],
        milestones: &[Milestone],
        today: NaiveDate,
    ) -> Self {
        let anchor = earliest_date(items, milestones).unwrap_or_else(|| {
            debug!("No dated items or milestones, anchoring {} timeline on {}", zoom, today);
            today
        });

        match zoom {
            ZoomMode::Day => day_range(anchor),
            ZoomMode::Week => week_range(anchor),
            ZoomMode::Month => month_range(anchor),
        }
    }

    /// Places a work item's bar, if it has both dates
    pub fn place_item(&self, item: &WorkItem) -> Option<BarGeometry> {
        item.date_range()
            .map(|(start, end)| geometry::bar(&self.bounds, start, end))
    }

    /// Places a milestone marker
    pub fn place_milestone(&self, milestone: &Milestone) -> MarkerGeometry {
        geometry::marker(&self.bounds, milestone.target_date)
    }

    /// Sum of all period spans
    pub fn covered_days(&self) -> i64 {
        self.periods.iter().map(|p| p.span_days).sum()
    }
}

/// Earliest date across dated work items and milestones
pub fn earliest_date(items: &[WorkItem], milestones: &[Milestone]) -> Option<NaiveDate> {
    let item_dates = items
        .iter()
        .filter_map(WorkItem::date_range)
        .map(|(start, end)| start.min(end));
    let milestone_dates = milestones.iter().map(|m| m.target_date);
    item_dates.chain(milestone_dates).min()
}

fn day_range(anchor: NaiveDate) -> Timeline {
    let start = anchor;
    let end = add_days(start, DAY_BUCKETS);
    let periods = (0..DAY_BUCKETS)
        .map(|i| {
            let day = add_days(start, i);
            TimelinePeriod {
                anchor: day,
                label: day.format("%d/%m").to_string(),
                span_days: 1,
            }
        })
        .collect();

    Timeline {
        zoom: ZoomMode::Day,
        bounds: TimelineBounds::new(start, end),
        periods,
    }
}

fn week_range(anchor: NaiveDate) -> Timeline {
    let start = add_days(anchor, -i64::from(anchor.weekday().num_days_from_monday()));
    let end = add_days(start, WEEK_BUCKETS * 7);
    let periods = (0..WEEK_BUCKETS)
        .map(|i| {
            let monday = add_days(start, i * 7);
            TimelinePeriod {
                anchor: monday,
                label: format!("S{}", week_number(monday)),
                span_days: 7,
            }
        })
        .collect();

    Timeline {
        zoom: ZoomMode::Week,
        bounds: TimelineBounds::new(start, end),
        periods,
    }
}

fn month_range(anchor: NaiveDate) -> Timeline {
    let start = first_of_month(anchor);
    let end = add_days(add_months(start, MONTH_BUCKETS), -1);
    let periods = (0..MONTH_BUCKETS)
        .map(|i| {
            let month = add_months(start, i);
            TimelinePeriod {
                anchor: month,
                label: month.format("%b %Y").to_string(),
                span_days: days_in_month(month),
            }
        })
        .collect();

    Timeline {
        zoom: ZoomMode::Month,
        bounds: TimelineBounds::new(start, end),
        periods,
    }
}

/// Week-of-year number from the day of the year (days 1-7 are week 1)
pub fn week_number(date: NaiveDate) -> u32 {
    (date.ordinal() + 6) / 7
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::{ItemId, MilestoneId};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dated(id: &str, start: &str, end: &str) -> WorkItem {
        WorkItem::new(ItemId::new(id).unwrap(), id).with_dates(date(start), date(end))
    }

    fn milestone(id: &str, on: &str) -> Milestone {
        Milestone::new(MilestoneId::new(id).unwrap(), id, date(on))
    }

    fn assert_contiguous(timeline: &Timeline) {
        assert_eq!(timeline.periods[0].anchor, timeline.bounds.start);
        for pair in timeline.periods.windows(2) {
            assert_eq!(pair[0].next_anchor(), pair[1].anchor);
        }
        assert!(timeline.covered_days() >= timeline.bounds.total_days);
    }

    #[test]
    fn day_zoom_from_earliest_item() {
        let items = vec![
            dated("b", "2024-03-05", "2024-03-09"),
            dated("a", "2024-03-01", "2024-03-02"),
        ];
        let timeline = Timeline::compute(ZoomMode::Day, &items, &[], date("2020-01-01"));

        assert_eq!(timeline.bounds.start, date("2024-03-01"));
        assert_eq!(timeline.bounds.end, date("2024-03-31"));
        assert_eq!(timeline.bounds.total_days, 30);
        assert_eq!(timeline.periods.len(), 30);
        assert!(timeline.periods.iter().all(|p| p.span_days == 1));
        assert_eq!(timeline.periods[0].label, "01/03");
        assert_contiguous(&timeline);
    }

    #[test]
    fn week_zoom_starts_on_monday() {
        // 2024-03-07 is a Thursday
        let items = vec![dated("a", "2024-03-07", "2024-03-20")];
        let timeline = Timeline::compute(ZoomMode::Week, &items, &[], date("2020-01-01"));

        assert_eq!(timeline.bounds.start, date("2024-03-04"));
        assert_eq!(timeline.bounds.end, date("2024-05-27"));
        assert_eq!(timeline.bounds.total_days, 84);
        assert_eq!(timeline.periods.len(), 12);
        assert!(timeline.periods.iter().all(|p| p.span_days == 7));
        assert_eq!(timeline.periods[0].label, "S10");
        assert_contiguous(&timeline);
    }

    #[test]
    fn range_near_calendar_limit_saturates() {
        let milestones = vec![Milestone::new(
            MilestoneId::new("far").unwrap(),
            "far",
            NaiveDate::MAX,
        )];
        for zoom in [ZoomMode::Day, ZoomMode::Week, ZoomMode::Month] {
            let timeline = Timeline::compute(zoom, &[], &milestones, date("2024-01-01"));
            assert!(timeline.bounds.start <= timeline.bounds.end);
            assert!(timeline.bounds.total_days >= 1);
            assert!(timeline.place_milestone(&milestones[0]).left_percent <= 100.0);
        }
    }

    #[test]
    fn week_zoom_keeps_monday_anchor() {
        let items = vec![dated("a", "2024-03-04", "2024-03-05")];
        let timeline = Timeline::compute(ZoomMode::Week, &items, &[], date("2020-01-01"));
        assert_eq!(timeline.bounds.start, date("2024-03-04"));
    }

    #[test]
    fn month_zoom_spans_twelve_calendar_months() {
        let items = vec![dated("a", "2024-03-17", "2024-04-02")];
        let timeline = Timeline::compute(ZoomMode::Month, &items, &[], date("2020-01-01"));

        assert_eq!(timeline.bounds.start, date("2024-03-01"));
        assert_eq!(timeline.bounds.end, date("2025-02-28"));
        assert_eq!(timeline.bounds.total_days, 364);
        assert_eq!(timeline.periods.len(), 12);
        assert_eq!(timeline.periods[0].label, "Mar 2024");
        assert_eq!(timeline.periods[0].span_days, 31);
        assert_eq!(timeline.periods[11].label, "Feb 2025");
        assert_eq!(timeline.periods[11].span_days, 28);
        assert_contiguous(&timeline);
    }

    #[test]
    fn milestones_participate_in_anchor() {
        let items = vec![dated("a", "2024-03-10", "2024-03-12")];
        let milestones = vec![milestone("m", "2024-02-20")];
        let timeline = Timeline::compute(ZoomMode::Day, &items, &milestones, date("2020-01-01"));
        assert_eq!(timeline.bounds.start, date("2024-02-20"));
    }

    #[test]
    fn partially_dated_items_are_ignored() {
        let mut half = WorkItem::new(ItemId::new("h").unwrap(), "h");
        half.start_date = Some(date("2023-01-01"));
        let items = vec![half, dated("a", "2024-03-10", "2024-03-12")];
        let timeline = Timeline::compute(ZoomMode::Day, &items, &[], date("2020-01-01"));
        assert_eq!(timeline.bounds.start, date("2024-03-10"));
    }

    #[test]
    fn empty_snapshot_anchors_on_today() {
        for zoom in [ZoomMode::Day, ZoomMode::Week, ZoomMode::Month] {
            let timeline = Timeline::compute(zoom, &[], &[], date("2024-05-15"));
            assert!(timeline.bounds.total_days > 0);
            assert!(timeline.bounds.contains(date("2024-05-15")));
            assert_contiguous(&timeline);
        }
    }

    #[test]
    fn bounds_never_zero_days() {
        let bounds = TimelineBounds::new(date("2024-01-01"), date("2024-01-01"));
        assert_eq!(bounds.total_days, 1);
    }

    #[test]
    fn places_items_and_milestones() {
        let items = vec![dated("a", "2024-01-01", "2024-01-01")];
        let timeline = Timeline::compute(ZoomMode::Day, &items, &[], date("2020-01-01"));

        let bar = timeline.place_item(&dated("b", "2024-01-10", "2024-01-10")).unwrap();
        assert!((bar.left_percent - 30.0).abs() < 1e-9);

        let undated = WorkItem::new(ItemId::new("u").unwrap(), "u");
        assert!(timeline.place_item(&undated).is_none());

        let marker = timeline.place_milestone(&milestone("m", "2024-01-16"));
        assert!((marker.left_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn parse_zoom_mode() {
        assert_eq!("day".parse::<ZoomMode>(), Ok(ZoomMode::Day));
        assert_eq!("Week".parse::<ZoomMode>(), Ok(ZoomMode::Week));
        assert_eq!("months".parse::<ZoomMode>(), Ok(ZoomMode::Month));
        assert!("year".parse::<ZoomMode>().is_err());
    }

    #[test]
    fn week_numbers_from_day_of_year() {
        assert_eq!(week_number(date("2024-01-01")), 1);
        assert_eq!(week_number(date("2024-01-07")), 1);
        assert_eq!(week_number(date("2024-01-08")), 2);
        assert_eq!(week_number(date("2024-12-31")), 53);
    }
}
