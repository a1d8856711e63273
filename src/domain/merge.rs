//! Chronological merge of work items and milestones
//!
//! Produces one agenda ordered by date. Work items sort on their end date,
//! milestones on their target date. On a shared date milestones come first;
//! otherwise input order is kept.

use chrono::NaiveDate;
use serde::Serialize;

use super::milestone::Milestone;
use super::work_item::WorkItem;

/// One entry of the merged agenda
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum TimelineEntry<'a> {
    Milestone(&'a Milestone),
    WorkItem(&'a WorkItem),
}

impl<'a> TimelineEntry<'a> {
    /// The date this entry is ordered by
    ///
    /// Only called on entries built by [`merge_chronologically`], where work
    /// items are guaranteed to carry an end date.
    pub fn sort_date(&self) -> Option<NaiveDate> {
        match self {
            TimelineEntry::Milestone(m) => Some(m.target_date),
            TimelineEntry::WorkItem(item) => item.end_date,
        }
    }

    /// Tie-break rank: milestones before work items
    fn rank(&self) -> u8 {
        match self {
            TimelineEntry::Milestone(_) => 0,
            TimelineEntry::WorkItem(_) => 1,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            TimelineEntry::Milestone(m) => &m.name,
            TimelineEntry::WorkItem(item) => &item.title,
        }
    }

    pub fn is_milestone(&self) -> bool {
        matches!(self, TimelineEntry::Milestone(_))
    }
}

/// Interleaves dated work items and milestones by date
///
/// Work items missing either date are left out.
pub fn merge_chronologically<'a>(
    items: &'a [WorkItem],
    milestones: &'a [Milestone],
) -> Vec<TimelineEntry<'a>> {
    let mut entries: Vec<_> = milestones
        .iter()
        .map(TimelineEntry::Milestone)
        .chain(
            items
                .iter()
                .filter(|item| item.is_dated())
                .map(TimelineEntry::WorkItem),
        )
        .collect();

    // Stable: equal keys keep milestone order, then item order
    entries.sort_by_key(|entry| (entry.sort_date(), entry.rank()));
    entries
}
