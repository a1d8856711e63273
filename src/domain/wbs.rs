//! Work breakdown structure
//!
//! Groups work items either by deliverable (one group per milestone, plus a
//! trailing unassigned group) or by phase (planning, execution, control,
//! closure), and numbers the result.
//!
//! Codes are positional: group `n` is `n.0` and its `i`-th member is `n.i`.
//! They are recomputed on every call and change whenever grouping or
//! membership changes, so they must never be used as stable identifiers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::MilestoneId;
use super::milestone::Milestone;
use super::rollup::completion_percent;
use super::work_item::{Phase, WorkItem};

/// Default name of the group collecting items without a deliverable
pub const UNASSIGNED_LABEL: &str = "Unassigned";

#[derive(Debug, Error, PartialEq)]
#[error("Unknown grouping '{0}' (expected deliverable or phase)")]
pub struct ParseGroupingError(String);

/// How work items are grouped into the breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    #[default]
    Deliverable,
    Phase,
}

impl Grouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grouping::Deliverable => "deliverable",
            Grouping::Phase => "phase",
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grouping {
    type Err = ParseGroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deliverable" | "deliverables" | "milestone" => Ok(Grouping::Deliverable),
            "phase" | "phases" => Ok(Grouping::Phase),
            _ => Err(ParseGroupingError(s.to_string())),
        }
    }
}

/// What a group was formed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WbsSource {
    Deliverable { milestone_id: MilestoneId },
    Unassigned,
    Phase { phase: Phase },
}

/// Package counts and hours for one group
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WbsStats {
    pub total_packages: usize,
    pub total_hours: f64,
    pub completed_packages: usize,
    pub completed_hours: f64,
}

impl WbsStats {
    fn from_members(members: &[&WorkItem]) -> Self {
        members.iter().fold(Self::default(), |mut stats, item| {
            stats.total_packages += 1;
            stats.total_hours += item.effort();
            if item.status.is_complete() {
                stats.completed_packages += 1;
                stats.completed_hours += item.effort();
            }
            stats
        })
    }

    /// Completed share of hours, as a rounded percentage
    pub fn completion_percent(&self) -> u8 {
        completion_percent(self.total_hours, self.completed_hours)
    }
}

/// One numbered group of the breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WbsGroup<'a> {
    /// 1-based position among the emitted groups
    pub ordinal: usize,
    pub code: String,
    pub name: String,
    pub description: String,
    pub source: WbsSource,
    pub members: Vec<&'a WorkItem>,
    pub stats: WbsStats,
}

/// A member of a group with its positional code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WbsPackage<'a> {
    pub code: String,
    pub item: &'a WorkItem,
}

impl<'a> WbsGroup<'a> {
    fn new(
        ordinal: usize,
        name: impl Into<String>,
        description: impl Into<String>,
        source: WbsSource,
        members: Vec<&'a WorkItem>,
    ) -> Self {
        let stats = WbsStats::from_members(&members);
        Self {
            ordinal,
            code: format!("{}.0", ordinal),
            name: name.into(),
            description: description.into(),
            source,
            members,
            stats,
        }
    }

    /// Members paired with their positional codes (`n.1`, `n.2`, ...)
    pub fn packages(&self) -> Vec<WbsPackage<'a>> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, &item)| WbsPackage {
                code: format!("{}.{}", self.ordinal, i + 1),
                item,
            })
            .collect()
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self.source, WbsSource::Unassigned)
    }
}

/// Builds the breakdown for a snapshot
pub fn build_wbs<'a>(
    items: &'a [WorkItem],
    milestones: &[Milestone],
    grouping: Grouping,
    unassigned_label: &str,
) -> Vec<WbsGroup<'a>> {
    match grouping {
        Grouping::Deliverable => by_deliverable(items, milestones, unassigned_label),
        Grouping::Phase => by_phase(items),
    }
}

fn by_deliverable<'a>(
    items: &'a [WorkItem],
    milestones: &[Milestone],
    unassigned_label: &str,
) -> Vec<WbsGroup<'a>> {
    let mut groups: Vec<_> = milestones
        .iter()
        .enumerate()
        .map(|(i, milestone)| {
            let members = items
                .iter()
                .filter(|item| item.deliverable_id.as_ref() == Some(&milestone.id))
                .collect();
            WbsGroup::new(
                i + 1,
                milestone.name.clone(),
                milestone.description.clone().unwrap_or_default(),
                WbsSource::Deliverable {
                    milestone_id: milestone.id.clone(),
                },
                members,
            )
        })
        .collect();

    // Items pointing at a milestone outside the snapshot count as unassigned
    let known: HashSet<&MilestoneId> = milestones.iter().map(|m| &m.id).collect();
    let unassigned: Vec<_> = items
        .iter()
        .filter(|item| {
            item.deliverable_id
                .as_ref()
                .map_or(true, |id| !known.contains(id))
        })
        .collect();

    if !unassigned.is_empty() {
        groups.push(WbsGroup::new(
            groups.len() + 1,
            unassigned_label,
            "Work packages not linked to any deliverable",
            WbsSource::Unassigned,
            unassigned,
        ));
    }

    groups
}

fn by_phase(items: &[WorkItem]) -> Vec<WbsGroup<'_>> {
    let mut groups = Vec::new();
    for phase in Phase::ALL {
        let members: Vec<_> = items
            .iter()
            .filter(|item| item.status.phase() == Some(phase))
            .collect();
        if members.is_empty() {
            continue;
        }
        groups.push(WbsGroup::new(
            groups.len() + 1,
            phase.name(),
            phase.description(),
            WbsSource::Phase { phase },
            members,
        ));
    }
    groups
}

/// Totals across a breakdown, including 100%-rule coverage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WbsSummary {
    /// Work items in the snapshot
    pub total_items: usize,
    /// Work items captured by a real group (deliverable or phase)
    pub covered_items: usize,
    pub coverage_percent: u8,
    pub total_hours: f64,
    pub completed_hours: f64,
    pub completion_percent: u8,
}

impl WbsSummary {
    pub fn from_groups(groups: &[WbsGroup<'_>], total_items: usize) -> Self {
        let covered_items = groups
            .iter()
            .filter(|g| !g.is_unassigned())
            .map(|g| g.stats.total_packages)
            .sum();
        let total_hours: f64 = groups.iter().map(|g| g.stats.total_hours).sum();
        let completed_hours: f64 = groups.iter().map(|g| g.stats.completed_hours).sum();

        Self {
            total_items,
            covered_items,
            coverage_percent: completion_percent(total_items as f64, covered_items as f64),
            total_hours,
            completed_hours,
            completion_percent: completion_percent(total_hours, completed_hours),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::ItemId;
    use crate::domain::work_item::WorkStatus;
    use chrono::NaiveDate;

    fn mid(s: &str) -> MilestoneId {
        MilestoneId::new(s).unwrap()
    }

    fn item(id: &str, hours: f64, status: WorkStatus) -> WorkItem {
        WorkItem::new(ItemId::new(id).unwrap(), id)
            .with_estimate(hours)
            .with_status(status)
    }

    fn milestone(id: &str) -> Milestone {
        Milestone::new(mid(id), id.to_uppercase(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn member_ids<'a>(group: &WbsGroup<'a>) -> Vec<&'a str> {
        group.members.iter().map(|&m| m.id.as_str()).collect()
    }

    #[test]
    fn groups_by_deliverable_in_milestone_order() {
        let items = vec![
            item("a", 4.0, WorkStatus::Done).with_deliverable(mid("m2")),
            item("b", 2.0, WorkStatus::InProgress).with_deliverable(mid("m1")),
            item("c", 1.0, WorkStatus::Done).with_deliverable(mid("m2")),
        ];
        let milestones = vec![milestone("m1"), milestone("m2"), milestone("m3")];
        let groups = build_wbs(&items, &milestones, Grouping::Deliverable, UNASSIGNED_LABEL);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].code, "1.0");
        assert_eq!(member_ids(&groups[0]), vec!["b"]);
        assert_eq!(groups[1].code, "2.0");
        assert_eq!(member_ids(&groups[1]), vec!["a", "c"]);
        // Empty milestone groups are still shown
        assert_eq!(groups[2].code, "3.0");
        assert!(groups[2].members.is_empty());
    }

    #[test]
    fn unassigned_group_is_last() {
        let items = vec![
            item("loose", 3.0, WorkStatus::NotStarted),
            item("a", 1.0, WorkStatus::NotStarted).with_deliverable(mid("m1")),
            item("stray", 2.0, WorkStatus::Done).with_deliverable(mid("gone")),
        ];
        let milestones = vec![milestone("m1"), milestone("m2")];
        let groups = build_wbs(&items, &milestones, Grouping::Deliverable, "Backlog");

        let last = groups.last().unwrap();
        assert!(last.is_unassigned());
        assert_eq!(last.code, "3.0");
        assert_eq!(last.name, "Backlog");
        assert_eq!(member_ids(last), vec!["loose", "stray"]);
    }

    #[test]
    fn no_unassigned_group_when_everything_is_linked() {
        let items = vec![item("a", 1.0, WorkStatus::Done).with_deliverable(mid("m1"))];
        let groups = build_wbs(&items, &[milestone("m1")], Grouping::Deliverable, UNASSIGNED_LABEL);
        assert_eq!(groups.len(), 1);
        assert!(!groups[0].is_unassigned());
    }

    #[test]
    fn group_stats() {
        let items = vec![
            item("a", 4.0, WorkStatus::Done).with_deliverable(mid("m1")),
            item("b", 6.0, WorkStatus::InReview).with_deliverable(mid("m1")),
            WorkItem::new(ItemId::new("c").unwrap(), "c")
                .with_status(WorkStatus::Done)
                .with_deliverable(mid("m1")),
        ];
        let groups = build_wbs(&items, &[milestone("m1")], Grouping::Deliverable, UNASSIGNED_LABEL);
        let stats = groups[0].stats;

        assert_eq!(stats.total_packages, 3);
        assert_eq!(stats.completed_packages, 2);
        assert_eq!(stats.total_hours, 10.0);
        assert_eq!(stats.completed_hours, 4.0);
        assert_eq!(stats.completion_percent(), 40);
    }

    #[test]
    fn phase_grouping_omits_empty_phases() {
        let items = vec![
            item("a", 1.0, WorkStatus::Done),
            item("b", 1.0, WorkStatus::NotStarted),
            item("c", 1.0, WorkStatus::Blocked),
            item("d", 1.0, WorkStatus::NotStarted),
        ];
        let groups = build_wbs(&items, &[], Grouping::Phase, UNASSIGNED_LABEL);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].code, "1.0");
        assert_eq!(groups[0].source, WbsSource::Phase { phase: Phase::Planning });
        assert_eq!(member_ids(&groups[0]), vec!["b", "d"]);
        assert_eq!(groups[1].code, "2.0");
        assert_eq!(groups[1].source, WbsSource::Phase { phase: Phase::Closure });
    }

    #[test]
    fn package_codes_are_positional() {
        let items = vec![
            item("a", 1.0, WorkStatus::Done).with_deliverable(mid("m2")),
            item("b", 1.0, WorkStatus::Done).with_deliverable(mid("m2")),
        ];
        let milestones = vec![milestone("m1"), milestone("m2")];
        let groups = build_wbs(&items, &milestones, Grouping::Deliverable, UNASSIGNED_LABEL);
        let codes: Vec<_> = groups[1].packages().into_iter().map(|p| p.code).collect();
        assert_eq!(codes, vec!["2.1", "2.2"]);
    }

    #[test]
    fn summary_reports_coverage() {
        let items = vec![
            item("a", 4.0, WorkStatus::Done).with_deliverable(mid("m1")),
            item("b", 2.0, WorkStatus::NotStarted).with_deliverable(mid("m1")),
            item("c", 2.0, WorkStatus::NotStarted),
            item("d", 0.0, WorkStatus::NotStarted),
        ];
        let groups = build_wbs(&items, &[milestone("m1")], Grouping::Deliverable, UNASSIGNED_LABEL);
        let summary = WbsSummary::from_groups(&groups, items.len());

        assert_eq!(summary.total_items, 4);
        assert_eq!(summary.covered_items, 2);
        assert_eq!(summary.coverage_percent, 50);
        assert_eq!(summary.total_hours, 8.0);
        assert_eq!(summary.completion_percent, 50);
    }

    #[test]
    fn parse_grouping() {
        assert_eq!("phase".parse::<Grouping>(), Ok(Grouping::Phase));
        assert_eq!("Deliverable".parse::<Grouping>(), Ok(Grouping::Deliverable));
        assert!("team".parse::<Grouping>().is_err());
    }
}
