//! Project view
//!
//! Runs every stage of the engine over one snapshot and bundles the
//! results for the presentation layer. Nothing here is cached between calls.

use chrono::NaiveDate;
use serde::Serialize;

use super::geometry::{BarGeometry, MarkerGeometry};
use super::hierarchy::{build_forest, HierarchyError, TreeNode};
use super::id::{ItemId, MilestoneId};
use super::merge::{merge_chronologically, TimelineEntry};
use super::milestone::Milestone;
use super::rollup::{summarize, RollupStats};
use super::timeline::{Timeline, ZoomMode};
use super::wbs::{build_wbs, Grouping, WbsGroup, WbsSummary};
use super::work_item::WorkItem;

/// The work items and milestones of one project, in storage order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub work_items: Vec<WorkItem>,
    pub milestones: Vec<Milestone>,
}

impl Snapshot {
    pub fn new(work_items: Vec<WorkItem>, milestones: Vec<Milestone>) -> Self {
        Self {
            work_items,
            milestones,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.work_items.is_empty() && self.milestones.is_empty()
    }

    /// Work items with both dates present
    pub fn dated_items(&self) -> impl Iterator<Item = &WorkItem> {
        self.work_items.iter().filter(|item| item.is_dated())
    }

    pub fn forest(&self) -> Result<Vec<TreeNode>, HierarchyError> {
        build_forest(&self.work_items)
    }

    pub fn timeline(&self, zoom: ZoomMode, today: NaiveDate) -> Timeline {
        Timeline::compute(zoom, &self.work_items, &self.milestones, today)
    }

    pub fn agenda(&self) -> Vec<TimelineEntry<'_>> {
        merge_chronologically(&self.work_items, &self.milestones)
    }

    pub fn wbs(&self, grouping: Grouping, unassigned_label: &str) -> Vec<WbsGroup<'_>> {
        build_wbs(&self.work_items, &self.milestones, grouping, unassigned_label)
    }
}

/// A work item bar on the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPlacement {
    pub id: ItemId,
    #[serde(flatten)]
    pub geometry: BarGeometry,
}

/// A milestone marker on the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestonePlacement {
    pub id: MilestoneId,
    #[serde(flatten)]
    pub geometry: MarkerGeometry,
}

/// Everything the engine produces for one snapshot
#[derive(Debug, Serialize)]
pub struct ProjectView<'a> {
    pub tree: Vec<TreeNode>,
    pub rollup: RollupStats,
    pub timeline: Timeline,
    pub items: Vec<ItemPlacement>,
    pub milestones: Vec<MilestonePlacement>,
    pub agenda: Vec<TimelineEntry<'a>>,
    pub grouping: Grouping,
    pub wbs: Vec<WbsGroup<'a>>,
    pub wbs_summary: WbsSummary,
}

impl<'a> ProjectView<'a> {
    pub fn build(
        snapshot: &'a Snapshot,
        zoom: ZoomMode,
        grouping: Grouping,
        unassigned_label: &str,
        today: NaiveDate,
    ) -> Result<Self, HierarchyError> {
        let tree = snapshot.forest()?;
        let rollup = summarize(&tree);
        let timeline = snapshot.timeline(zoom, today);
        let items = place_items(&timeline, &snapshot.work_items);
        let milestones = place_milestones(&timeline, &snapshot.milestones);
        let wbs = snapshot.wbs(grouping, unassigned_label);
        let wbs_summary = WbsSummary::from_groups(&wbs, snapshot.work_items.len());

        Ok(Self {
            tree,
            rollup,
            timeline,
            items,
            milestones,
            agenda: snapshot.agenda(),
            grouping,
            wbs,
            wbs_summary,
        })
    }
}

/// Bars for every dated work item, in input order
pub fn place_items(timeline: &Timeline, items: &[WorkItem]) -> Vec<ItemPlacement> {
    items
        .iter()
        .filter_map(|item| {
            timeline.place_item(item).map(|geometry| ItemPlacement {
                id: item.id.clone(),
                geometry,
            })
        })
        .collect()
}

/// Markers for every milestone, in input order
pub fn place_milestones(timeline: &Timeline, milestones: &[Milestone]) -> Vec<MilestonePlacement> {
    milestones
        .iter()
        .map(|milestone| MilestonePlacement {
            id: milestone.id.clone(),
            geometry: timeline.place_milestone(milestone),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::work_item::WorkStatus;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn snapshot() -> Snapshot {
        let m1 = MilestoneId::new("m1").unwrap();
        let items = vec![
            WorkItem::new(ItemId::new("a").unwrap(), "Build")
                .with_dates(date("2024-01-01"), date("2024-01-05"))
                .with_estimate(10.0)
                .with_status(WorkStatus::Done)
                .with_deliverable(m1.clone()),
            WorkItem::new(ItemId::new("b").unwrap(), "Test")
                .with_parent(ItemId::new("a").unwrap())
                .with_dates(date("2024-01-06"), date("2024-01-10"))
                .with_estimate(5.0),
            WorkItem::new(ItemId::new("c").unwrap(), "Someday"),
        ];
        let milestones = vec![Milestone::new(m1, "Release", date("2024-01-10"))];
        Snapshot::new(items, milestones)
    }

    #[test]
    fn builds_full_view() {
        let snapshot = snapshot();
        let view = ProjectView::build(
            &snapshot,
            ZoomMode::Day,
            Grouping::Deliverable,
            "Unassigned",
            date("2030-01-01"),
        )
        .unwrap();

        assert_eq!(view.tree.len(), 2);
        assert_eq!(view.rollup.total_effort, 15.0);
        assert_eq!(view.rollup.completion_percent, 67);
        assert_eq!(view.timeline.bounds.start, date("2024-01-01"));
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.milestones.len(), 1);
        assert_eq!(view.agenda.len(), 3);
        assert!(view.agenda[1].is_milestone());
        assert_eq!(view.wbs.len(), 2);
        assert_eq!(view.wbs_summary.covered_items, 1);
    }

    #[test]
    fn view_serializes() {
        let snapshot = snapshot();
        let view = ProjectView::build(
            &snapshot,
            ZoomMode::Week,
            Grouping::Phase,
            "Unassigned",
            date("2030-01-01"),
        )
        .unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["timeline"]["zoom"], "week");
        assert_eq!(json["items"][0]["id"], "a");
        assert!(json["items"][0]["left_percent"].is_number());
        assert_eq!(json["grouping"], "phase");
    }

    #[test]
    fn dated_items_filter() {
        let snapshot = snapshot();
        let dated: Vec<_> = snapshot.dated_items().map(|i| i.id.as_str()).collect();
        assert_eq!(dated, vec!["a", "b"]);
    }
}
