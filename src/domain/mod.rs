//! Timeline and rollup engine
//!
//! Pure functions over snapshots of work items and milestones. Nothing in
//! this module performs I/O or keeps state between calls.

mod dates;
mod geometry;
mod hierarchy;
mod id;
mod merge;
mod milestone;
mod rollup;
mod tags;
mod timeline;
mod view;
mod wbs;
mod work_item;

pub use dates::{days_between, parse_date};
pub use geometry::{bar, inclusive_days, marker, BarGeometry, MarkerGeometry};
pub use hierarchy::{build_forest, walk_forest, HierarchyError, TreeNode};
pub use id::{IdError, ItemId, MilestoneId};
pub use merge::{merge_chronologically, TimelineEntry};
pub use milestone::{Milestone, MilestoneStatus};
pub use rollup::{aggregate, completion_percent, summarize, RollupStats};
pub use tags::{normalize_tags, TagField};
pub use timeline::{ParseZoomError, Timeline, TimelineBounds, TimelinePeriod, ZoomMode};
pub use view::{
    place_items, place_milestones, ItemPlacement, MilestonePlacement, ProjectView, Snapshot,
};
pub use wbs::{
    build_wbs, Grouping, ParseGroupingError, WbsGroup, WbsPackage, WbsSource, WbsStats,
    WbsSummary, UNASSIGNED_LABEL,
};
pub use work_item::{Phase, WorkItem, WorkStatus};
