//! Planline - timeline, rollup and WBS views over local project snapshots
//!
//! Planline reads work items and milestones from `.planline/` and derives
//! a parent/child tree with effort rollups, a zoomable timeline with bar
//! geometry, a chronological agenda and a work breakdown structure.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{ItemId, Milestone, MilestoneId, Snapshot, WorkItem, WorkStatus};
