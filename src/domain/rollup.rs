//! Effort and completion rollup
//!
//! A subtree's total effort is the node's own estimate plus every
//! descendant's. Completed effort counts a node's estimate only when that
//! node is done, again summed over the subtree.

use serde::Serialize;

use super::hierarchy::TreeNode;

/// Aggregated effort for a subtree
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RollupStats {
    /// Estimated hours over the whole subtree
    pub total_effort: f64,
    /// Estimated hours of completed items in the subtree
    pub completed_effort: f64,
    /// `completed_effort / total_effort` as a rounded percentage (0 when there is no effort)
    pub completion_percent: u8,
}

impl RollupStats {
    /// Builds stats from raw totals, deriving the completion percentage
    pub fn from_totals(total_effort: f64, completed_effort: f64) -> Self {
        Self {
            total_effort,
            completed_effort,
            completion_percent: completion_percent(total_effort, completed_effort),
        }
    }

    /// Remaining (not yet completed) effort
    pub fn remaining_effort(&self) -> f64 {
        (self.total_effort - self.completed_effort).max(0.0)
    }
}

/// Rounded completion percentage, clamped to `[0, 100]`
pub fn completion_percent(total: f64, completed: f64) -> u8 {
    if total > 0.0 {
        (100.0 * completed / total).round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

/// Computes the rollup for a subtree from its node and its children's rollups
pub fn aggregate(node: &TreeNode) -> RollupStats {
    let item = node.item();
    let (total, completed) = node.children().iter().map(TreeNode::stats).fold(
        (item.effort(), item.completed_effort()),
        |(total, completed), child| {
            (total + child.total_effort, completed + child.completed_effort)
        },
    );
    RollupStats::from_totals(total, completed)
}

/// Rollup over a whole forest, as if all roots hung off one virtual parent
pub fn summarize(roots: &[TreeNode]) -> RollupStats {
    let (total, completed) = roots
        .iter()
        .map(TreeNode::stats)
        .fold((0.0, 0.0), |(total, completed), stats| {
            (total + stats.total_effort, completed + stats.completed_effort)
        });
    RollupStats::from_totals(total, completed)
}
