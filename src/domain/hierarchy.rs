//! Work item hierarchy
//!
//! Assembles a flat snapshot of work items into a forest using each item's
//! optional parent reference. Items whose parent is missing from the
//! snapshot are promoted to roots. Siblings are ordered by end date with
//! undated items last, keeping input order among ties.
//!
//! Parent cycles are rejected up front: they would leave the items on the
//! cycle unreachable from any root and make recursive walks unbounded.

use log::debug;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::cell::OnceCell;
use std::collections::HashMap;
use thiserror::Error;

use super::id::ItemId;
use super::rollup::{self, RollupStats};
use super::work_item::WorkItem;

#[derive(Debug, Error, PartialEq)]
pub enum HierarchyError {
    #[error("Parent references form a cycle through work item {0}")]
    CycleDetected(ItemId),
}

/// A work item together with its ordered children
#[derive(Debug, Clone)]
pub struct TreeNode {
    item: WorkItem,
    children: Vec<TreeNode>,
    stats: OnceCell<RollupStats>,
}

impl TreeNode {
    /// Creates a node from an item and its already-ordered children
    pub fn new(item: WorkItem, children: Vec<TreeNode>) -> Self {
        Self {
            item,
            children,
            stats: OnceCell::new(),
        }
    }

    pub fn item(&self) -> &WorkItem {
        &self.item
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Rollup statistics for this subtree, computed on first access
    pub fn stats(&self) -> &RollupStats {
        self.stats.get_or_init(|| rollup::aggregate(self))
    }

    /// Number of nodes in this subtree, including this one
    pub fn len(&self) -> usize {
        self.depth_first().count()
    }

    /// Pre-order traversal yielding `(depth, node)`, with this node at depth 0
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: vec![(0, self)],
        }
    }
}

impl Serialize for TreeNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TreeNode", 3)?;
        state.serialize_field("item", &self.item)?;
        state.serialize_field("rollup", self.stats())?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}

/// Pre-order iterator over a subtree
pub struct DepthFirst<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

/// Pre-order traversal over a whole forest
pub fn walk_forest(roots: &[TreeNode]) -> impl Iterator<Item = (usize, &TreeNode)> {
    roots.iter().flat_map(TreeNode::depth_first)
}

/// Builds the forest of work items for a snapshot
pub fn build_forest(items: &[WorkItem]) -> Result<Vec<TreeNode>, HierarchyError> {
    // First pass: index items (first occurrence of an ID wins)
    let mut index: HashMap<&ItemId, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        index.entry(&item.id).or_insert(i);
    }

    // Second pass: attach each item to its parent or to the root list
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match item.parent_id.as_ref() {
            Some(parent_id) => match index.get(parent_id) {
                Some(&parent) => children[parent].push(i),
                None => {
                    debug!(
                        "Work item {} references unknown parent {}, treating as root",
                        item.id, parent_id
                    );
                    roots.push(i);
                }
            },
            None => roots.push(i),
        }
    }

    detect_cycle(items, &children)?;

    sort_by_end_date(items, &mut roots);
    for siblings in &mut children {
        sort_by_end_date(items, siblings);
    }

    Ok(roots
        .into_iter()
        .map(|root| assemble(items, &mut children, root))
        .collect())
}

fn detect_cycle(items: &[WorkItem], children: &[Vec<usize>]) -> Result<(), HierarchyError> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(items.len(), items.len());
    for i in 0..items.len() {
        graph.add_node(i);
    }
    for (parent, kids) in children.iter().enumerate() {
        for &child in kids {
            graph.add_edge(NodeIndex::new(parent), NodeIndex::new(child), ());
        }
    }

    toposort(&graph, None)
        .map(|_| ())
        .map_err(|cycle| HierarchyError::CycleDetected(items[graph[cycle.node_id()]].id.clone()))
}

fn sort_by_end_date(items: &[WorkItem], indices: &mut [usize]) {
    indices.sort_by_key(|&i| {
        let end = items[i].end_date;
        (end.is_none(), end)
    });
}

fn assemble(items: &[WorkItem], children: &mut [Vec<usize>], i: usize) -> TreeNode {
    let kids = std::mem::take(&mut children[i]);
    let kids = kids
        .into_iter()
        .map(|child| assemble(items, children, child))
        .collect();
    TreeNode::new(items[i].clone(), kids)
}
