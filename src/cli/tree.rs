//! Hierarchy view with effort rollups

use anyhow::Result;

use super::app::Context;
use super::output::{hours, Output};
use crate::domain::{summarize, walk_forest, TreeNode};

/// Show the work item tree
pub fn run(output: &Output, ctx: &Context, max_depth: Option<usize>) -> Result<()> {
    let roots = ctx.snapshot.forest()?;
    output.verbose_ctx("tree", &format!("Built {} root nodes", roots.len()));

    if output.is_json() {
        output.data(&roots);
        return Ok(());
    }

    if roots.is_empty() {
        println!("No work items.");
        return Ok(());
    }

    println!(
        "{:<44} {:<12} {:>9} {:>9} {:>5}",
        "TITLE", "STATUS", "EFFORT", "DONE", "%"
    );
    println!("{}", "-".repeat(83));

    for (depth, node) in walk_forest(&roots) {
        if max_depth.is_some_and(|max| depth > max) {
            continue;
        }
        print_node(depth, node);
    }

    let total = summarize(&roots);
    println!("{}", "-".repeat(83));
    println!(
        "{:<44} {:<12} {:>9} {:>9} {:>4}%",
        "Total",
        "",
        hours(total.total_effort),
        hours(total.completed_effort),
        total.completion_percent
    );

    Ok(())
}

fn print_node(depth: usize, node: &TreeNode) {
    let item = node.item();
    let stats = node.stats();
    let label = format!("{}{} [{}]", "  ".repeat(depth), item.title, item.id);
    println!(
        "{:<44} {:<12} {:>9} {:>9} {:>4}%",
        label,
        item.status.label(),
        hours(stats.total_effort),
        hours(stats.completed_effort),
        stats.completion_percent
    );
}
