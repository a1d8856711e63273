//! Work breakdown structure view

use anyhow::Result;
use serde::Serialize;

use super::app::Context;
use super::output::{hours, Output};
use crate::domain::{Grouping, WbsGroup, WbsPackage, WbsSummary};

#[derive(Serialize)]
struct WbsReport<'a> {
    grouping: Grouping,
    groups: &'a [WbsGroup<'a>],
    #[serde(skip_serializing_if = "Option::is_none")]
    packages: Option<Vec<Vec<WbsPackage<'a>>>>,
    summary: WbsSummary,
}

/// Show the work breakdown structure
pub fn run(output: &Output, ctx: &Context, grouping: Grouping, with_items: bool) -> Result<()> {
    let snapshot = &ctx.snapshot;
    let groups = snapshot.wbs(grouping, ctx.unassigned_label());
    let summary = WbsSummary::from_groups(&groups, snapshot.work_items.len());
    output.verbose_ctx(
        "wbs",
        &format!("Grouped by {} into {} groups", grouping, groups.len()),
    );

    if output.is_json() {
        let packages = with_items.then(|| groups.iter().map(|g| g.packages()).collect());
        output.data(&WbsReport {
            grouping,
            groups: &groups,
            packages,
            summary,
        });
        return Ok(());
    }

    if groups.is_empty() {
        println!("No work packages.");
        return Ok(());
    }

    println!("WBS by {}", grouping);
    println!(
        "{:<8} {:<36} {:>6} {:>10} {:>10} {:>5}",
        "CODE", "NAME", "ITEMS", "HOURS", "DONE", "%"
    );
    println!("{}", "-".repeat(80));

    for group in &groups {
        let stats = group.stats;
        println!(
            "{:<8} {:<36} {:>6} {:>10} {:>10} {:>4}%",
            group.code,
            group.name,
            format!("{}/{}", stats.completed_packages, stats.total_packages),
            hours(stats.total_hours),
            hours(stats.completed_hours),
            stats.completion_percent()
        );

        if with_items {
            for package in group.packages() {
                println!(
                    "  {:<6} {:<36} {:>6} {:>10}",
                    package.code,
                    package.item.title,
                    package.item.status.label(),
                    hours(package.item.effort())
                );
            }
        }
    }

    println!("{}", "-".repeat(80));
    println!(
        "Coverage: {}/{} items in a {} ({}%), {} of {} done ({}%)",
        summary.covered_items,
        summary.total_items,
        grouping,
        summary.coverage_percent,
        hours(summary.completed_hours),
        hours(summary.total_hours),
        summary.completion_percent
    );

    Ok(())
}
