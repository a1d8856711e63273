//! Read-only summary commands (agenda, status, report)

use anyhow::Result;

use super::app::Context;
use super::output::{hours, Output};
use crate::domain::{
    summarize, Grouping, MilestoneStatus, ProjectView, TimelineEntry, WorkStatus, ZoomMode,
};

/// Show work items and milestones in date order
pub fn agenda(output: &Output, ctx: &Context) -> Result<()> {
    let entries = ctx.snapshot.agenda();
    output.verbose_ctx("agenda", &format!("Merged {} entries", entries.len()));

    if output.is_json() {
        output.data(&entries);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Nothing scheduled.");
        return Ok(());
    }

    println!("{:<12} {:<4} {:<16} {:<12} TITLE", "DATE", "", "ID", "STATUS");
    println!("{}", "-".repeat(80));
    for entry in entries {
        let date = entry
            .sort_date()
            .map(|d| d.to_string())
            .unwrap_or_default();
        let (marker, id, status) = match entry {
            TimelineEntry::Milestone(m) => ("<>", m.id.as_str(), m.status.label()),
            TimelineEntry::WorkItem(item) => ("--", item.id.as_str(), item.status.label()),
        };
        println!(
            "{:<12} {:<4} {:<16} {:<12} {}",
            date,
            marker,
            id,
            status,
            entry.title()
        );
    }

    Ok(())
}

/// Show project status overview
pub fn status(output: &Output, ctx: &Context) -> Result<()> {
    let snapshot = &ctx.snapshot;
    let roots = snapshot.forest()?;
    let rollup = summarize(&roots);

    let status_counts: Vec<_> = WorkStatus::ALL
        .iter()
        .map(|status| {
            let count = snapshot
                .work_items
                .iter()
                .filter(|item| item.status == *status)
                .count();
            (*status, count)
        })
        .collect();

    let count_milestones = |status: MilestoneStatus| {
        snapshot
            .milestones
            .iter()
            .filter(|m| m.status == status)
            .count()
    };
    let pending = count_milestones(MilestoneStatus::Pending);
    let achieved = count_milestones(MilestoneStatus::Achieved);
    let missed = count_milestones(MilestoneStatus::Missed);
    let dated = snapshot.dated_items().count();

    if output.is_json() {
        let by_status: serde_json::Map<_, _> = status_counts
            .iter()
            .map(|(status, count)| {
                (
                    serde_json::to_value(status)
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_string))
                        .unwrap_or_else(|| status.label().to_string()),
                    serde_json::json!(count),
                )
            })
            .collect();

        output.data(&serde_json::json!({
            "work_items": {
                "total": snapshot.work_items.len(),
                "roots": roots.len(),
                "dated": dated,
                "by_status": by_status,
            },
            "effort": rollup,
            "milestones": {
                "total": snapshot.milestones.len(),
                "pending": pending,
                "achieved": achieved,
                "missed": missed,
            },
        }));
        return Ok(());
    }

    println!("Project Status");
    println!("{}", "=".repeat(40));
    println!();
    println!(
        "Work items: {} total ({} top-level, {} scheduled)",
        snapshot.work_items.len(),
        roots.len(),
        dated
    );
    for (status, count) in &status_counts {
        println!("  {:<13} {}", format!("{}:", status.label()), count);
    }
    println!();
    println!(
        "Effort: {} of {} done ({}%), {} remaining",
        hours(rollup.completed_effort),
        hours(rollup.total_effort),
        rollup.completion_percent,
        hours(rollup.remaining_effort())
    );
    println!();
    println!(
        "Milestones: {} total ({} pending, {} achieved, {} missed)",
        snapshot.milestones.len(),
        pending,
        achieved,
        missed
    );

    Ok(())
}

/// Export every view of the project as one document
///
/// The document is JSON in both formats; text mode pretty-prints it.
pub fn report(output: &Output, ctx: &Context, zoom: ZoomMode, grouping: Grouping) -> Result<()> {
    let view = ProjectView::build(
        &ctx.snapshot,
        zoom,
        grouping,
        ctx.unassigned_label(),
        ctx.today,
    )?;
    output.verbose_ctx(
        "report",
        &format!(
            "Built view: {} roots, {} periods, {} WBS groups",
            view.tree.len(),
            view.timeline.periods.len(),
            view.wbs.len()
        ),
    );

    output.data(&view);
    Ok(())
}
