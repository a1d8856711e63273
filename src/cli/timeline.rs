//! Timeline view: range, periods and bar placement

use anyhow::Result;

use super::app::Context;
use super::output::{gauge, Output};
use crate::domain::{place_items, place_milestones, ZoomMode};

const GAUGE_WIDTH: usize = 48;

/// Show the timeline for one zoom mode
pub fn run(output: &Output, ctx: &Context, zoom: ZoomMode) -> Result<()> {
    let snapshot = &ctx.snapshot;
    let timeline = snapshot.timeline(zoom, ctx.today);
    output.verbose_ctx(
        "timeline",
        &format!(
            "Computed {} range {} to {} ({} periods)",
            zoom,
            timeline.bounds.start,
            timeline.bounds.end,
            timeline.periods.len()
        ),
    );

    let items = place_items(&timeline, &snapshot.work_items);
    let milestones = place_milestones(&timeline, &snapshot.milestones);

    if output.is_json() {
        output.data(&serde_json::json!({
            "zoom": timeline.zoom,
            "bounds": timeline.bounds,
            "periods": timeline.periods,
            "items": items,
            "milestones": milestones,
        }));
        return Ok(());
    }

    println!(
        "Timeline ({}): {} to {} ({} days)",
        zoom, timeline.bounds.start, timeline.bounds.end, timeline.bounds.total_days
    );
    let labels: Vec<_> = timeline.periods.iter().map(|p| p.label.as_str()).collect();
    println!("Periods: {}", labels.join(" "));
    println!();

    if items.is_empty() && milestones.is_empty() {
        println!("Nothing dated to place.");
        return Ok(());
    }

    println!(
        "{:<16} {:>7} {:>7}  |{}|",
        "ID",
        "LEFT%",
        "WIDTH%",
        " ".repeat(GAUGE_WIDTH)
    );
    for placement in &items {
        let geometry = placement.geometry;
        println!(
            "{:<16} {:>7.2} {:>7.2}  |{}|",
            placement.id,
            geometry.left_percent,
            geometry.width_percent,
            gauge(geometry.left_percent, geometry.width_percent, GAUGE_WIDTH)
        );
    }
    for (placement, milestone) in milestones.iter().zip(&snapshot.milestones) {
        let left = placement.geometry.left_percent;
        let note = if timeline.bounds.contains(milestone.target_date) {
            String::new()
        } else {
            format!(" outside range ({})", milestone.target_date)
        };
        println!(
            "{:<16} {:>7.2} {:>7}  |{}|{}",
            placement.id,
            left,
            "-",
            gauge(left, 0.0, GAUGE_WIDTH).replace('#', "*"),
            note
        );
    }

    Ok(())
}
