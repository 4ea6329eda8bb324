use crate::grid::config::{GridConfig, slot_ceil, slot_floor};
use crate::grid::slot_grid::SlotGrid;
use crate::models::task::Task;
use log::debug;
use std::sync::Arc;

/// Builds a grid from task records.
///
/// Records that cannot be placed are dropped, not reported: non-scheduled
/// tasks, dates outside the window, and `end <= start`. Source data is
/// trusted to be non-overlapping, so the occupancy check is skipped.
pub fn load_grid(tasks: &[Task], config: GridConfig) -> SlotGrid {
    let mut grid = SlotGrid::new(config);
    let mut dropped = 0usize;

    for task in tasks {
        let Some((day, start, end)) = slot_range(task, grid.config()) else {
            dropped += 1;
            continue;
        };
        match grid.place_unchecked(Arc::new(task.clone()), day, start, end - start) {
            Ok(next) => grid = next,
            Err(_) => dropped += 1,
        }
    }

    debug!(
        "event=grid_load module=adapters status=ok placed={} dropped={}",
        tasks.len() - dropped,
        dropped
    );
    grid
}

/// `(day, start_slot, end_slot)` for a placeable record.
fn slot_range(task: &Task, config: &GridConfig) -> Option<(usize, usize, usize)> {
    if !task.status.is_scheduled() || task.end <= task.start {
        return None;
    }
    let day = config.day_for_date(task.date)?;
    Some((day, slot_floor(task.start), slot_ceil(task.end)))
}
