use crate::grid::config::{GridConfig, slot_start_time};
use crate::grid::slot_grid::{SlotGrid, TaskPosition};
use crate::models::task::{Task, TaskId};

/// Tasks of `after` that are new or sit somewhere else than in `before`,
/// with date and times recomputed from their new position.
///
/// Tasks missing from `after` are not reported; deletions are persisted
/// through their own path. A missing grid on either side yields nothing.
pub fn diff_grids(before: Option<&SlotGrid>, after: Option<&SlotGrid>) -> Vec<Task> {
    let (Some(before), Some(after)) = (before, after) else {
        return Vec::new();
    };

    after
        .tasks()
        .into_iter()
        .filter(|(task, pos)| {
            before
                .find_task_by_id(task.id)
                .is_none_or(|(_, old)| old != *pos)
        })
        .map(|(task, pos)| task_at_position(&task, &pos, after.config()))
        .collect()
}

/// Copy of `task` re-timed to `pos`. A run ending at midnight ends at 23:59.
pub fn task_at_position(task: &Task, pos: &TaskPosition, config: &GridConfig) -> Task {
    let date = config.date_for_day(pos.day).unwrap_or(task.date);
    task.with_times(
        date,
        slot_start_time(pos.start_slot),
        slot_start_time(pos.end_slot),
    )
}

/// Ids present in `before` but no longer anywhere in `after`, ascending.
pub fn removed_task_ids(before: &SlotGrid, after: &SlotGrid) -> Vec<TaskId> {
    let mut ids: Vec<TaskId> = before
        .tasks()
        .into_iter()
        .map(|(task, _)| task.id)
        .filter(|id| after.find_task_by_id(*id).is_none())
        .collect();
    ids.sort_unstable();
    ids
}
