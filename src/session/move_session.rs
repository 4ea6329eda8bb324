//! Transient state of an in-progress move.

use crate::grid::slot_grid::{SlotGrid, TaskPosition};
use crate::models::task::{TaskId, TaskRef};

/// What a view needs to draw a move in progress.
#[derive(Debug, Clone)]
pub struct MoveSessionState {
    pub task: TaskRef,
    pub original: TaskPosition,
    pub current: TaskPosition,
    /// Other tasks whose position differs from the pre-move grid, with their
    /// current position. Highlighting only.
    pub affected: Vec<(TaskId, TaskPosition)>,
}

#[derive(Debug)]
pub(crate) struct MoveSession {
    pub state: MoveSessionState,
    /// Working grid as it was when the move started.
    pub snapshot: SlotGrid,
}

impl MoveSession {
    pub fn start(snapshot: SlotGrid, task: TaskRef, original: TaskPosition) -> Self {
        Self {
            state: MoveSessionState {
                task,
                original,
                current: original,
                affected: Vec::new(),
            },
            snapshot,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.state.task.id
    }

    /// Recomputes the current position and the displaced tasks against
    /// `working`.
    pub fn refresh(&mut self, working: &SlotGrid) {
        let id = self.task_id();
        if let Some((_, pos)) = working.find_task_by_id(id) {
            self.state.current = pos;
        }
        self.state.affected = working
            .tasks()
            .into_iter()
            .filter(|(task, _)| task.id != id)
            .filter(|(task, pos)| {
                self.snapshot
                    .find_task_by_id(task.id)
                    .is_none_or(|(_, before)| before != *pos)
            })
            .map(|(task, pos)| (task.id, pos))
            .collect();
    }
}
