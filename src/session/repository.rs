//! Persistence contract consumed by `SessionManager::save_changes`.

use crate::errors::AppResult;
use crate::models::task::{Task, TaskId};
use chrono::{NaiveDate, NaiveTime};

/// New placement of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTimeUpdate {
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl From<&Task> for TaskTimeUpdate {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id,
            date: task.date,
            start: task.start,
            end: task.end,
        }
    }
}

/// Storage able to re-time tasks in batches.
pub trait TaskRepository {
    /// Applies every update of one date atomically. The whole batch is
    /// rejected when the scheduled tasks of `date` would overlap afterwards.
    /// Re-applying the same batch is harmless.
    fn update_task_times(&mut self, date: NaiveDate, updates: &[TaskTimeUpdate]) -> AppResult<()>;
}
