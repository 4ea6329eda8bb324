use crate::db::log::ttlog_quiet;
use crate::db::queries::{load_scheduled_on, load_task, update_task_status};
use crate::db::repository::first_overlap;
use crate::errors::{AppError, AppResult, SlotError};
use crate::models::task::{Task, TaskId};
use crate::models::task_status::TaskStatus;
use rusqlite::Connection;

pub struct StatusLogic;

impl StatusLogic {
    /// Changes the lifecycle status of a task. Putting a task back to
    /// `scheduled` fails when its slot has been taken in the meantime.
    pub fn apply(conn: &Connection, id: TaskId, status: TaskStatus) -> AppResult<Task> {
        let task = load_task(conn, id)?.ok_or(AppError::TaskNotFound(id))?;
        if task.status == status {
            return Ok(task);
        }

        if status.is_scheduled() {
            task.validate_slots()?;
            let mut same_day = load_scheduled_on(conn, task.date)?;
            same_day.push(task.clone());
            if first_overlap(&same_day).is_some() {
                return Err(SlotError::SlotOccupied.into());
            }
        }

        update_task_status(conn, id, status)?;
        ttlog_quiet(
            conn,
            "status",
            &id.to_string(),
            &format!("{} -> {}", task.status.to_db_str(), status.to_db_str()),
        );

        Ok(Task { status, ..task })
    }
}
