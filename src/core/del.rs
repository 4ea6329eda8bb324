use crate::db::log::ttlog_quiet;
use crate::db::queries::{delete_task, load_task};
use crate::errors::{AppError, AppResult};
use crate::models::task::{Task, TaskId};
use rusqlite::Connection;

pub struct DeleteLogic;

impl DeleteLogic {
    /// Removes the record and returns what was deleted.
    pub fn apply(conn: &Connection, id: TaskId) -> AppResult<Task> {
        let task = load_task(conn, id)?.ok_or(AppError::TaskNotFound(id))?;
        delete_task(conn, id)?;

        ttlog_quiet(
            conn,
            "del",
            &id.to_string(),
            &format!(
                "{} {}-{} {}",
                task.date_str(),
                task.start_str(),
                task.end_str(),
                task.description
            ),
        );
        Ok(task)
    }
}
