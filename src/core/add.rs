use crate::db::log::ttlog_quiet;
use crate::db::queries::{insert_task, load_scheduled_on};
use crate::db::repository::first_overlap;
use crate::errors::{AppResult, SlotError};
use crate::models::task::{Task, TaskId};
use log::{info, warn};
use rusqlite::Connection;

/// High-level business logic for the `add` command.
pub struct AddLogic;

impl AddLogic {
    /// Inserts a scheduled task and returns its id.
    ///
    /// The task must not intersect any other scheduled task of its date.
    pub fn apply(conn: &Connection, task: &Task) -> AppResult<TaskId> {
        task.validate_slots()?;

        let mut same_day = load_scheduled_on(conn, task.date)?;
        same_day.push(task.clone());
        if let Some((a, b)) = first_overlap(&same_day) {
            let other = if a == task.id { b } else { a };
            warn!(
                "event=task_add module=core status=rejected date={} conflict={}",
                task.date, other
            );
            return Err(SlotError::SlotOccupied.into());
        }

        let id = insert_task(conn, task)?;
        info!(
            "event=task_add module=core status=ok id={} date={}",
            id, task.date
        );

        ttlog_quiet(
            conn,
            "add",
            &id.to_string(),
            &format!(
                "{} {}-{} [{}] {}",
                task.date_str(),
                task.start_str(),
                task.end_str(),
                task.category.to_db_str(),
                task.description
            ),
        );
        Ok(id)
    }
}
