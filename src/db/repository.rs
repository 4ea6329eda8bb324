//! SQLite implementation of the session's persistence contract.

use crate::db::queries::load_scheduled_on;
use crate::errors::{AppError, AppResult};
use crate::models::task::{Task, TaskId};
use crate::session::repository::{TaskRepository, TaskTimeUpdate};
use chrono::{Local, NaiveDate};
use log::{debug, warn};
use rusqlite::{Connection, params};

pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SqliteTaskRepository<'_> {
    fn apply_batch(&self, date: NaiveDate, updates: &[TaskTimeUpdate]) -> AppResult<()> {
        let now = Local::now().to_rfc3339();

        for update in updates {
            let changed = self.conn.execute(
                "UPDATE tasks
                 SET date = ?1, start_time = ?2, end_time = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    update.date.format("%Y-%m-%d").to_string(),
                    update.start.format("%H:%M").to_string(),
                    update.end.format("%H:%M").to_string(),
                    now,
                    update.task_id,
                ],
            )?;
            if changed == 0 {
                return Err(AppError::TaskNotFound(update.task_id));
            }
        }

        let scheduled = load_scheduled_on(self.conn, date)?;
        if let Some((a, b)) = first_overlap(&scheduled) {
            warn!(
                "event=batch_rejected module=db status=error date={} first={} second={}",
                date, a, b
            );
            return Err(AppError::Overlap(format!("{date} (tasks {a} and {b})")));
        }
        Ok(())
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    /// Runs inside a savepoint, so a batch can also take part in a wider
    /// transaction opened by the caller.
    fn update_task_times(&mut self, date: NaiveDate, updates: &[TaskTimeUpdate]) -> AppResult<()> {
        self.conn.execute_batch("SAVEPOINT task_batch")?;

        match self.apply_batch(date, updates) {
            Ok(()) => {
                self.conn.execute_batch("RELEASE task_batch")?;
                debug!(
                    "event=batch_applied module=db status=ok date={} updates={}",
                    date,
                    updates.len()
                );
                Ok(())
            }
            Err(err) => {
                if let Err(rollback) = self
                    .conn
                    .execute_batch("ROLLBACK TO task_batch; RELEASE task_batch")
                {
                    warn!("event=batch_rollback module=db status=error error={rollback}");
                }
                Err(err)
            }
        }
    }
}

/// First pair of tasks whose time ranges intersect, if any.
pub fn first_overlap(tasks: &[Task]) -> Option<(TaskId, TaskId)> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by_key(|t| (t.date, t.start));
    sorted
        .windows(2)
        .find(|w| w[0].date == w[1].date && w[0].end > w[1].start)
        .map(|w| (w[0].id, w[1].id))
}
