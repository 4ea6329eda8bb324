//! Reading the planning window out of the database.

use crate::adapters::coords::{DAYS_PER_WEEK, NUM_WEEKS};
use crate::adapters::load::load_grid;
use crate::db::queries::load_tasks_in_range;
use crate::errors::{AppError, AppResult};
use crate::grid::config::GridConfig;
use crate::grid::slot_grid::SlotGrid;
use crate::models::task::Task;
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;

/// Inclusive date range of the whole window, or of one week of it.
pub fn window_range(config: &GridConfig, week: Option<usize>) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = config.first_date();
    match week {
        None => {
            let last = first + Duration::days(config.num_days() as i64 - 1);
            Ok((first, last))
        }
        Some(w) if w < NUM_WEEKS => {
            let from = first + Duration::days((w * DAYS_PER_WEEK) as i64);
            Ok((from, from + Duration::days(DAYS_PER_WEEK as i64 - 1)))
        }
        Some(w) => Err(AppError::InvalidOperation(format!(
            "week {w} is outside the planning window (0..{NUM_WEEKS})"
        ))),
    }
}

/// Scheduled tasks of the range, ordered by date and start.
pub fn list_scheduled(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Task>> {
    let tasks = load_tasks_in_range(conn, from, to)?;
    Ok(tasks
        .into_iter()
        .filter(|t| t.status.is_scheduled())
        .collect())
}

/// Saved grid for the window described by `config`.
pub fn load_window(conn: &Connection, config: GridConfig) -> AppResult<SlotGrid> {
    let (from, to) = window_range(&config, None)?;
    let tasks = load_tasks_in_range(conn, from, to)?;
    Ok(load_grid(&tasks, config))
}
