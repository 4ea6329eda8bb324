use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::task::{Task, TaskId};
use crate::models::task_status::TaskStatus;
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const TASK_COLUMNS: &str = "id, description, category, status, date, start_time, end_time";

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<Task> {
    let date_str: String = row.get("date")?;
    let start_str: String = row.get("start_time")?;
    let end_str: String = row.get("end_time")?;
    let category_str: String = row.get("category")?;
    let status_str: String = row.get("status")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(date_str.clone())))?;
    let start = NaiveTime::parse_from_str(&start_str, "%H:%M")
        .map_err(|_| conversion_error(AppError::InvalidTime(start_str.clone())))?;
    let end = NaiveTime::parse_from_str(&end_str, "%H:%M")
        .map_err(|_| conversion_error(AppError::InvalidTime(end_str.clone())))?;
    let category = Category::from_db_str(&category_str)
        .ok_or_else(|| conversion_error(AppError::InvalidCategory(category_str.clone())))?;
    let status = TaskStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(AppError::InvalidStatus(status_str.clone())))?;

    Ok(Task {
        id: row.get("id")?,
        description: row.get("description")?,
        category,
        status,
        date,
        start,
        end,
    })
}

/// Inserts a new record and returns its id. The record's own `id` is ignored.
pub fn insert_task(conn: &Connection, task: &Task) -> AppResult<TaskId> {
    task.validate()?;
    conn.execute(
        "INSERT INTO tasks (description, category, status, date, start_time, end_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            task.description,
            task.category.to_db_str(),
            task.status.to_db_str(),
            task.date_str(),
            task.start_str(),
            task.end_str(),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_task(conn: &Connection, id: TaskId) -> AppResult<Option<Task>> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
    let task = conn.query_row(&sql, [id], map_row).optional()?;
    Ok(task)
}

/// Every task dated `from..=to`, any status, ordered by date and start.
pub fn load_tasks_in_range(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Task>> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date ASC, start_time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        [
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string(),
        ],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Scheduled tasks of one date, ordered by start.
pub fn load_scheduled_on(conn: &Connection, date: NaiveDate) -> AppResult<Vec<Task>> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE date = ?1 AND status = 'scheduled'
         ORDER BY start_time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([date.format("%Y-%m-%d").to_string()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_task(conn: &Connection, id: TaskId) -> AppResult<()> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::TaskNotFound(id));
    }
    Ok(())
}

pub fn update_task_status(conn: &Connection, id: TaskId, status: TaskStatus) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.to_db_str(), Local::now().to_rfc3339(), id],
    )?;
    if changed == 0 {
        return Err(AppError::TaskNotFound(id));
    }
    Ok(())
}

pub fn load_log(conn: &Connection) -> Result<Vec<(i64, String, String, String, String)>> {
    let mut stmt =
        conn.prepare("SELECT id, date, operation, target, message FROM log ORDER BY id ASC")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }

    Ok(out)
}
