use super::{category::Category, task_status::TaskStatus};
use crate::errors::{AppError, AppResult};
use crate::grid::config::{SLOT_MINUTES, SLOTS_PER_DAY, slot_ceil, slot_floor, slot_start_time};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::sync::Arc;

/// Stable task identity. `0` means the record has not been persisted yet.
pub type TaskId = i64;

/// Shared handle to an immutable task record, as stored in grid cells.
pub type TaskRef = Arc<Task>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String, // ⇔ tasks.description
    pub category: Category,  // ⇔ tasks.category ('deep' | 'shallow')
    pub status: TaskStatus,  // ⇔ tasks.status
    pub date: NaiveDate,     // ⇔ tasks.date (TEXT "YYYY-MM-DD")
    pub start: NaiveTime,    // ⇔ tasks.start_time (TEXT "HH:MM")
    pub end: NaiveTime,      // ⇔ tasks.end_time (TEXT "HH:MM")
}

impl Task {
    /// Builds a scheduled task. Times are truncated to the minute.
    pub fn new(
        id: TaskId,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            category,
            status: TaskStatus::Scheduled,
            date,
            start: truncate_to_minute(start),
            end: truncate_to_minute(end),
        }
    }

    /// Rejects records whose end is not strictly after their start.
    pub fn validate(&self) -> AppResult<()> {
        if self.end <= self.start {
            return Err(AppError::InvalidTime(format!(
                "end {} must be after start {}",
                self.end_str(),
                self.start_str()
            )));
        }
        Ok(())
    }

    /// Like `validate`, and both times must sit on a slot boundary so that
    /// no two tasks can share a slot. An end of `23:59` stands for the end
    /// of the day.
    pub fn validate_slots(&self) -> AppResult<()> {
        self.validate()?;

        let end_of_day = self.end == slot_start_time(SLOTS_PER_DAY);
        let off_grid = [(self.start, false), (self.end, end_of_day)]
            .into_iter()
            .find(|(t, exempt)| !exempt && slot_floor(*t) != slot_ceil(*t));
        if let Some((t, _)) = off_grid {
            return Err(AppError::InvalidTime(format!(
                "{} is not on a {}-minute boundary",
                t.format("%H:%M"),
                SLOT_MINUTES
            )));
        }
        Ok(())
    }

    /// Copy of this record moved to a new date and time range.
    pub fn with_times(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            date,
            start,
            end,
            ..self.clone()
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn start_str(&self) -> String {
        self.start.format("%H:%M").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%H:%M").to_string()
    }
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}
