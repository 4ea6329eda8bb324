//! Batch editing sessions driven from the command line.
//!
//! A list of operations runs inside one `SessionManager` edit. The resulting
//! diff is either reported only (dry run) or written back in a single
//! transaction: deletions first, then one re-timing batch per date.

use super::plan::load_window;
use crate::adapters::diff::{diff_grids, removed_task_ids};
use crate::db::log::ttlog;
use crate::db::queries::delete_task;
use crate::db::repository::SqliteTaskRepository;
use crate::errors::{AppError, AppResult, SlotError};
use crate::grid::config::{GridConfig, slot_floor};
use crate::models::task::{Task, TaskId};
use crate::session::manager::SessionManager;
use crate::utils::date::parse_date;
use crate::utils::time::parse_time;
use chrono::{NaiveDate, NaiveTime};
use log::{debug, info};
use rusqlite::Connection;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "up" | "u" => Some(Self::Up),
            "down" | "d" => Some(Self::Down),
            "left" | "l" => Some(Self::Left),
            "right" | "r" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Grow(TaskId),
    Shrink(TaskId),
    Space(TaskId),
    SpaceAt(NaiveDate, NaiveTime),
    Unspace(NaiveDate, NaiveTime),
    Delete(TaskId),
    Move(TaskId, Vec<Direction>),
    Undo,
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Grow(id) => write!(f, "grow {id}"),
            EditOp::Shrink(id) => write!(f, "shrink {id}"),
            EditOp::Space(id) => write!(f, "space {id}"),
            EditOp::SpaceAt(d, t) => write!(f, "space-at {} {}", d, t.format("%H:%M")),
            EditOp::Unspace(d, t) => write!(f, "unspace {} {}", d, t.format("%H:%M")),
            EditOp::Delete(id) => write!(f, "delete {id}"),
            EditOp::Move(id, dirs) => {
                write!(f, "move {id}")?;
                for d in dirs {
                    write!(f, " {}", d.as_str())?;
                }
                Ok(())
            }
            EditOp::Undo => write!(f, "undo"),
        }
    }
}

impl EditOp {
    /// Parses a flat token list such as
    /// `grow 3 move 4 down down space-at 2025-10-07 10:00 undo`.
    pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> AppResult<Vec<EditOp>> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let mut ops = Vec::new();
        let mut rest = tokens.iter().copied().peekable();

        while let Some(keyword) = rest.next() {
            let op = match keyword.to_lowercase().as_str() {
                "grow" => EditOp::Grow(next_id(keyword, rest.next())?),
                "shrink" => EditOp::Shrink(next_id(keyword, rest.next())?),
                "space" => EditOp::Space(next_id(keyword, rest.next())?),
                "delete" => EditOp::Delete(next_id(keyword, rest.next())?),
                "space-at" => {
                    let (d, t) = next_point(keyword, rest.next(), rest.next())?;
                    EditOp::SpaceAt(d, t)
                }
                "unspace" => {
                    let (d, t) = next_point(keyword, rest.next(), rest.next())?;
                    EditOp::Unspace(d, t)
                }
                "move" => {
                    let id = next_id(keyword, rest.next())?;
                    let mut dirs = Vec::new();
                    while let Some(dir) = rest.peek().and_then(|s| Direction::from_code(s)) {
                        dirs.push(dir);
                        rest.next();
                    }
                    if dirs.is_empty() {
                        return Err(AppError::InvalidOperation(format!(
                            "move {id} needs at least one direction (up, down, left, right)"
                        )));
                    }
                    EditOp::Move(id, dirs)
                }
                "undo" => EditOp::Undo,
                other => {
                    return Err(AppError::InvalidOperation(format!(
                        "unknown operation '{other}'"
                    )));
                }
            };
            ops.push(op);
        }

        if ops.is_empty() {
            return Err(AppError::InvalidOperation("no operation given".into()));
        }
        Ok(ops)
    }
}

fn next_id(keyword: &str, token: Option<&str>) -> AppResult<TaskId> {
    let token =
        token.ok_or_else(|| AppError::InvalidOperation(format!("{keyword} needs a task id")))?;
    token
        .parse::<TaskId>()
        .map_err(|_| AppError::InvalidOperation(format!("{keyword}: '{token}' is not a task id")))
}

fn next_point(
    keyword: &str,
    date: Option<&str>,
    time: Option<&str>,
) -> AppResult<(NaiveDate, NaiveTime)> {
    let (Some(date), Some(time)) = (date, time) else {
        return Err(AppError::InvalidOperation(format!(
            "{keyword} needs a date and a time (YYYY-MM-DD HH:MM)"
        )));
    };
    let d = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
    let t = parse_time(time).ok_or_else(|| AppError::InvalidTime(time.to_string()))?;
    Ok((d, t))
}

/// What an edit session produced.
#[derive(Debug)]
pub struct EditOutcome {
    /// Tasks at their new date and times.
    pub changes: Vec<Task>,
    pub deleted: Vec<TaskId>,
    /// Dates touched by the edits, ascending.
    pub dirty_dates: Vec<NaiveDate>,
    /// Whether anything was written to the database.
    pub saved: bool,
}

pub struct EditLogic;

impl EditLogic {
    pub fn apply(
        conn: &Connection,
        config: GridConfig,
        undo_limit: usize,
        ops: &[EditOp],
        dry_run: bool,
    ) -> AppResult<EditOutcome> {
        let saved = load_window(conn, config)?;
        let mut session = SessionManager::with_undo_limit(saved, undo_limit);
        session.enter_edit_mode();

        for op in ops {
            debug!("event=edit_op module=core op=\"{op}\"");
            if let Err(err) = run_op(&mut session, op) {
                session.discard_changes();
                return Err(err);
            }
        }

        let before = session.saved_grid().clone();
        let after = session
            .working_grid()
            .cloned()
            .ok_or(SlotError::NotInEditMode)?;
        let changes = diff_grids(Some(&before), Some(&after));
        let deleted = removed_task_ids(&before, &after);
        let dirty_dates = session
            .dirty_days()
            .iter()
            .filter_map(|day| after.config().date_for_day(*day))
            .collect();

        let mut outcome = EditOutcome {
            changes,
            deleted,
            dirty_dates,
            saved: false,
        };

        if dry_run || (outcome.changes.is_empty() && outcome.deleted.is_empty()) {
            session.discard_changes();
            return Ok(outcome);
        }

        let tx = conn.unchecked_transaction()?;
        for id in &outcome.deleted {
            delete_task(&tx, *id)?;
        }
        let mut repo = SqliteTaskRepository::new(&tx);
        session.save_changes(&mut repo)?;

        let summary = ops
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        ttlog(
            &tx,
            "edit",
            &format!("{} task(s)", outcome.changes.len() + outcome.deleted.len()),
            &summary,
        )?;
        tx.commit()?;

        info!(
            "event=edit_save module=core status=ok changed={} deleted={}",
            outcome.changes.len(),
            outcome.deleted.len()
        );
        outcome.saved = true;
        Ok(outcome)
    }
}

fn run_op(session: &mut SessionManager, op: &EditOp) -> AppResult<()> {
    match op {
        EditOp::Grow(id) => session.grow(*id)?,
        EditOp::Shrink(id) => session.shrink(*id)?,
        EditOp::Space(id) => session.add_space(*id)?,
        EditOp::Delete(id) => session.delete(*id)?,
        EditOp::SpaceAt(date, time) => {
            let day = day_of(session.current_grid().config(), *date)?;
            session.add_space_at(day, slot_floor(*time))?;
        }
        EditOp::Unspace(date, time) => {
            let day = day_of(session.current_grid().config(), *date)?;
            session.remove_space_at(day, slot_floor(*time))?;
        }
        EditOp::Move(id, dirs) => {
            session.start_move(*id)?;
            for dir in dirs {
                let step = match dir {
                    Direction::Up => session.move_up(),
                    Direction::Down => session.move_down(),
                    Direction::Left => session.move_left(),
                    Direction::Right => session.move_right(),
                };
                if let Err(err) = step {
                    session.cancel_move()?;
                    return Err(err.into());
                }
            }
            session.confirm_move()?;
        }
        EditOp::Undo => session.undo()?,
    }
    Ok(())
}

fn day_of(config: &GridConfig, date: NaiveDate) -> AppResult<usize> {
    config.day_for_date(date).ok_or_else(|| {
        AppError::InvalidOperation(format!("{date} is outside the planning window"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_mixed_operation_list() {
        let ops = EditOp::parse_all(&[
            "grow", "3", "move", "4", "down", "d", "right", "space-at", "2025-10-07", "10:00",
            "undo",
        ])
        .unwrap();
        assert_eq!(
            ops,
            vec![
                EditOp::Grow(3),
                EditOp::Move(4, vec![Direction::Down, Direction::Down, Direction::Right]),
                EditOp::SpaceAt(
                    NaiveDate::from_ymd_opt(2025, 10, 7).unwrap(),
                    NaiveTime::from_hms_opt(10, 0, 0).unwrap()
                ),
                EditOp::Undo,
            ]
        );
        assert_eq!(ops[1].to_string(), "move 4 down down right");
    }

    #[test]
    fn rejects_malformed_lists() {
        assert!(matches!(
            EditOp::parse_all(&["grow"]),
            Err(AppError::InvalidOperation(_))
        ));
        assert!(matches!(
            EditOp::parse_all(&["move", "4"]),
            Err(AppError::InvalidOperation(_))
        ));
        assert!(matches!(
            EditOp::parse_all(&["jump", "4"]),
            Err(AppError::InvalidOperation(_))
        ));
        assert!(matches!(
            EditOp::parse_all(&["unspace", "2025-13-01", "10:00"]),
            Err(AppError::InvalidDate(_))
        ));
        assert!(EditOp::parse_all::<&str>(&[]).is_err());
    }
}
