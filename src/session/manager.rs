//! Stateful editing wrapper around the immutable grid.
//!
//! # Modes
//! - not editing: the current grid is the saved grid;
//! - editing: the current grid is the working grid, with undo history and
//!   dirty-day tracking;
//! - moving (inside editing): one task is being repositioned step by step.

use super::history::{DEFAULT_UNDO_LIMIT, History, HistoryEntry};
use super::move_session::{MoveSession, MoveSessionState};
use super::repository::{TaskRepository, TaskTimeUpdate};
use crate::adapters::diff::diff_grids;
use crate::errors::{AppResult, SlotError, SlotResult};
use crate::grid::slot_grid::SlotGrid;
use crate::models::task::TaskId;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};

type GridOp = fn(&SlotGrid, TaskId) -> SlotResult<SlotGrid>;

#[derive(Debug)]
pub struct SessionManager {
    saved: SlotGrid,
    working: Option<SlotGrid>,
    history: History,
    dirty_days: BTreeSet<usize>,
    moving: Option<MoveSession>,
}

impl SessionManager {
    pub fn new(saved: SlotGrid) -> Self {
        Self::with_undo_limit(saved, DEFAULT_UNDO_LIMIT)
    }

    pub fn with_undo_limit(saved: SlotGrid, undo_limit: usize) -> Self {
        Self {
            saved,
            working: None,
            history: History::new(undo_limit),
            dirty_days: BTreeSet::new(),
            moving: None,
        }
    }

    // ---------------------------
    // State
    // ---------------------------

    /// Working grid while editing, saved grid otherwise.
    pub fn current_grid(&self) -> &SlotGrid {
        self.working.as_ref().unwrap_or(&self.saved)
    }

    pub fn saved_grid(&self) -> &SlotGrid {
        &self.saved
    }

    pub fn working_grid(&self) -> Option<&SlotGrid> {
        self.working.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.working.is_some()
    }

    pub fn is_moving(&self) -> bool {
        self.moving.is_some()
    }

    pub fn dirty_days(&self) -> &BTreeSet<usize> {
        &self.dirty_days
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn move_state(&self) -> Option<&MoveSessionState> {
        self.moving.as_ref().map(|m| &m.state)
    }

    // ---------------------------
    // Mode transitions
    // ---------------------------

    /// Starts editing from the saved grid. No-op when already editing.
    pub fn enter_edit_mode(&mut self) {
        if self.is_editing() {
            return;
        }
        self.working = Some(self.saved.clone());
        self.history.clear();
        self.dirty_days.clear();
        debug!("event=edit_enter module=session status=ok");
    }

    /// Drops every in-flight edit, including a move in progress. The saved
    /// grid is untouched.
    pub fn discard_changes(&mut self) {
        self.working = None;
        self.moving = None;
        self.history.clear();
        self.dirty_days.clear();
        debug!("event=edit_discard module=session status=ok");
    }

    /// Promotes the working grid to saved and stops editing.
    pub fn commit_changes(&mut self) -> SlotResult<()> {
        if self.is_moving() {
            return Err(SlotError::AlreadyMoving);
        }
        let working = self.working.take().ok_or(SlotError::NotInEditMode)?;
        self.saved = working;
        self.history.clear();
        self.dirty_days.clear();
        debug!("event=edit_commit module=session status=ok");
        Ok(())
    }

    /// Persists the changed tasks, one batch per new date, then commits.
    ///
    /// On any repository failure nothing is promoted: editing mode, history
    /// and the working grid stay as they were so the caller can retry or
    /// discard. Returns the number of re-timed tasks.
    pub fn save_changes<R>(&mut self, repo: &mut R) -> AppResult<usize>
    where
        R: TaskRepository + ?Sized,
    {
        if self.is_moving() {
            return Err(SlotError::AlreadyMoving.into());
        }
        let working = self.working.as_ref().ok_or(SlotError::NotInEditMode)?;

        let changes = diff_grids(Some(&self.saved), Some(working));
        let mut by_date: BTreeMap<NaiveDate, Vec<TaskTimeUpdate>> = BTreeMap::new();
        for task in &changes {
            by_date
                .entry(task.date)
                .or_default()
                .push(TaskTimeUpdate::from(task));
        }

        for (date, updates) in &by_date {
            if let Err(err) = repo.update_task_times(*date, updates) {
                warn!(
                    "event=session_save module=session status=error date={} batch={} error={}",
                    date,
                    updates.len(),
                    err
                );
                return Err(err);
            }
        }

        self.commit_changes()?;
        info!(
            "event=session_save module=session status=ok tasks={} dates={}",
            changes.len(),
            by_date.len()
        );
        Ok(changes.len())
    }

    // ---------------------------
    // Undoable edits
    // ---------------------------

    pub fn grow(&mut self, id: TaskId) -> SlotResult<()> {
        self.edit_task("grow", id, SlotGrid::grow)
    }

    pub fn shrink(&mut self, id: TaskId) -> SlotResult<()> {
        self.edit_task("shrink", id, SlotGrid::shrink)
    }

    pub fn add_space(&mut self, id: TaskId) -> SlotResult<()> {
        self.edit_task("add space after", id, SlotGrid::add_space)
    }

    pub fn delete(&mut self, id: TaskId) -> SlotResult<()> {
        self.edit_task("delete", id, SlotGrid::delete)
    }

    pub fn add_space_at(&mut self, day: usize, slot: usize) -> SlotResult<()> {
        self.apply_edit(format!("add space at {day}:{slot}"), |grid| {
            Ok((grid.add_space_at(day, slot)?, vec![day]))
        })
    }

    pub fn remove_space_at(&mut self, day: usize, slot: usize) -> SlotResult<()> {
        self.apply_edit(format!("remove space at {day}:{slot}"), |grid| {
            Ok((grid.remove_space_at(day, slot)?, vec![day]))
        })
    }

    /// Restores the working grid captured by the latest entry. When the stack
    /// drains completely the dirty set is reset as well; partial undo leaves
    /// it as is.
    pub fn undo(&mut self) -> SlotResult<()> {
        if self.is_moving() {
            return Err(SlotError::AlreadyMoving);
        }
        if !self.is_editing() {
            return Err(SlotError::NotInEditMode);
        }
        let entry = self.history.pop().ok_or(SlotError::NothingToUndo)?;
        debug!(
            "event=undo module=session status=ok step=\"{}\" remaining={}",
            entry.description,
            self.history.len()
        );
        self.working = Some(entry.grid);
        if self.history.is_empty() {
            self.dirty_days.clear();
        }
        Ok(())
    }

    fn edit_task(&mut self, verb: &str, id: TaskId, op: GridOp) -> SlotResult<()> {
        self.apply_edit(format!("{verb} task {id}"), |grid| {
            let (_, pos) = grid.find_task_by_id(id).ok_or(SlotError::TaskNotFound)?;
            Ok((op(grid, id)?, vec![pos.day]))
        })
    }

    /// Records the pre-op grid, then runs `op`. The entry is taken back only
    /// when `op` fails; a successful no-op is still one undo step.
    fn apply_edit<F>(&mut self, description: String, op: F) -> SlotResult<()>
    where
        F: FnOnce(&SlotGrid) -> SlotResult<(SlotGrid, Vec<usize>)>,
    {
        if self.is_moving() {
            return Err(SlotError::AlreadyMoving);
        }
        let working = self.working.clone().ok_or(SlotError::NotInEditMode)?;
        let evicted = self.history.push(HistoryEntry {
            description: description.clone(),
            grid: working.clone(),
        });

        match op(&working) {
            Ok((next, days)) => {
                let status = if next.ptr_eq(&working) { "noop" } else { "ok" };
                self.working = Some(next);
                self.dirty_days.extend(days);
                debug!("event=edit module=session status={status} op=\"{description}\"");
                Ok(())
            }
            Err(err) => {
                self.history.rollback(evicted);
                debug!("event=edit module=session status=error op=\"{description}\" error={err}");
                Err(err)
            }
        }
    }

    // ---------------------------
    // Move sub-session
    // ---------------------------

    /// Begins repositioning `id`. The working grid at this point is kept so
    /// the whole move can be cancelled.
    pub fn start_move(&mut self, id: TaskId) -> SlotResult<()> {
        let working = self.working.as_ref().ok_or(SlotError::NotInEditMode)?;
        if self.moving.is_some() {
            return Err(SlotError::AlreadyMoving);
        }
        let (task, pos) = working
            .find_task_by_id(id)
            .ok_or(SlotError::TaskNotFound)?;
        if !working.can_modify_task(&pos) {
            return Err(SlotError::TaskAlreadyStarted);
        }
        self.moving = Some(MoveSession::start(working.clone(), task, pos));
        debug!("event=move_start module=session status=ok task={id}");
        Ok(())
    }

    pub fn move_up(&mut self) -> SlotResult<()> {
        self.step_move(SlotGrid::move_up)
    }

    pub fn move_down(&mut self) -> SlotResult<()> {
        self.step_move(SlotGrid::move_down)
    }

    pub fn move_left(&mut self) -> SlotResult<()> {
        self.step_move(SlotGrid::move_left)
    }

    pub fn move_right(&mut self) -> SlotResult<()> {
        self.step_move(SlotGrid::move_right)
    }

    /// Keeps the moved layout and records it as a single undo step, even
    /// when every step was a no-op. Source and target days become dirty.
    pub fn confirm_move(&mut self) -> SlotResult<()> {
        if !self.is_editing() {
            return Err(SlotError::NotInEditMode);
        }
        let session = self.moving.take().ok_or(SlotError::NotMoving)?;
        let id = session.task_id();

        self.history.push(HistoryEntry {
            description: format!("move task {id}"),
            grid: session.snapshot,
        });
        self.dirty_days.insert(session.state.original.day);
        self.dirty_days.insert(session.state.current.day);
        debug!(
            "event=move_confirm module=session status=ok task={} from_day={} to_day={}",
            id, session.state.original.day, session.state.current.day
        );
        Ok(())
    }

    /// Puts the working grid back to where the move started. History is
    /// untouched.
    pub fn cancel_move(&mut self) -> SlotResult<()> {
        let session = self.moving.take().ok_or(SlotError::NotMoving)?;
        debug!(
            "event=move_cancel module=session status=ok task={}",
            session.task_id()
        );
        self.working = Some(session.snapshot);
        Ok(())
    }

    fn step_move(&mut self, op: GridOp) -> SlotResult<()> {
        let session = self.moving.as_mut().ok_or(SlotError::NotMoving)?;
        let working = self.working.as_ref().ok_or(SlotError::NotInEditMode)?;
        let next = op(working, session.task_id())?;
        session.refresh(&next);
        self.working = Some(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::config::{FixedClock, GridConfig};
    use crate::models::category::Category;
    use crate::models::task::Task;
    use chrono::NaiveTime;
    use std::sync::Arc;

    fn grid() -> SlotGrid {
        let first = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let task = Arc::new(Task::new(1, "a", Category::Deep, first, t, t));
        SlotGrid::new(GridConfig::new(first).with_clock(Arc::new(FixedClock(now))))
            .place(task, 0, 36, 2)
            .unwrap()
    }

    #[test]
    fn failed_edit_leaves_no_history() {
        let mut session = SessionManager::new(grid());
        session.enter_edit_mode();
        assert_eq!(session.grow(42), Err(SlotError::TaskNotFound));
        assert!(session.history().is_empty());
        assert!(session.dirty_days().is_empty());
    }

    #[test]
    fn noop_edit_is_still_an_undo_step() {
        let mut session = SessionManager::new(grid());
        session.enter_edit_mode();
        // nothing follows the task, so adding space changes no cell
        session.add_space(1).unwrap();
        assert_eq!(session.history().len(), 1);
        assert!(session.current_grid().ptr_eq(session.saved_grid()));
        assert_eq!(session.dirty_days().iter().copied().collect::<Vec<_>>(), vec![0]);

        session.undo().unwrap();
        assert!(session.history().is_empty());
        assert!(session.dirty_days().is_empty());
    }

    #[test]
    fn edits_are_rejected_while_moving() {
        let mut session = SessionManager::new(grid());
        session.enter_edit_mode();
        session.start_move(1).unwrap();
        assert_eq!(session.grow(1), Err(SlotError::AlreadyMoving));
        assert_eq!(session.undo(), Err(SlotError::AlreadyMoving));
        assert_eq!(session.commit_changes(), Err(SlotError::AlreadyMoving));
    }
}
