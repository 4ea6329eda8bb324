//! Immutable slot grid.
//!
//! A grid is a flat vector of `num_days × 96` cells, each empty or holding a
//! shared task reference. Every operation that changes placement builds a
//! fresh vector and returns a new grid; the receiver is never touched, so old
//! grids stay valid for as long as someone holds them (undo history, move
//! snapshots).
//!
//! Invariants:
//! - a task's cells form one contiguous run inside a single day;
//! - two distinct tasks never share a cell;
//! - the cell vector length never changes.

use super::config::{GridConfig, SLOTS_PER_DAY};
use crate::errors::{SlotError, SlotResult};
use crate::models::task::{TaskId, TaskRef};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

type Cells = Vec<Option<TaskRef>>;

/// Where a task sits: `start_slot..end_slot` (end exclusive) on `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TaskPosition {
    pub day: usize,
    pub start_slot: usize,
    pub end_slot: usize,
}

impl TaskPosition {
    pub fn num_slots(&self) -> usize {
        self.end_slot - self.start_slot
    }
}

#[derive(Clone)]
pub struct SlotGrid {
    config: Arc<GridConfig>,
    cells: Arc<Cells>,
}

impl fmt::Debug for SlotGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tasks: Vec<(TaskId, TaskPosition)> = self
            .tasks()
            .into_iter()
            .map(|(task, pos)| (task.id, pos))
            .collect();
        f.debug_struct("SlotGrid")
            .field("first_date", &self.config.first_date())
            .field("num_days", &self.config.num_days())
            .field("tasks", &tasks)
            .finish()
    }
}

impl SlotGrid {
    /// Empty grid over the configured window.
    pub fn new(config: GridConfig) -> Self {
        let cells = vec![None; config.total_slots()];
        Self {
            config: Arc::new(config),
            cells: Arc::new(cells),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn num_days(&self) -> usize {
        self.config.num_days()
    }

    /// True when both grids share the same cell storage, i.e. one is the
    /// unchanged result of a no-op on the other.
    pub fn ptr_eq(&self, other: &SlotGrid) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    // ---------------------------
    // Queries
    // ---------------------------

    /// Task occupying a cell. Out-of-range coordinates are simply empty.
    pub fn task_at(&self, day: usize, slot: usize) -> Option<&TaskRef> {
        if !self.in_range(day, slot) {
            return None;
        }
        self.cells[index(day, slot)].as_ref()
    }

    /// First run (day-major, slot-minor) holding `id`.
    pub fn find_task_by_id(&self, id: TaskId) -> Option<(TaskRef, TaskPosition)> {
        for day in 0..self.num_days() {
            for slot in 0..SLOTS_PER_DAY {
                if let Some(task) = self.task_at(day, slot)
                    && task.id == id
                {
                    let pos = TaskPosition {
                        day,
                        start_slot: slot,
                        end_slot: self.run_end(day, slot, id),
                    };
                    return Some((Arc::clone(task), pos));
                }
            }
        }
        None
    }

    /// Every task once, in scan order.
    pub fn tasks(&self) -> Vec<(TaskRef, TaskPosition)> {
        (0..self.num_days())
            .flat_map(|day| self.tasks_on_day(day))
            .fold(
                (HashSet::new(), Vec::new()),
                |(mut seen, mut out), (task, pos)| {
                    if seen.insert(task.id) {
                        out.push((task, pos));
                    }
                    (seen, out)
                },
            )
            .1
    }

    /// Runs on one day, in slot order.
    pub fn tasks_on_day(&self, day: usize) -> Vec<(TaskRef, TaskPosition)> {
        let mut out = Vec::new();
        if day >= self.num_days() {
            return out;
        }
        let mut slot = 0;
        while slot < SLOTS_PER_DAY {
            match self.task_at(day, slot) {
                Some(task) => {
                    let end = self.run_end(day, slot, task.id);
                    out.push((
                        Arc::clone(task),
                        TaskPosition {
                            day,
                            start_slot: slot,
                            end_slot: end,
                        },
                    ));
                    slot = end;
                }
                None => slot += 1,
            }
        }
        out
    }

    /// A position at or before "now" is past. Days before today are past,
    /// days after are future; if now predates the window nothing is past.
    pub fn is_past_position(&self, day: usize, slot: usize) -> bool {
        slot < self.first_open_slot(day)
    }

    /// Only the start matters: a task that has begun is frozen as a whole.
    pub fn can_modify_task(&self, pos: &TaskPosition) -> bool {
        !self.is_past_position(pos.day, pos.start_slot)
    }

    // ---------------------------
    // Placement
    // ---------------------------

    /// Places `task` over `num_slots` slots starting at `(day, start)`,
    /// clamped at the end of the day. Re-placing a task over its own cells
    /// is allowed.
    pub fn place(
        &self,
        task: TaskRef,
        day: usize,
        start: usize,
        num_slots: usize,
    ) -> SlotResult<SlotGrid> {
        if !self.in_range(day, start) || num_slots == 0 {
            return Err(SlotError::InvalidSlotPosition);
        }
        let end = (start + num_slots).min(SLOTS_PER_DAY);
        let occupied = (start..end).any(|slot| {
            self.task_at(day, slot)
                .is_some_and(|existing| existing.id != task.id)
        });
        if occupied {
            return Err(SlotError::SlotOccupied);
        }
        self.place_unchecked(task, day, start, num_slots)
    }

    /// Like `place` without the occupancy check. Used by the loader, whose
    /// source data is already non-overlapping.
    pub(crate) fn place_unchecked(
        &self,
        task: TaskRef,
        day: usize,
        start: usize,
        num_slots: usize,
    ) -> SlotResult<SlotGrid> {
        if !self.in_range(day, start) || num_slots == 0 {
            return Err(SlotError::InvalidSlotPosition);
        }
        let end = (start + num_slots).min(SLOTS_PER_DAY);
        let mut cells = self.copy_cells();
        fill(&mut cells, day, start, end, Some(task));
        Ok(self.with_cells(cells))
    }

    // ---------------------------
    // Same-day moves
    // ---------------------------

    /// Moves a task one step earlier. Swaps with an adjacent task, otherwise
    /// steps `display_slot_size` slots into the empty run above it.
    pub fn move_up(&self, id: TaskId) -> SlotResult<SlotGrid> {
        let (task, pos) = self.modifiable(id)?;
        if pos.start_slot == 0 {
            return Ok(self.clone());
        }
        let floor = self.first_open_slot(pos.day);

        if let Some(prev) = self.task_at(pos.day, pos.start_slot - 1) {
            let prev = Arc::clone(prev);
            let prev_start = self.run_start(pos.day, pos.start_slot - 1, prev.id);
            // a started neighbour stays where it is
            if prev_start < floor {
                return Ok(self.clone());
            }
            let mut cells = self.copy_cells();
            let split = prev_start + pos.num_slots();
            fill(&mut cells, pos.day, prev_start, split, Some(task));
            fill(&mut cells, pos.day, split, pos.end_slot, Some(prev));
            return Ok(self.with_cells(cells));
        }

        let gap_start = self.occupied_end_before(pos.day, pos.start_slot);
        let target = pos
            .start_slot
            .saturating_sub(self.config.display_slot_size())
            .max(gap_start)
            .max(floor);
        if target >= pos.start_slot {
            return Ok(self.clone());
        }
        Ok(self.relocate(task, &pos, target))
    }

    /// Moves a task one step later. Swaps with an adjacent task, otherwise
    /// steps `display_slot_size` slots into the empty run below it.
    pub fn move_down(&self, id: TaskId) -> SlotResult<SlotGrid> {
        let (task, pos) = self.modifiable(id)?;
        if pos.end_slot >= SLOTS_PER_DAY {
            return Ok(self.clone());
        }

        if let Some(next) = self.task_at(pos.day, pos.end_slot) {
            let next = Arc::clone(next);
            let next_end = self.run_end(pos.day, pos.end_slot, next.id);
            let mut cells = self.copy_cells();
            let split = pos.start_slot + (next_end - pos.end_slot);
            fill(&mut cells, pos.day, pos.start_slot, split, Some(next));
            fill(&mut cells, pos.day, split, next_end, Some(task));
            return Ok(self.with_cells(cells));
        }

        let gap_end = self
            .next_occupied(pos.day, pos.end_slot)
            .unwrap_or(SLOTS_PER_DAY);
        let target =
            (pos.start_slot + self.config.display_slot_size()).min(gap_end - pos.num_slots());
        if target <= pos.start_slot {
            return Ok(self.clone());
        }
        Ok(self.relocate(task, &pos, target))
    }

    // ---------------------------
    // Cross-day moves
    // ---------------------------

    /// Moves a task to the same slot offset on the previous day.
    pub fn move_left(&self, id: TaskId) -> SlotResult<SlotGrid> {
        let (task, pos) = self.modifiable(id)?;
        if pos.day == 0 {
            return Ok(self.clone());
        }
        Ok(self.move_across(task, &pos, pos.day - 1))
    }

    /// Moves a task to the same slot offset on the next day.
    pub fn move_right(&self, id: TaskId) -> SlotResult<SlotGrid> {
        let (task, pos) = self.modifiable(id)?;
        if pos.day + 1 >= self.num_days() {
            return Ok(self.clone());
        }
        Ok(self.move_across(task, &pos, pos.day + 1))
    }

    fn move_across(&self, task: TaskRef, pos: &TaskPosition, target_day: usize) -> SlotGrid {
        if self.is_past_position(target_day, pos.start_slot) {
            return self.clone();
        }
        let len = pos.num_slots();

        // landing inside a task defers insertion to its end
        let mut insert_at = pos.start_slot;
        if let Some(occupant) = self.task_at(target_day, insert_at)
            && self.run_start(target_day, insert_at, occupant.id) < insert_at
        {
            insert_at = self.run_end(target_day, insert_at, occupant.id);
        }
        if insert_at + len > SLOTS_PER_DAY
            || self.any_occupied(target_day, insert_at.max(SLOTS_PER_DAY - len), SLOTS_PER_DAY)
        {
            return self.clone();
        }

        let mut cells = self.copy_cells();
        fill(&mut cells, pos.day, pos.start_slot, pos.end_slot, None);
        shift_left(&mut cells, pos.day, pos.end_slot, len);
        shift_right(&mut cells, target_day, insert_at, len);
        fill(&mut cells, target_day, insert_at, insert_at + len, Some(task));
        self.with_cells(cells)
    }

    // ---------------------------
    // Resizing and spacing
    // ---------------------------

    /// Extends a task by one slot, pushing everything after it down a slot
    /// when the next cell is taken.
    pub fn grow(&self, id: TaskId) -> SlotResult<SlotGrid> {
        let (task, pos) = self.modifiable(id)?;
        if pos.end_slot >= SLOTS_PER_DAY {
            return Ok(self.clone());
        }
        let mut cells = self.copy_cells();
        if self.task_at(pos.day, pos.end_slot).is_some() {
            if self.any_occupied(pos.day, SLOTS_PER_DAY - 1, SLOTS_PER_DAY) {
                return Ok(self.clone());
            }
            shift_right(&mut cells, pos.day, pos.end_slot, 1);
        }
        cells[index(pos.day, pos.end_slot)] = Some(task);
        Ok(self.with_cells(cells))
    }

    /// Drops a task's last slot.
    pub fn shrink(&self, id: TaskId) -> SlotResult<SlotGrid> {
        let (_, pos) = self.modifiable(id)?;
        if pos.num_slots() <= 1 {
            return Err(SlotError::MinimumSlotsDuration);
        }
        let mut cells = self.copy_cells();
        cells[index(pos.day, pos.end_slot - 1)] = None;
        Ok(self.with_cells(cells))
    }

    /// Inserts one empty slot right after a task.
    pub fn add_space(&self, id: TaskId) -> SlotResult<SlotGrid> {
        let (_, pos) = self.modifiable(id)?;
        Ok(self.insert_gap(pos.day, pos.end_slot))
    }

    /// Inserts one empty slot at `(day, slot)`. A slot inside a task snaps to
    /// that task's start so the run is pushed as a whole.
    pub fn add_space_at(&self, day: usize, slot: usize) -> SlotResult<SlotGrid> {
        if !self.in_range(day, slot) {
            return Err(SlotError::InvalidSlotPosition);
        }
        let at = match self.task_at(day, slot) {
            Some(task) => self.run_start(day, slot, task.id),
            None => slot,
        };
        if self.is_past_position(day, at) {
            return Err(SlotError::TaskAlreadyStarted);
        }
        Ok(self.insert_gap(day, at))
    }

    /// Removes the empty slot at `(day, slot)`, pulling everything after it
    /// up by one.
    pub fn remove_space_at(&self, day: usize, slot: usize) -> SlotResult<SlotGrid> {
        if !self.in_range(day, slot) {
            return Err(SlotError::InvalidSlotPosition);
        }
        if self.task_at(day, slot).is_some() || !self.any_occupied(day, slot + 1, SLOTS_PER_DAY)
        {
            return Err(SlotError::NoGapToRemove);
        }
        if self.is_past_position(day, slot) {
            return Err(SlotError::TaskAlreadyStarted);
        }
        let mut cells = self.copy_cells();
        shift_left(&mut cells, day, slot + 1, 1);
        Ok(self.with_cells(cells))
    }

    /// Removes a task and closes the hole it leaves on its day.
    pub fn delete(&self, id: TaskId) -> SlotResult<SlotGrid> {
        let (_, pos) = self.modifiable(id)?;
        let mut cells = self.copy_cells();
        fill(&mut cells, pos.day, pos.start_slot, pos.end_slot, None);
        shift_left(&mut cells, pos.day, pos.end_slot, pos.num_slots());
        Ok(self.with_cells(cells))
    }

    // ---------------------------
    // Internals
    // ---------------------------

    fn in_range(&self, day: usize, slot: usize) -> bool {
        day < self.num_days() && slot < SLOTS_PER_DAY
    }

    fn copy_cells(&self) -> Cells {
        self.cells.as_ref().clone()
    }

    fn with_cells(&self, cells: Cells) -> SlotGrid {
        SlotGrid {
            config: Arc::clone(&self.config),
            cells: Arc::new(cells),
        }
    }

    fn modifiable(&self, id: TaskId) -> SlotResult<(TaskRef, TaskPosition)> {
        let (task, pos) = self.find_task_by_id(id).ok_or(SlotError::TaskNotFound)?;
        if !self.can_modify_task(&pos) {
            return Err(SlotError::TaskAlreadyStarted);
        }
        Ok((task, pos))
    }

    /// First slot of `day` that is not past (96 when the whole day is).
    fn first_open_slot(&self, day: usize) -> usize {
        let (now_day, now_slot) = self.config.now_position();
        let day = day as i64;
        if day < now_day {
            SLOTS_PER_DAY
        } else if day == now_day {
            now_slot + 1
        } else {
            0
        }
    }

    fn is_task(&self, day: usize, slot: usize, id: TaskId) -> bool {
        self.task_at(day, slot).is_some_and(|t| t.id == id)
    }

    fn run_start(&self, day: usize, slot: usize, id: TaskId) -> usize {
        let mut start = slot;
        while start > 0 && self.is_task(day, start - 1, id) {
            start -= 1;
        }
        start
    }

    fn run_end(&self, day: usize, slot: usize, id: TaskId) -> usize {
        let mut end = slot;
        while end < SLOTS_PER_DAY && self.is_task(day, end, id) {
            end += 1;
        }
        end
    }

    fn any_occupied(&self, day: usize, from: usize, to: usize) -> bool {
        (from..to).any(|slot| self.task_at(day, slot).is_some())
    }

    fn next_occupied(&self, day: usize, from: usize) -> Option<usize> {
        (from..SLOTS_PER_DAY).find(|&slot| self.task_at(day, slot).is_some())
    }

    /// End of the last occupied cell before `slot`, or 0.
    fn occupied_end_before(&self, day: usize, slot: usize) -> usize {
        (0..slot)
            .rev()
            .find(|&s| self.task_at(day, s).is_some())
            .map_or(0, |s| s + 1)
    }

    fn relocate(&self, task: TaskRef, pos: &TaskPosition, new_start: usize) -> SlotGrid {
        let mut cells = self.copy_cells();
        fill(&mut cells, pos.day, pos.start_slot, pos.end_slot, None);
        fill(
            &mut cells,
            pos.day,
            new_start,
            new_start + pos.num_slots(),
            Some(task),
        );
        self.with_cells(cells)
    }

    /// One empty slot at `at`; no-op when nothing follows or the day is full
    /// up to its last slot.
    fn insert_gap(&self, day: usize, at: usize) -> SlotGrid {
        if at >= SLOTS_PER_DAY
            || !self.any_occupied(day, at, SLOTS_PER_DAY)
            || self.any_occupied(day, SLOTS_PER_DAY - 1, SLOTS_PER_DAY)
        {
            return self.clone();
        }
        let mut cells = self.copy_cells();
        shift_right(&mut cells, day, at, 1);
        self.with_cells(cells)
    }
}

fn index(day: usize, slot: usize) -> usize {
    day * SLOTS_PER_DAY + slot
}

fn fill(cells: &mut Cells, day: usize, from: usize, to: usize, value: Option<TaskRef>) {
    for slot in from..to {
        cells[index(day, slot)] = value.clone();
    }
}

/// Moves `[from, 96)` of `day` right by `by`. Cells pushed past the end are
/// dropped; callers check for overflow first.
fn shift_right(cells: &mut Cells, day: usize, from: usize, by: usize) {
    for slot in (from..SLOTS_PER_DAY).rev() {
        let cell = cells[index(day, slot)].take();
        if slot + by < SLOTS_PER_DAY {
            cells[index(day, slot + by)] = cell;
        }
    }
}

/// Moves `[from, 96)` of `day` left by `by`, overwriting `[from - by, from)`
/// and clearing the tail.
fn shift_left(cells: &mut Cells, day: usize, from: usize, by: usize) {
    for slot in from..SLOTS_PER_DAY {
        let cell = cells[index(day, slot)].take();
        cells[index(day, slot - by)] = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::config::FixedClock;
    use crate::models::category::Category;
    use crate::models::task::Task;
    use chrono::{NaiveDate, NaiveTime};

    fn first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
    }

    fn grid_with_now(day_offset: i64, h: u32, m: u32) -> SlotGrid {
        let now = (first() + chrono::Duration::days(day_offset))
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap());
        SlotGrid::new(GridConfig::new(first()).with_clock(Arc::new(FixedClock(now))))
    }

    fn task(id: TaskId) -> TaskRef {
        let t = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        Arc::new(Task::new(id, format!("t{id}"), Category::Deep, first(), t, t))
    }

    #[test]
    fn shift_helpers_preserve_order() {
        let grid = grid_with_now(-1, 0, 0);
        let mut cells = grid.copy_cells();
        cells[index(0, 0)] = Some(task(1));
        cells[index(0, 2)] = Some(task(2));
        shift_right(&mut cells, 0, 0, 3);
        assert!(cells[index(0, 0)].is_none());
        assert_eq!(cells[index(0, 3)].as_ref().unwrap().id, 1);
        assert_eq!(cells[index(0, 5)].as_ref().unwrap().id, 2);
        shift_left(&mut cells, 0, 3, 3);
        assert_eq!(cells[index(0, 0)].as_ref().unwrap().id, 1);
        assert_eq!(cells[index(0, 2)].as_ref().unwrap().id, 2);
        assert!(cells[index(0, 95)].is_none());
    }

    #[test]
    fn past_classification_follows_clock() {
        let grid = grid_with_now(1, 9, 5);
        assert!(grid.is_past_position(0, 95));
        assert!(grid.is_past_position(1, 36));
        assert!(!grid.is_past_position(1, 37));
        assert!(!grid.is_past_position(2, 0));

        let before_window = grid_with_now(-3, 12, 0);
        assert!(!before_window.is_past_position(0, 0));
    }

    #[test]
    fn first_open_slot_for_day_entirely_past() {
        let grid = grid_with_now(5, 0, 0);
        assert_eq!(grid.first_open_slot(4), SLOTS_PER_DAY);
        assert_eq!(grid.first_open_slot(5), 1);
        assert_eq!(grid.first_open_slot(6), 0);
    }
}
