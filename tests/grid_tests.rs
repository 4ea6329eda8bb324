use rtimeblock::errors::SlotError;
use rtimeblock::grid::{SLOTS_PER_DAY, SlotGrid};
use std::collections::HashMap;
use std::sync::Arc;

mod common;
use common::{at, before_window, grid_from, letter_id, pattern, task};

const A: i64 = 1;
const B: i64 = 2;
const C: i64 = 3;

fn grid(days: &[&str]) -> SlotGrid {
    grid_from(days, 4, before_window())
}

/// Every task occupies exactly the run reported by lookup, on one day.
fn assert_runs_are_contiguous(grid: &SlotGrid) {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for day in 0..grid.num_days() {
        for slot in 0..SLOTS_PER_DAY {
            if let Some(t) = grid.task_at(day, slot) {
                *counts.entry(t.id).or_default() += 1;
            }
        }
    }
    for (id, count) in counts {
        let (_, pos) = grid.find_task_by_id(id).unwrap();
        assert_eq!(pos.num_slots(), count, "task {id} is split");
        for slot in pos.start_slot..pos.end_slot {
            assert_eq!(grid.task_at(pos.day, slot).unwrap().id, id);
        }
    }
}

// ---------------------------
// Placement
// ---------------------------

#[test]
fn test_place_rejects_bad_positions_and_overlaps() {
    let g = grid(&["AA------"]);
    assert_eq!(
        g.place(Arc::new(task(B)), 21, 0, 2).unwrap_err(),
        SlotError::InvalidSlotPosition
    );
    assert_eq!(
        g.place(Arc::new(task(B)), 0, SLOTS_PER_DAY, 1).unwrap_err(),
        SlotError::InvalidSlotPosition
    );
    assert_eq!(
        g.place(Arc::new(task(B)), 0, 1, 2).unwrap_err(),
        SlotError::SlotOccupied
    );
    assert_eq!(
        g.place(Arc::new(task(B)), 0, 3, 0).unwrap_err(),
        SlotError::InvalidSlotPosition
    );
}

#[test]
fn test_place_is_idempotent() {
    let once = grid(&[]).place(Arc::new(task(A)), 3, 10, 3).unwrap();
    let twice = once.place(Arc::new(task(A)), 3, 10, 3).unwrap();

    let positions = |g: &SlotGrid| {
        g.tasks()
            .into_iter()
            .map(|(t, p)| (t.id, p))
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(&once), positions(&twice));
}

#[test]
fn test_place_clamps_at_end_of_day() {
    let g = grid(&[]).place(Arc::new(task(A)), 0, 94, 5).unwrap();
    let (_, pos) = g.find_task_by_id(A).unwrap();
    assert_eq!((pos.start_slot, pos.end_slot), (94, SLOTS_PER_DAY));
}

#[test]
fn test_tasks_are_listed_once_in_scan_order() {
    let g = grid(&["--BB-AA-", "CCC-----"]);
    let ids: Vec<i64> = g.tasks().into_iter().map(|(t, _)| t.id).collect();
    assert_eq!(ids, vec![B, A, C]);
    assert_eq!(g.tasks_on_day(0).len(), 2);
    assert!(g.tasks_on_day(99).is_empty());
}

// ---------------------------
// Same-day moves
// ---------------------------

#[test]
fn test_move_down_swaps_with_adjacent_task() {
    let g = grid(&["AABB----"]);
    let next = g.move_down(A).unwrap();
    assert_eq!(pattern(&next, 0, 8), "BBAA----");
    // receiver untouched
    assert_eq!(pattern(&g, 0, 8), "AABB----");
}

#[test]
fn test_move_down_steps_into_gap() {
    let g = grid_from(&["AA--BB--"], 2, before_window());
    let next = g.move_down(A).unwrap();
    assert_eq!(pattern(&next, 0, 8), "--AABB--");
}

#[test]
fn test_move_down_step_is_clamped_to_gap() {
    let g = grid(&["AA-BB---"]);
    let next = g.move_down(A).unwrap();
    assert_eq!(pattern(&next, 0, 8), "-AABB---");
}

#[test]
fn test_move_down_at_end_of_day_is_noop() {
    let g = grid(&[]).place(Arc::new(task(A)), 0, 94, 2).unwrap();
    assert!(g.move_down(A).unwrap().ptr_eq(&g));
}

#[test]
fn test_move_up_swaps_uneven_tasks() {
    let g = grid(&["AABBB---"]);
    let next = g.move_up(B).unwrap();
    assert_eq!(pattern(&next, 0, 8), "BBBAA---");
}

#[test]
fn test_move_up_steps_by_display_size() {
    let g = grid(&["------AA"]);
    let next = g.move_up(A).unwrap();
    assert_eq!(pattern(&next, 0, 8), "--AA----");
    let top = next.move_up(A).unwrap();
    assert_eq!(pattern(&top, 0, 8), "AA------");
    assert!(top.move_up(A).unwrap().ptr_eq(&top));
}

#[test]
fn test_move_up_never_swaps_with_started_task() {
    // now = 00:20 on day 0: slots 0 and 1 are past
    let g = grid_from(&["AABB----"], 4, at(0, 0, 20));
    assert!(g.move_up(B).unwrap().ptr_eq(&g));
}

#[test]
fn test_move_up_stops_at_first_open_slot() {
    let g = grid_from(&["------BB"], 8, at(0, 0, 20));
    let next = g.move_up(B).unwrap();
    assert_eq!(pattern(&next, 0, 8), "--BB----");
}

// ---------------------------
// Cross-day moves
// ---------------------------

#[test]
fn test_move_right_to_empty_day() {
    let g = grid(&["AA------", "--------"]);
    let next = g.move_right(A).unwrap();
    assert_eq!(pattern(&next, 0, 8), "--------");
    assert_eq!(pattern(&next, 1, 8), "AA------");
}

#[test]
fn test_move_right_compacts_source_day() {
    let g = grid(&["AABB----"]);
    let next = g.move_right(A).unwrap();
    assert_eq!(pattern(&next, 0, 8), "BB------");
    assert_eq!(pattern(&next, 1, 8), "AA------");
}

#[test]
fn test_move_right_inside_task_inserts_after_it() {
    let g = grid(&["--AA----", "-BBB----"]);
    let next = g.move_right(A).unwrap();
    assert_eq!(pattern(&next, 1, 8), "-BBBAA--");
}

#[test]
fn test_move_right_at_task_start_pushes_it_down() {
    let g = grid(&["--AA----", "--BB----"]);
    let next = g.move_right(A).unwrap();
    assert_eq!(pattern(&next, 1, 8), "--AABB--");
    assert_runs_are_contiguous(&next);
}

#[test]
fn test_move_right_that_would_overflow_is_noop() {
    let g = grid(&["AA------"])
        .place(Arc::new(task(B)), 1, SLOTS_PER_DAY - 1, 1)
        .unwrap();
    assert!(g.move_right(A).unwrap().ptr_eq(&g));
}

#[test]
fn test_move_left_on_first_day_and_right_on_last_day_are_noops() {
    let g = grid(&["AA------"]);
    assert!(g.move_left(A).unwrap().ptr_eq(&g));

    let last = grid(&[]).place(Arc::new(task(A)), 20, 0, 2).unwrap();
    assert!(last.move_right(A).unwrap().ptr_eq(&last));
}

#[test]
fn test_move_left_into_past_is_noop() {
    // now = day 1, 10:00; the task sits early on day 2
    let g = grid_from(&["", "", "AA------"], 4, at(1, 10, 0));
    assert!(g.move_left(A).unwrap().ptr_eq(&g));
}

// ---------------------------
// Past-time immutability
// ---------------------------

#[test]
fn test_started_task_cannot_change() {
    let g = grid_from(&["AA------"], 4, at(0, 0, 5));
    assert_eq!(g.move_down(A).unwrap_err(), SlotError::TaskAlreadyStarted);
    assert_eq!(g.move_right(A).unwrap_err(), SlotError::TaskAlreadyStarted);
    assert_eq!(g.grow(A).unwrap_err(), SlotError::TaskAlreadyStarted);
    assert_eq!(g.shrink(A).unwrap_err(), SlotError::TaskAlreadyStarted);
    assert_eq!(g.delete(A).unwrap_err(), SlotError::TaskAlreadyStarted);
}

#[test]
fn test_add_space_at_in_past_is_rejected() {
    let g = grid_from(&["------AA"], 4, at(0, 1, 0));
    assert_eq!(
        g.add_space_at(0, 2).unwrap_err(),
        SlotError::TaskAlreadyStarted
    );
}

// ---------------------------
// Resize and spacing
// ---------------------------

#[test]
fn test_grow_into_free_slot() {
    let next = grid(&["AA------"]).grow(A).unwrap();
    assert_eq!(pattern(&next, 0, 8), "AAA-----");
}

#[test]
fn test_grow_pushes_following_tasks() {
    let next = grid(&["AABB-CC-"]).grow(A).unwrap();
    assert_eq!(pattern(&next, 0, 8), "AAABB-CC");
}

#[test]
fn test_grow_at_last_slot_returns_identical_grid() {
    let g = grid(&[]).place(Arc::new(task(A)), 0, 95, 1).unwrap();
    assert!(g.grow(A).unwrap().ptr_eq(&g));
}

#[test]
fn test_grow_is_noop_when_day_is_full_at_the_end() {
    let g = grid(&["AABB----"])
        .place(Arc::new(task(C)), 0, SLOTS_PER_DAY - 1, 1)
        .unwrap();
    assert!(g.grow(A).unwrap().ptr_eq(&g));
}

#[test]
fn test_shrink() {
    let g = grid(&["AAA-----"]);
    assert_eq!(pattern(&g.shrink(A).unwrap(), 0, 8), "AA------");

    let single = grid(&["A-------"]);
    assert_eq!(
        single.shrink(A).unwrap_err(),
        SlotError::MinimumSlotsDuration
    );
    assert_eq!(pattern(&single, 0, 8), "A-------");
}

#[test]
fn test_add_space_after_task() {
    let g = grid(&["AABB----"]);
    assert_eq!(pattern(&g.add_space(A).unwrap(), 0, 8), "AA-BB---");

    let alone = grid(&["AA------"]);
    assert!(alone.add_space(A).unwrap().ptr_eq(&alone));
}

#[test]
fn test_add_space_at_snaps_to_task_start() {
    let g = grid(&["AABBB---"]);
    let next = g.add_space_at(0, 3).unwrap();
    assert_eq!(pattern(&next, 0, 8), "AA-BBB--");
    assert_runs_are_contiguous(&next);
}

#[test]
fn test_remove_space_at() {
    let g = grid(&["AA-BB---"]);
    assert_eq!(pattern(&g.remove_space_at(0, 2).unwrap(), 0, 8), "AABB----");
    assert_eq!(
        g.remove_space_at(0, 0).unwrap_err(),
        SlotError::NoGapToRemove
    );
    assert_eq!(
        g.remove_space_at(0, 6).unwrap_err(),
        SlotError::NoGapToRemove
    );
    assert_eq!(
        g.remove_space_at(0, SLOTS_PER_DAY).unwrap_err(),
        SlotError::InvalidSlotPosition
    );
}

#[test]
fn test_delete_closes_the_hole() {
    let g = grid(&["AABBCC--"]);
    let next = g.delete(B).unwrap();
    assert_eq!(pattern(&next, 0, 8), "AACC----");
    assert!(next.find_task_by_id(B).is_none());
    assert_eq!(g.delete(letter_id('Z')).unwrap_err(), SlotError::TaskNotFound);
}

// ---------------------------
// Properties
// ---------------------------

#[test]
fn test_operation_chain_keeps_runs_contiguous_and_receivers_intact() {
    let start = grid(&["AAB-CC--", "--------", "--------"]);
    let start = start.delete(B).unwrap();
    let snapshot: Vec<String> = (0..3).map(|d| pattern(&start, d, 8)).collect();

    let g = start
        .grow(A)
        .and_then(|g| g.move_down(A))
        .and_then(|g| g.move_right(C))
        .and_then(|g| g.add_space_at(1, 0))
        .and_then(|g| g.move_left(A))
        .unwrap();

    assert_eq!(pattern(&g, 0, 8), "AAA-----");
    assert_eq!(pattern(&g, 1, 8), "-CC-----");
    assert_runs_are_contiguous(&g);
    let after: Vec<String> = (0..3).map(|d| pattern(&start, d, 8)).collect();
    assert_eq!(snapshot, after);
}
