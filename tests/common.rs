#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rtimeblock::grid::{FixedClock, GridConfig, SlotGrid};
use rtimeblock::models::category::Category;
use rtimeblock::models::task::{Task, TaskId};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub fn rtb() -> Command {
    cargo_bin_cmd!("rtimeblock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimeblock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Monday 2025-10-06: day 0 of every fixture window.
pub fn first_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
}

pub fn date(day: i64) -> NaiveDate {
    first_date() + chrono::Duration::days(day)
}

pub fn at(day: i64, h: u32, m: u32) -> NaiveDateTime {
    date(day).and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// A clock the day before the window: nothing is past.
pub fn before_window() -> NaiveDateTime {
    at(-1, 12, 0)
}

pub fn config(display_slot_size: usize, now: NaiveDateTime) -> GridConfig {
    GridConfig::new(first_date())
        .with_display_slot_size(display_slot_size)
        .with_clock(Arc::new(FixedClock(now)))
}

/// `'A'` → 1, `'B'` → 2, ...
pub fn letter_id(c: char) -> TaskId {
    (c as u8 - b'A') as TaskId + 1
}

pub fn id_letter(id: TaskId) -> char {
    (b'A' + (id - 1) as u8) as char
}

pub fn task(id: TaskId) -> Task {
    Task::new(
        id,
        format!("task {}", id_letter(id)),
        Category::Deep,
        first_date(),
        hm(0, 0),
        hm(0, 15),
    )
}

/// Builds a grid from one pattern per day, read from slot 0: `-` is an empty
/// slot, a capital letter a slot of that task.
pub fn grid_from(days: &[&str], display_slot_size: usize, now: NaiveDateTime) -> SlotGrid {
    let mut grid = SlotGrid::new(config(display_slot_size, now));
    for (day, pattern) in days.iter().enumerate() {
        let chars: Vec<char> = pattern.chars().collect();
        let mut slot = 0;
        while slot < chars.len() {
            let c = chars[slot];
            if c == '-' {
                slot += 1;
                continue;
            }
            let len = chars[slot..].iter().take_while(|x| **x == c).count();
            grid = grid
                .place(Arc::new(task(letter_id(c))), day, slot, len)
                .unwrap();
            slot += len;
        }
    }
    grid
}

/// First `len` slots of `day`, in the same notation as `grid_from`.
pub fn pattern(grid: &SlotGrid, day: usize, len: usize) -> String {
    (0..len)
        .map(|slot| grid.task_at(day, slot).map_or('-', |t| id_letter(t.id)))
        .collect()
}
