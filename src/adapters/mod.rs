//! Bridges between task records and grid coordinates.
//!
//! # Responsibility
//! - Build a grid from persisted task records.
//! - Turn the difference between two grids into updated task records.
//! - Convert flat day indexes to (week, weekday) pairs for views.
//!
//! # Invariants
//! - Adapters are pure: no I/O, no clock reads.

pub mod coords;
pub mod diff;
pub mod load;

pub use coords::{DAYS_PER_WEEK, NUM_WEEKS, day_index_to_week_day, week_day_to_day_index};
pub use diff::{diff_grids, removed_task_ids, task_at_position};
pub use load::load_grid;
