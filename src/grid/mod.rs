//! Slot-grid scheduling engine.
//!
//! # Responsibility
//! - Describe the fixed 15-minute geometry of the planning window.
//! - Place, move and resize tasks on an immutable grid.
//!
//! # Invariants
//! - Grids are never mutated once built; every change yields a new grid.
//! - Past positions (relative to the injected clock) are never modified.

pub mod config;
pub mod slot_grid;

pub use config::{
    Clock, FixedClock, GridConfig, SystemClock, DEFAULT_DISPLAY_SLOT_SIZE, DEFAULT_NUM_DAYS,
    SLOTS_PER_DAY, SLOT_MINUTES,
};
pub use slot_grid::{SlotGrid, TaskPosition};
