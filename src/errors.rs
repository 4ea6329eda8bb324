//! Unified application error types.
//! The grid and session core return `SlotError`; everything around it
//! (db, config, cli, utils) returns `AppError`, which wraps `SlotError`.

use std::io;
use thiserror::Error;

/// Errors raised by the slot grid and the editing session.
///
/// Boundary conditions (moving past an edge, growing at the end of a day, a
/// move that would overflow) are no-ops and never surface here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    // ---------------------------
    // Structural
    // ---------------------------
    #[error("invalid slot position")]
    InvalidSlotPosition,

    #[error("slot is occupied by another task")]
    SlotOccupied,

    // ---------------------------
    // Domain
    // ---------------------------
    #[error("task has already started and cannot be modified")]
    TaskAlreadyStarted,

    #[error("task must keep at least one slot")]
    MinimumSlotsDuration,

    #[error("no gap to remove at this slot")]
    NoGapToRemove,

    #[error("task not found in grid")]
    TaskNotFound,

    // ---------------------------
    // Session protocol
    // ---------------------------
    #[error("not in edit mode")]
    NotInEditMode,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("no move in progress")]
    NotMoving,

    #[error("a move is already in progress")]
    AlreadyMoving,
}

pub type SlotResult<T> = Result<T, SlotError>;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid edit operation: {0}")]
    InvalidOperation(String),

    // ---------------------------
    // Planning errors
    // ---------------------------
    #[error("Task {0} not found")]
    TaskNotFound(i64),

    #[error("Tasks overlap on {0}")]
    Overlap(String),

    #[error("Grid error: {0}")]
    Slot(#[from] SlotError),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
