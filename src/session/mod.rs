//! Editing session over the slot grid.
//!
//! # Responsibility
//! - Hold the saved grid and, while editing, a working grid.
//! - Record undoable steps and the days they touched.
//! - Run multi-step moves that confirm or cancel as one unit.
//!
//! # Invariants
//! - The saved grid only changes on commit/save.
//! - Failed operations leave no trace in history.

pub mod history;
pub mod manager;
pub mod move_session;
pub mod repository;

pub use history::{DEFAULT_UNDO_LIMIT, History, HistoryEntry};
pub use manager::SessionManager;
pub use move_session::MoveSessionState;
pub use repository::{TaskRepository, TaskTimeUpdate};
