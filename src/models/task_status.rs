use serde::{Deserialize, Serialize};

/// Lifecycle of a planned task. Only `Scheduled` tasks are placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Scheduled,
    Cancelled,
    Postponed,
}

impl TaskStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Postponed => "postponed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(TaskStatus::Scheduled),
            "cancelled" => Some(TaskStatus::Cancelled),
            "postponed" => Some(TaskStatus::Postponed),
            _ => None,
        }
    }

    /// Helper: convert input from CLI (case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        TaskStatus::from_db_str(&code.trim().to_lowercase())
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, TaskStatus::Scheduled)
    }
}
