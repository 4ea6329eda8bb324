use serde::{Deserialize, Serialize};

/// Kind of focus a time block asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Deep,
    Shallow,
}

impl Category {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Category::Deep => "deep",
            Category::Shallow => "shallow",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "deep" => Some(Category::Deep),
            "shallow" => Some(Category::Shallow),
            _ => None,
        }
    }

    /// Helper: convert input code from CLI (`d`, `deep`, `S`, ...)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "d" | "deep" => Some(Category::Deep),
            "s" | "shallow" => Some(Category::Shallow),
            _ => None,
        }
    }

    /// Single-letter marker used by the grid renderer.
    pub fn marker(&self) -> char {
        match self {
            Category::Deep => 'D',
            Category::Shallow => 'S',
        }
    }
}
