/// ANSI color helper utilities for terminal output.
use crate::models::category::Category;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Deep work in blue, shallow work in cyan.
pub fn color_for_category(category: Category) -> &'static str {
    match category {
        Category::Deep => BLUE,
        Category::Shallow => CYAN,
    }
}

/// Greys out cells that can no longer change.
pub fn colorize_cell(value: &str, category: Option<Category>, past: bool) -> String {
    if past {
        return format!("{GREY}{value}{RESET}");
    }
    match category {
        Some(c) => format!("{}{value}{RESET}", color_for_category(c)),
        None => value.to_string(),
    }
}
