//! One-line user messages: coloured icon, then the text.

use crate::utils::colors::{BLUE, GREEN, RESET, YELLOW};
use std::fmt;

const BOLD: &str = "\x1b[1m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";

fn line(color: &str, icon: &str, msg: impl fmt::Display) -> String {
    format!("{color}{BOLD}{icon} {RESET}{msg}")
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", line(BLUE, ICON_INFO, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", line(GREEN, ICON_OK, msg));
}

/// Goes to stderr so that warnings never pollute `--json` output.
pub fn warning<T: fmt::Display>(msg: T) {
    eprintln!("{}", line(YELLOW, ICON_WARN, msg));
}

