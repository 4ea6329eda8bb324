//! Time utilities: parsing HH:MM and clock overrides.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, NaiveTime};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

pub fn parse_time_arg(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

/// "YYYY-MM-DD HH:MM", as accepted by the hidden `--now` flag.
pub fn parse_datetime(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
        .map_err(|_| AppError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_times_and_datetimes() {
        assert_eq!(parse_time("09:15"), NaiveTime::from_hms_opt(9, 15, 0));
        assert!(parse_time("9h15").is_none());
        assert!(matches!(parse_time_arg("25:00"), Err(AppError::InvalidTime(_))));
        assert!(parse_datetime("2025-10-13 08:30").is_ok());
    }
}
