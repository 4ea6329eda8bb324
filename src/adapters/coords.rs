//! Flat day index ⇄ (week, weekday) for the 3-week window.

pub const DAYS_PER_WEEK: usize = 7;
pub const NUM_WEEKS: usize = 3;

/// `day` → `(week, weekday)`, both 0-based relative to the window start.
pub fn day_index_to_week_day(day: usize) -> (usize, usize) {
    (day / DAYS_PER_WEEK, day % DAYS_PER_WEEK)
}

/// `(week, weekday)` → flat day index.
pub fn week_day_to_day_index(week: usize, weekday: usize) -> usize {
    week * DAYS_PER_WEEK + weekday
}
