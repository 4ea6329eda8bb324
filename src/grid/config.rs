//! Grid geometry and the injected clock.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::sync::Arc;

/// Minutes covered by one slot.
pub const SLOT_MINUTES: u32 = 15;
/// Slots in one calendar day (24h / 15min).
pub const SLOTS_PER_DAY: usize = 96;
/// Three weeks.
pub const DEFAULT_NUM_DAYS: usize = 21;
/// Slots advanced per visual step when moving into empty space.
pub const DEFAULT_DISPLAY_SLOT_SIZE: usize = 4;

/// Source of "now" for past/future classification.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant (tests, `--now` override).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Immutable geometry shared by every grid built from it.
#[derive(Clone)]
pub struct GridConfig {
    first_date: NaiveDate,
    num_days: usize,
    working_hours_start: NaiveTime,
    working_hours_end: NaiveTime,
    display_slot_size: usize,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for GridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridConfig")
            .field("first_date", &self.first_date)
            .field("num_days", &self.num_days)
            .field("working_hours_start", &self.working_hours_start)
            .field("working_hours_end", &self.working_hours_end)
            .field("display_slot_size", &self.display_slot_size)
            .finish_non_exhaustive()
    }
}

impl GridConfig {
    /// Default 21-day window starting at `first_date`, 09:00-18:00 working
    /// hours, step of 4 slots, system clock.
    pub fn new(first_date: NaiveDate) -> Self {
        Self {
            first_date,
            num_days: DEFAULT_NUM_DAYS,
            working_hours_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            working_hours_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            display_slot_size: DEFAULT_DISPLAY_SLOT_SIZE,
            clock: Arc::new(SystemClock),
        }
    }

    /// At least one day.
    pub fn with_num_days(mut self, num_days: usize) -> Self {
        self.num_days = num_days.max(1);
        self
    }

    /// At least one slot per step.
    pub fn with_display_slot_size(mut self, size: usize) -> Self {
        self.display_slot_size = size.max(1);
        self
    }

    /// Display-only hint; placement never checks it.
    pub fn with_working_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.working_hours_start = start;
        self.working_hours_end = end;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    pub fn num_days(&self) -> usize {
        self.num_days
    }

    pub fn working_hours(&self) -> (NaiveTime, NaiveTime) {
        (self.working_hours_start, self.working_hours_end)
    }

    pub fn display_slot_size(&self) -> usize {
        self.display_slot_size
    }

    pub fn slot_duration_minutes(&self) -> u32 {
        SLOT_MINUTES
    }

    pub fn total_slots(&self) -> usize {
        self.num_days * SLOTS_PER_DAY
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Calendar date of a day index, `None` outside the window.
    pub fn date_for_day(&self, day: usize) -> Option<NaiveDate> {
        if day >= self.num_days {
            return None;
        }
        Some(self.first_date + Duration::days(day as i64))
    }

    /// Day index of a calendar date, `None` outside the window.
    pub fn day_for_date(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.first_date).num_days();
        if offset < 0 || offset >= self.num_days as i64 {
            return None;
        }
        Some(offset as usize)
    }

    /// Signed day offset and slot of "now". The day may fall outside the
    /// window on either side.
    pub fn now_position(&self) -> (i64, usize) {
        let now = self.now();
        let day = (now.date() - self.first_date).num_days();
        (day, slot_floor(now.time()))
    }
}

/// Slot containing `time`.
pub fn slot_floor(time: NaiveTime) -> usize {
    let minutes = time.hour() * 60 + time.minute();
    (minutes / SLOT_MINUTES) as usize
}

/// First slot boundary at or after `time`.
pub fn slot_ceil(time: NaiveTime) -> usize {
    let minutes = time.hour() * 60 + time.minute();
    minutes.div_ceil(SLOT_MINUTES) as usize
}

/// Wall-clock time at which `slot` begins. The end-of-day boundary (slot 96)
/// is not representable as a `NaiveTime` and maps to 23:59.
pub fn slot_start_time(slot: usize) -> NaiveTime {
    if slot >= SLOTS_PER_DAY {
        return NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
    }
    let minutes = slot as u32 * SLOT_MINUTES;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}
