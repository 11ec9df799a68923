// src/clock.rs

//! Injected time source.
//!
//! Everything date-scoped in the engine (identifier counters, date-not-future,
//! debounce deadlines) reads time through [`Clock`] so tests can pin or move
//! the current day.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub trait Clock: Send + Sync + fmt::Debug {
    /// Local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Absolute time for stored timestamps (`_savedAt`, `fechaRegistro`).
    fn now_utc(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.now_utc().timestamp_millis()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock. Local time and UTC coincide (offset zero).
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Midday on the given date.
    pub fn on_date(date: NaiveDate) -> Self {
        Self::new(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }

    pub fn set(&self, now: NaiveDateTime) {
        match self.now.lock() {
            Ok(mut g) => *g = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }

    /// Jump to midday of the following day.
    pub fn next_day(&self) {
        let date = self.today().succ_opt().unwrap_or_else(|| self.today());
        self.set(date.and_hms_opt(12, 0, 0).unwrap_or_default());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.now())
    }
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn manual_clock_advances_and_rolls_days() {
        let clock = ManualClock::on_date(d(2024, 1, 31));
        assert_eq!(clock.today(), d(2024, 1, 31));

        clock.advance_ms(2_000);
        assert_eq!(clock.now().time().to_string(), "12:00:02");

        clock.next_day();
        assert_eq!(clock.today(), d(2024, 2, 1));
    }

    #[test]
    fn manual_clock_utc_matches_local() {
        let clock = ManualClock::on_date(d(2024, 1, 10));
        assert_eq!(clock.now_utc().naive_utc(), clock.now());
        assert_eq!(clock.now_ms() % 1000, 0);
    }
}
