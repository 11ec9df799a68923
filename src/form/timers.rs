// src/form/timers.rs

//! Deadlines driven by the controller's `tick`. Nothing here spawns threads;
//! the host loop calls `tick` and whatever is due fires inline.

use chrono::{Duration, NaiveDateTime};

/// Single pending deadline, pushed back by every `schedule`.
#[derive(Clone, Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<NaiveDateTime>,
}

impl Debounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::milliseconds(i64::try_from(delay_ms).unwrap_or(i64::MAX / 2)),
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: NaiveDateTime) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<NaiveDateTime> {
        self.deadline
    }

    /// True once per scheduled deadline, when `now` has reached it.
    pub fn take_due(&mut self, now: NaiveDateTime) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Fixed-period deadline. Missed periods collapse into one firing.
#[derive(Clone, Debug)]
pub struct Repeating {
    period: Duration,
    next: Option<NaiveDateTime>,
}

impl Repeating {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period: Duration::milliseconds(i64::try_from(period_ms.max(1)).unwrap_or(1_000)),
            next: None,
        }
    }

    pub fn start(&mut self, now: NaiveDateTime) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn take_due(&mut self, now: NaiveDateTime) -> bool {
        match self.next {
            Some(n) if now >= n => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

// ======================================================
// Unit Tests
// ======================================================
