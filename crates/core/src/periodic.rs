use uom::si::{f64::Time, time::second};

use crate::TimeIncrement;

/// A schedule that comes due every `period` of logical time.
///
/// Polling is decoupled from stepping: a host checks the schedule once per
/// frame, and at most one firing is reported per poll. When a frame spans
/// several periods the schedule falls behind and catches up on later polls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Periodic {
    period: TimeIncrement,
    first_due: Time,
    next_due: Time,
}

impl Periodic {
    /// Creates a schedule whose first firing is at `first_due`.
    #[must_use]
    pub fn new(period: TimeIncrement, first_due: Time) -> Self {
        Self {
            period,
            first_due,
            next_due: first_due,
        }
    }

    /// Creates a schedule that fires on the first poll.
    #[must_use]
    pub fn starting_now(period: TimeIncrement) -> Self {
        Self::new(period, Time::new::<second>(0.0))
    }

    /// Returns `true` and moves the due time forward by one period if `now`
    /// has reached it.
    pub fn poll(&mut self, now: Time) -> bool {
        if now >= self.next_due {
            self.next_due = self.next_due + self.period;
            true
        } else {
            false
        }
    }

    /// Restores the first due time.
    pub fn reset(&mut self) {
        self.next_due = self.first_due;
    }

    #[must_use]
    pub fn period(&self) -> TimeIncrement {
        self.period
    }

    #[must_use]
    pub fn next_due(&self) -> Time {
        self.next_due
    }
}
