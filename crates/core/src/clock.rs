use tracing::warn;
use uom::si::{f64::Time, time::second};

use crate::TimeIncrement;

/// Converts variable-size frame deltas into whole fixed-size steps.
///
/// A `FixedClock` owns the two pieces of time bookkeeping every fixed-step
/// loop needs:
///
/// - the **accumulator**, wall-clock time received but not yet converted into
///   a step, and
/// - the **logical time**, which only ever grows in whole multiples of the
///   fixed step.
///
/// After every [`drain`](Self::drain) the accumulator is in `[0, fixed_step)`.
/// The remainder is carried into the next frame rather than interpolated.
///
/// ```
/// use cadence_core::{FixedClock, TimeIncrement};
/// use uom::si::{f64::Time, time::second};
///
/// let mut clock = FixedClock::new(TimeIncrement::from_seconds(0.1).unwrap());
/// let steps = clock.advance(Time::new::<second>(0.35), |_dt| {});
///
/// assert_eq!(steps, 3);
/// assert!((clock.accumulator_seconds() - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    fixed_step: TimeIncrement,
    logical_time: Time,
    accumulator: Time,
}

impl FixedClock {
    /// Creates a clock at logical time zero with an empty accumulator.
    #[must_use]
    pub fn new(fixed_step: TimeIncrement) -> Self {
        Self {
            fixed_step,
            logical_time: zero(),
            accumulator: zero(),
        }
    }

    /// Adds a frame delta to the accumulator without stepping.
    ///
    /// Frame sources are expected to be monotonic. A negative or NaN delta is
    /// ignored with a warning instead of draining time out of the
    /// accumulator.
    pub fn accumulate(&mut self, delta: Time) {
        let delta_s = delta.get::<second>();
        if delta_s.is_nan() || delta_s < 0.0 {
            warn!(delta_s, "ignoring non-monotonic frame delta");
            return;
        }
        self.accumulator += delta;
    }

    /// Converts as much accumulated time as possible into fixed steps.
    ///
    /// Calls `step` once per fixed step, in increasing logical time, before
    /// that step's time is moved from the accumulator to the logical clock.
    /// Returns the number of steps taken.
    pub fn drain<F>(&mut self, mut step: F) -> usize
    where
        F: FnMut(TimeIncrement),
    {
        let dt = *self.fixed_step;
        let mut steps = 0;

        while self.accumulator >= dt {
            step(self.fixed_step);
            self.accumulator -= dt;
            self.logical_time += dt;
            steps += 1;
        }

        steps
    }

    /// Accumulates `delta` and then drains, see [`drain`](Self::drain).
    pub fn advance<F>(&mut self, delta: Time, step: F) -> usize
    where
        F: FnMut(TimeIncrement),
    {
        self.accumulate(delta);
        self.drain(step)
    }

    /// Clears the accumulator and rewinds logical time to zero.
    pub fn reset(&mut self) {
        self.logical_time = zero();
        self.accumulator = zero();
    }

    /// Discards any partial progress toward the next step.
    pub fn clear_accumulator(&mut self) {
        self.accumulator = zero();
    }

    #[must_use]
    pub fn fixed_step(&self) -> TimeIncrement {
        self.fixed_step
    }

    #[must_use]
    pub fn logical_time(&self) -> Time {
        self.logical_time
    }

    #[must_use]
    pub fn accumulator(&self) -> Time {
        self.accumulator
    }

    /// Returns the logical time in seconds.
    #[must_use]
    pub fn logical_seconds(&self) -> f64 {
        self.logical_time.get::<second>()
    }

    /// Returns the accumulator in seconds.
    #[must_use]
    pub fn accumulator_seconds(&self) -> f64 {
        self.accumulator.get::<second>()
    }
}

fn zero() -> Time {
    Time::new::<second>(0.0)
}
