use tracing::trace;
use uom::si::f64::Time;

use crate::{FixedClock, TimeIncrement};

/// A state that advances by exactly one fixed step at a time.
///
/// [`Driver`] calls [`step_once`](Self::step_once) once per drained step and
/// [`sync`](Self::sync) once per frame after the drain. Quantities that are
/// cheap to derive from the primary state (secondary body poses, for
/// example) belong in `sync` rather than `step_once`.
pub trait Stepper {
    /// The pose exposed to renderers and observers.
    type Pose;

    /// Advances the state by one fixed step.
    fn step_once(&mut self, dt: TimeIncrement);

    /// Recomputes derived quantities after a frame's steps have run.
    fn sync(&mut self) {}

    /// Returns the pose as of the last completed step.
    fn pose(&self) -> Self::Pose;

    /// Restores the state captured at construction.
    fn reset(&mut self);
}

/// Couples a [`FixedClock`] with a [`Stepper`].
///
/// `advance` accumulates a frame delta, runs as many fixed steps as it
/// allows, and then syncs the stepper once. The leftover accumulator is never
/// interpolated; the pose always reflects the last completed step.
#[derive(Debug, Clone)]
pub struct Driver<S> {
    clock: FixedClock,
    stepper: S,
}

impl<S: Stepper> Driver<S> {
    /// Creates a driver at logical time zero.
    pub fn new(stepper: S, fixed_step: TimeIncrement) -> Self {
        Self {
            clock: FixedClock::new(fixed_step),
            stepper,
        }
    }

    /// Consumes a frame delta and returns the number of steps taken.
    pub fn advance(&mut self, frame_delta: Time) -> usize {
        let stepper = &mut self.stepper;
        let steps = self.clock.advance(frame_delta, |dt| stepper.step_once(dt));
        self.stepper.sync();

        trace!(
            steps,
            logical_time_s = self.clock.logical_seconds(),
            accumulator_s = self.clock.accumulator_seconds(),
            "advanced",
        );

        steps
    }

    /// Rewinds the clock and restores the stepper's initial state.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.stepper.reset();
        self.stepper.sync();
    }

    #[must_use]
    pub fn pose(&self) -> S::Pose {
        self.stepper.pose()
    }

    #[must_use]
    pub fn clock(&self) -> &FixedClock {
        &self.clock
    }

    #[must_use]
    pub fn logical_time(&self) -> Time {
        self.clock.logical_time()
    }

    #[must_use]
    pub fn accumulator(&self) -> Time {
        self.clock.accumulator()
    }

    #[must_use]
    pub fn fixed_step(&self) -> TimeIncrement {
        self.clock.fixed_step()
    }

    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    /// Mutable access to the stepper, for applying control inputs between
    /// frames.
    pub fn stepper_mut(&mut self) -> &mut S {
        &mut self.stepper
    }
}
