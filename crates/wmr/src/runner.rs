//! Headless runs that record one sample per fixed step.
//!
//! A run steps a [`Wmr`] by exactly one fixed step per iteration and emits a
//! [`Sample`] to an [`Observer`] after each one (plus an initial sample before
//! the first step). The observer may return [`Action::StopEarly`] to end the
//! run.
//!
//! # Example
//!
//! ```
//! use cadence_wmr::{Fidelity, Wmr, WmrConfig, runner};
//!
//! let mut wmr = Wmr::new(WmrConfig::default(), Fidelity::Numerical).unwrap();
//! let run = runner::run_unobserved(&mut wmr, 1.0);
//!
//! assert_eq!(run.steps, 101);
//! assert_eq!(run.samples.len(), 102);
//! ```

use cadence_core::{Observer, whole_steps};
use tracing::debug;

use crate::Wmr;

/// The robot's state after one step of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Steps taken so far, zero for the initial sample.
    pub step: usize,
    /// Logical time in seconds.
    pub time: f64,
    /// Sensor distance.
    pub distance: f64,
    /// Commanded wheel angular velocity.
    pub speed: f64,
    /// Whether the front wheel was against a wall.
    pub contact: bool,
    /// Chassis center along the ground.
    pub location: f64,
}

impl Sample {
    fn of(wmr: &Wmr, step: usize) -> Self {
        Self {
            step,
            time: wmr.logical_seconds(),
            distance: wmr.sensor_distance(),
            speed: wmr.angular_velocity(),
            contact: wmr.in_contact(),
            location: wmr.location(),
        }
    }
}

/// Actions an observer can request during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StopEarly,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Complete,
    StoppedByObserver,
}

/// The recorded outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub status: Status,
    pub samples: Vec<Sample>,
    /// Steps actually taken.
    pub steps: usize,
}

impl Run {
    /// The last recorded sample.
    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Whether the robot touched a wall at any point.
    #[must_use]
    pub fn hit_wall(&self) -> bool {
        self.samples.iter().any(|s| s.contact)
    }
}

/// Steps `wmr` for `duration` seconds of logical time.
///
/// Takes `floor(duration / fixed_step) + 1` steps, each by feeding exactly one
/// fixed step to [`Wmr::advance`], so the controller is polled after every
/// step.
pub fn run<O>(wmr: &mut Wmr, duration: f64, mut observer: O) -> Run
where
    O: Observer<Sample, Action>,
{
    let dt = wmr.fixed_step();
    let steps = whole_steps(duration, dt.seconds()) + 1;

    let mut samples = Vec::with_capacity(steps + 1);

    let initial = Sample::of(wmr, 0);
    samples.push(initial);
    if let Some(Action::StopEarly) = observer.observe(&initial) {
        return Run {
            status: Status::StoppedByObserver,
            samples,
            steps: 0,
        };
    }

    for step in 1..=steps {
        wmr.advance(*dt);

        let sample = Sample::of(wmr, step);
        samples.push(sample);

        if let Some(Action::StopEarly) = observer.observe(&sample) {
            debug!(step, "run stopped by observer");
            return Run {
                status: Status::StoppedByObserver,
                samples,
                steps: step,
            };
        }
    }

    debug!(steps, location = wmr.location(), "run complete");

    Run {
        status: Status::Complete,
        samples,
        steps,
    }
}

/// Steps `wmr` for `duration` seconds without observation.
pub fn run_unobserved(wmr: &mut Wmr, duration: f64) -> Run {
    run(wmr, duration, ())
}
