//! Observers that end a run or search early.

use cadence_core::Observer;

use crate::traits::{CanStopEarly, HasObjective, HasSpeed, HasTime};

/// Stops once the speed has stayed within `tolerance` of zero for `hold`
/// consecutive events.
///
/// ```
/// use cadence_observers::Settled;
/// use cadence_wmr::{ControlConfig, Fidelity, Wmr, WmrConfig, runner};
///
/// let config = WmrConfig {
///     control: Some(ControlConfig::default()),
///     ..WmrConfig::default()
/// };
/// let mut wmr = Wmr::new(config, Fidelity::Numerical).unwrap();
/// let run = runner::run(&mut wmr, 60.0, Settled::new(0.05, 10));
///
/// assert_eq!(run.status, runner::Status::StoppedByObserver);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settled {
    tolerance: f64,
    hold: usize,
    count: usize,
}

impl Settled {
    #[must_use]
    pub fn new(tolerance: f64, hold: usize) -> Self {
        Self {
            tolerance,
            hold,
            count: 0,
        }
    }
}

impl<E: HasSpeed, A: CanStopEarly> Observer<E, A> for Settled {
    fn observe(&mut self, event: &E) -> Option<A> {
        if event.speed().abs() < self.tolerance {
            self.count += 1;
        } else {
            self.count = 0;
        }
        (self.count >= self.hold).then(A::stop_early)
    }
}

impl<E: HasSpeed, A: CanStopEarly> Observer<E, A> for &mut Settled {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

/// Stops at the first event at or past `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    end: f64,
}

impl Deadline {
    #[must_use]
    pub fn new(end: f64) -> Self {
        Self { end }
    }
}

impl<E: HasTime, A: CanStopEarly> Observer<E, A> for Deadline {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.time() >= self.end).then(A::stop_early)
    }
}

/// Stops once the objective reaches `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoodEnough {
    target: f64,
}

impl GoodEnough {
    #[must_use]
    pub fn new(target: f64) -> Self {
        Self { target }
    }
}

impl<E: HasObjective, A: CanStopEarly> Observer<E, A> for GoodEnough {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.objective() >= self.target).then(A::stop_early)
    }
}
