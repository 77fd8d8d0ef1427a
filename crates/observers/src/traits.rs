//! Capability traits for observers that work across runs and searches.
//!
//! These traits abstract over crate-specific event and action types, so one
//! observer can watch a headless robot run, an evolutionary search, or a
//! caller's own loop.
//!
//! # Event traits
//!
//! - [`HasTime`]: events positioned along a time-like axis
//! - [`HasSpeed`]: events that carry a commanded speed
//! - [`HasObjective`]: events that carry an objective value
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use cadence_core::Observer;
//! use cadence_observers::traits::{CanStopEarly, HasTime};
//!
//! struct Deadline {
//!     end: f64,
//! }
//!
//! impl<E: HasTime, A: CanStopEarly> Observer<E, A> for Deadline {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.time() >= self.end).then(A::stop_early)
//!     }
//! }
//! ```

use cadence_evolve::Generation;
use cadence_wmr::runner::{self, Sample};

/// An event positioned along a time-like axis.
pub trait HasTime {
    /// Logical seconds for a run, or the generation index for a search.
    fn time(&self) -> f64;
}

/// An event that carries a commanded speed.
pub trait HasSpeed {
    fn speed(&self) -> f64;
}

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    fn objective(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the run or search early.
    fn stop_early() -> Self;
}

// --- runner::Sample ---

impl HasTime for Sample {
    fn time(&self) -> f64 {
        self.time
    }
}

impl HasSpeed for Sample {
    fn speed(&self) -> f64 {
        self.speed
    }
}

// --- evolve::Generation ---

impl HasTime for Generation {
    #[allow(clippy::cast_precision_loss)]
    fn time(&self) -> f64 {
        self.generation as f64
    }
}

impl HasObjective for Generation {
    /// The best objective of the generation.
    fn objective(&self) -> f64 {
        self.statistics.best.objective
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for runner::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for cadence_evolve::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
