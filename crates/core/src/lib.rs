//! Core traits and types for cadence simulations.
//!
//! This crate holds the fixed-timestep discipline shared by every cadence
//! component:
//!
//! - [`TimeIncrement`]: a strictly positive, unit-safe step size
//! - [`FixedClock`]: converts variable frame deltas into whole fixed steps
//! - [`Stepper`] and [`Driver`]: one fixed-size state update per drained step
//! - [`Periodic`]: a schedule that fires on its own period of logical time
//! - [`Observer`]: receives events and optionally returns control actions
//! - [`StepIntegrable`]: types that advance by `derivative * delta`

mod clock;
mod driver;
mod observer;
mod periodic;
mod step;
mod time_increment;

pub use clock::FixedClock;
pub use driver::{Driver, Stepper};
pub use observer::Observer;
pub use periodic::Periodic;
pub use step::{DerivativeOf, StepIntegrable};
pub use time_increment::{TimeIncrement, TimeIncrementError, seconds, whole_steps};
