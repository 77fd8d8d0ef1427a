//! A two-wheeled mobile robot driven toward a wall.
//!
//! The robot is a rectangular chassis on two motorized wheels, driving
//! along the ground of an [`Arena`] with walls and raised steps. Its motion
//! can be computed at three [`Fidelity`] levels that share one fixed-step
//! driver contract from [`cadence_core`]:
//!
//! - [`ClosedForm`]: analytic kinematics evaluated at the elapsed time
//! - [`ExplicitEuler`]: one kinematic update per fixed step, stopping at walls
//! - [`EngineBacked`]: an opaque [`RigidBodyStepper`] such as the `rapier2d`
//!   backed [`DriveWorld`], the only one with suspension and steps
//!
//! A forward-looking [`Sensor`] measures the distance to the nearest wall, and
//! an optional [`ControlLoop`] turns that distance into a wheel speed on its
//! own period. [`runner::run`] steps a [`Wmr`] headlessly and records a
//! [`runner::Sample`] per step.

mod arena;
mod closed_form;
mod config;
mod control;
mod engine;
mod error;
mod euler;
pub mod geometry;
mod kinematics;
mod pose;
mod robot;
pub mod runner;
mod sensor;
mod wmr;
mod world;

pub use arena::{Arena, Step, Wall};
pub use closed_form::ClosedForm;
pub use config::{ControlConfig, EngineConfig, SensorConfig, SuspensionConfig, WmrConfig};
pub use control::{ControlLoop, Gains};
pub use engine::{EngineBacked, RigidBodyStepper};
pub use error::ConfigError;
pub use euler::ExplicitEuler;
pub use kinematics::{WheelRates, WheelState};
pub use pose::{BodyId, BodyPose, Layout};
pub use robot::Robot;
pub use sensor::{Reading, Sensor, Target};
pub use wmr::{Fidelity, ParseFidelityError, Wmr};
pub use world::DriveWorld;
