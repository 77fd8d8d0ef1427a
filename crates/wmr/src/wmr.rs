use std::{fmt, str::FromStr};

use cadence_core::{Driver, TimeIncrement, seconds};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uom::si::{f64::Time, time::second};

use crate::{
    ClosedForm, ConfigError, ControlLoop, DriveWorld, EngineBacked, ExplicitEuler, Layout,
    Reading, Sensor, WmrConfig, engine::RigidBodyStepper,
};

/// How the robot's motion is computed. Chosen once, at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fidelity {
    /// Analytic kinematics evaluated at the elapsed time.
    ClosedForm,
    /// Fixed-step explicit-Euler kinematics with a wall guard.
    Numerical,
    /// Fixed-step rigid-body dynamics.
    Engine,
}

impl Fidelity {
    pub const ALL: [Fidelity; 3] = [Fidelity::ClosedForm, Fidelity::Numerical, Fidelity::Engine];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Fidelity::ClosedForm => "closed-form",
            Fidelity::Numerical => "numerical",
            Fidelity::Engine => "engine",
        }
    }
}

impl fmt::Display for Fidelity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`Fidelity`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fidelity `{0}`, expected closed-form, numerical or engine")]
pub struct ParseFidelityError(String);

impl FromStr for Fidelity {
    type Err = ParseFidelityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fidelity::ALL
            .into_iter()
            .find(|fidelity| fidelity.as_str() == s)
            .ok_or_else(|| ParseFidelityError(s.to_owned()))
    }
}

#[derive(Debug)]
enum Variant {
    ClosedForm { model: ClosedForm, elapsed: Time },
    Numerical(Driver<ExplicitEuler>),
    Engine(Driver<EngineBacked<Box<dyn RigidBodyStepper>>>),
}

impl Variant {
    fn pose(&self) -> Layout {
        match self {
            Variant::ClosedForm { model, .. } => model.layout(),
            Variant::Numerical(driver) => driver.pose(),
            Variant::Engine(driver) => driver.pose(),
        }
    }
}

/// A wheeled mobile robot in an arena, advanced by frame deltas.
///
/// `advance` feeds a frame delta to the chosen [`Fidelity`], refreshes the
/// distance sensor from the resulting chassis pose, and then gives the
/// controller (if configured) a chance to issue a new speed command.
///
/// ```
/// use cadence_wmr::{Fidelity, Wmr, WmrConfig};
/// use uom::si::{f64::Time, time::second};
///
/// let mut wmr = Wmr::new(WmrConfig::default(), Fidelity::Numerical).unwrap();
///
/// let steps = wmr.advance(Time::new::<second>(0.035));
///
/// assert_eq!(steps, 3);
/// assert!(wmr.location() > 3.0);
/// ```
#[derive(Debug)]
pub struct Wmr {
    config: WmrConfig,
    fidelity: Fidelity,
    fixed_step: TimeIncrement,
    variant: Variant,
    sensor: Sensor,
    reading: Reading,
    control: Option<ControlLoop>,
}

impl Wmr {
    /// Creates a robot at the chosen fidelity. Engine fidelity uses the
    /// built-in [`DriveWorld`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: WmrConfig, fidelity: Fidelity) -> Result<Self, ConfigError> {
        config.validate()?;
        let robot = config.robot()?;
        let fixed_step = config.step()?;

        let variant = match fidelity {
            Fidelity::ClosedForm => Variant::ClosedForm {
                model: ClosedForm::new(robot, config.initial_position, config.angular_velocity),
                elapsed: Time::new::<second>(0.0),
            },
            Fidelity::Numerical => Variant::Numerical(Driver::new(
                ExplicitEuler::new(
                    robot,
                    config.arena.clone(),
                    config.initial_position,
                    config.angular_velocity,
                ),
                fixed_step,
            )),
            Fidelity::Engine => {
                let world = DriveWorld::from_config(&config)?;
                Variant::Engine(Self::engine_driver(&config, Box::new(world), fixed_step))
            }
        };

        Self::assemble(config, fidelity, fixed_step, variant)
    }

    /// Creates an engine-fidelity robot stepped by a caller-supplied world.
    ///
    /// The world's current poses become the reset snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_engine(
        config: WmrConfig,
        world: Box<dyn RigidBodyStepper>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let fixed_step = config.step()?;
        let variant = Variant::Engine(Self::engine_driver(&config, world, fixed_step));
        Self::assemble(config, Fidelity::Engine, fixed_step, variant)
    }

    fn engine_driver(
        config: &WmrConfig,
        world: Box<dyn RigidBodyStepper>,
        fixed_step: TimeIncrement,
    ) -> Driver<EngineBacked<Box<dyn RigidBodyStepper>>> {
        let engine = EngineBacked::new(
            world,
            config.engine.velocity_iterations,
            config.engine.position_iterations,
            config.angular_velocity,
        );
        Driver::new(engine, fixed_step)
    }

    fn assemble(
        config: WmrConfig,
        fidelity: Fidelity,
        fixed_step: TimeIncrement,
        variant: Variant,
    ) -> Result<Self, ConfigError> {
        let control = config.control.as_ref().map(ControlLoop::new).transpose()?;
        let sensor = Sensor::new(&config.sensor);
        let reading = sensor.read(&variant.pose().chassis, &config.arena);

        Ok(Self {
            config,
            fidelity,
            fixed_step,
            variant,
            sensor,
            reading,
            control,
        })
    }

    /// Consumes a frame delta and returns the number of fixed steps taken.
    ///
    /// Closed-form fidelity takes no steps; it evaluates the pose at the new
    /// elapsed time directly.
    pub fn advance(&mut self, frame_delta: Time) -> usize {
        let steps = match &mut self.variant {
            Variant::ClosedForm { model, elapsed } => {
                let delta_s = seconds(frame_delta);
                if delta_s >= 0.0 {
                    *elapsed += frame_delta;
                } else {
                    warn!(delta_s, "ignoring non-monotonic frame delta");
                }
                model.evaluate(seconds(*elapsed));
                0
            }
            Variant::Numerical(driver) => driver.advance(frame_delta),
            Variant::Engine(driver) => driver.advance(frame_delta),
        };

        self.update_sensor();

        let now = self.logical_time();
        let distance = self.reading.distance;
        if let Some(speed) = self.control.as_mut().and_then(|c| c.poll(now, distance)) {
            self.set_angular_velocity(speed);
        }

        steps
    }

    /// Commands a wheel angular velocity, positive toward `+x`.
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        match &mut self.variant {
            Variant::ClosedForm { model, .. } => model.set_angular_velocity(angular_velocity),
            Variant::Numerical(driver) => driver.stepper_mut().set_angular_velocity(angular_velocity),
            Variant::Engine(driver) => driver.stepper_mut().set_angular_velocity(angular_velocity),
        }
    }

    /// Restores the state captured at construction.
    pub fn reset(&mut self) {
        match &mut self.variant {
            Variant::ClosedForm { model, elapsed } => {
                model.reset();
                *elapsed = Time::new::<second>(0.0);
            }
            Variant::Numerical(driver) => driver.reset(),
            Variant::Engine(driver) => driver.reset(),
        }
        if let Some(control) = &mut self.control {
            control.reset();
        }
        self.update_sensor();
        debug!(fidelity = %self.fidelity, "robot reset");
    }

    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        match &self.variant {
            Variant::ClosedForm { model, .. } => model.angular_velocity(),
            Variant::Numerical(driver) => driver.stepper().angular_velocity(),
            Variant::Engine(driver) => driver.stepper().angular_velocity(),
        }
    }

    /// Logical time: whole fixed steps taken, or elapsed time at closed-form
    /// fidelity.
    #[must_use]
    pub fn logical_time(&self) -> Time {
        match &self.variant {
            Variant::ClosedForm { elapsed, .. } => *elapsed,
            Variant::Numerical(driver) => driver.logical_time(),
            Variant::Engine(driver) => driver.logical_time(),
        }
    }

    #[must_use]
    pub fn logical_seconds(&self) -> f64 {
        seconds(self.logical_time())
    }

    /// Time received but not yet stepped. Always zero at closed-form
    /// fidelity.
    #[must_use]
    pub fn accumulator(&self) -> Time {
        match &self.variant {
            Variant::ClosedForm { .. } => Time::new::<second>(0.0),
            Variant::Numerical(driver) => driver.accumulator(),
            Variant::Engine(driver) => driver.accumulator(),
        }
    }

    /// Poses as of the last completed step.
    #[must_use]
    pub fn pose(&self) -> Layout {
        self.variant.pose()
    }

    /// Chassis center along the ground.
    #[must_use]
    pub fn location(&self) -> f64 {
        self.pose().location()
    }

    /// Whether the front wheel is against a wall.
    #[must_use]
    pub fn in_contact(&self) -> bool {
        match &self.variant {
            Variant::ClosedForm { .. } => false,
            Variant::Numerical(driver) => driver.stepper().blocked(),
            Variant::Engine(driver) => driver.stepper().in_contact(),
        }
    }

    #[must_use]
    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    #[must_use]
    pub fn sensor_distance(&self) -> f64 {
        self.reading.distance
    }

    #[must_use]
    pub fn fidelity(&self) -> Fidelity {
        self.fidelity
    }

    #[must_use]
    pub fn fixed_step(&self) -> TimeIncrement {
        self.fixed_step
    }

    #[must_use]
    pub fn config(&self) -> &WmrConfig {
        &self.config
    }

    fn update_sensor(&mut self) {
        let chassis = self.pose().chassis;
        self.reading = self.sensor.read(&chassis, &self.config.arena);
    }
}
