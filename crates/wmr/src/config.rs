use cadence_core::TimeIncrement;
use serde::{Deserialize, Serialize};

use crate::{Arena, ConfigError, Robot};

/// Robot, sensor, controller and arena parameters.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes:
///
/// ```
/// use cadence_wmr::WmrConfig;
///
/// let config: WmrConfig = toml::from_str(
///     r#"
///     wheel_radius = 1.2
///
///     [control]
///     speed_max = 2.0
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.wheel_radius, 1.2);
/// assert_eq!(config.chassis_length, 3.0);
/// assert_eq!(config.control.unwrap().speed_slope, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WmrConfig {
    pub wheel_radius: f64,
    pub chassis_length: f64,
    pub wheel_inward_offset: f64,
    /// Initial chassis center.
    pub initial_position: f64,
    /// Initial wheel angular velocity in rad/s, positive toward `+x`.
    pub angular_velocity: f64,
    /// Fixed simulation step in seconds.
    pub fixed_step: f64,
    pub sensor: SensorConfig,
    /// Wall-avoidance controller. Without it the wheels keep their initial
    /// angular velocity.
    pub control: Option<ControlConfig>,
    pub suspension: SuspensionConfig,
    pub engine: EngineConfig,
    pub arena: Arena,
}

impl Default for WmrConfig {
    fn default() -> Self {
        Self {
            wheel_radius: 1.0,
            chassis_length: 3.0,
            wheel_inward_offset: 0.1,
            initial_position: 3.0,
            angular_velocity: 1.0,
            fixed_step: 0.01,
            sensor: SensorConfig::default(),
            control: None,
            suspension: SuspensionConfig::default(),
            engine: EngineConfig::default(),
            arena: Arena::default(),
        }
    }
}

impl WmrConfig {
    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let robot = self.robot()?;
        self.step()?;

        if !self.initial_position.is_finite() {
            return Err(ConfigError::InitialPosition(self.initial_position));
        }
        if !self.angular_velocity.is_finite() {
            return Err(ConfigError::AngularVelocity(self.angular_velocity));
        }

        self.sensor.validate()?;
        if let Some(control) = &self.control {
            control.validate()?;
        }
        self.suspension.validate()?;
        self.engine.validate()?;
        self.arena.validate()?;

        let rear = robot.rear_edge(self.initial_position);
        let front = robot.front_edge(self.initial_position);
        if let Some(wall) = self.arena.walls.iter().find(|w| w.x > rear && w.x < front) {
            return Err(ConfigError::StartsInsideWall { wall_x: wall.x });
        }
        if let Some(step) = self.arena.steps.iter().find(|s| s.overlaps(rear, front)) {
            return Err(ConfigError::StartsOnStep { step_x: step.x });
        }

        Ok(())
    }

    /// The robot's rigid dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are invalid.
    pub fn robot(&self) -> Result<Robot, ConfigError> {
        Robot::new(
            self.wheel_radius,
            self.chassis_length,
            self.wheel_inward_offset,
        )
    }

    /// The fixed simulation step.
    ///
    /// # Errors
    ///
    /// Returns an error if `fixed_step` is not finite and positive.
    pub fn step(&self) -> Result<TimeIncrement, ConfigError> {
        Ok(TimeIncrement::from_seconds(self.fixed_step)?)
    }
}

/// Distance sensor mounted above the chassis center, pointing forward.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfig {
    /// Height of the sensor base above the chassis center.
    pub height_offset: f64,
    /// Maximum range.
    pub limit: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            height_offset: 0.75,
            limit: 10.0,
        }
    }
}

impl SensorConfig {
    /// # Errors
    ///
    /// Returns an error for a non-finite offset or a non-positive limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.height_offset.is_finite() {
            return Err(ConfigError::SensorHeightOffset(self.height_offset));
        }
        if !self.limit.is_finite() || self.limit <= 0.0 {
            return Err(ConfigError::SensorLimit(self.limit));
        }
        Ok(())
    }
}

/// Proportional wall-avoidance controller.
///
/// Every `period` seconds of logical time the commanded wheel speed becomes
/// `clamp(speed_slope * distance + speed_intercept, -speed_max, speed_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    pub period: f64,
    pub speed_slope: f64,
    pub speed_intercept: f64,
    pub speed_max: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            period: 0.1,
            speed_slope: 2.0,
            speed_intercept: -15.0,
            speed_max: 3.0,
        }
    }
}

impl ControlConfig {
    /// # Errors
    ///
    /// Returns an error for a non-positive period, non-finite gains, or a
    /// negative speed limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.period()?;
        if !self.speed_slope.is_finite() || !self.speed_intercept.is_finite() {
            return Err(ConfigError::Gains);
        }
        if !self.speed_max.is_finite() || self.speed_max < 0.0 {
            return Err(ConfigError::SpeedMax(self.speed_max));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `period` is not finite and positive.
    pub fn period(&self) -> Result<TimeIncrement, ConfigError> {
        TimeIncrement::from_seconds(self.period).map_err(ConfigError::ControlPeriod)
    }
}

/// Spring and damper between the chassis and each wheel axle, acting along
/// the chassis' vertical axis. Only the engine world has a suspension.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuspensionConfig {
    /// Natural frequency in Hz.
    pub frequency: f64,
    /// Damping ratio, `1.0` for critical damping.
    pub damping: f64,
}

impl Default for SuspensionConfig {
    fn default() -> Self {
        Self {
            frequency: 4.0,
            damping: 0.7,
        }
    }
}

impl SuspensionConfig {
    /// # Errors
    ///
    /// Returns an error for a non-positive frequency or a negative damping
    /// ratio.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(ConfigError::SuspensionFrequency(self.frequency));
        }
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(ConfigError::SuspensionDamping(self.damping));
        }
        Ok(())
    }

    /// Spring stiffness per unit of effective mass, `(2 pi f)^2`.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        let omega = std::f64::consts::TAU * self.frequency;
        omega * omega
    }

    /// Damping per unit of effective mass, `2 zeta (2 pi f)`.
    #[must_use]
    pub fn damping_coefficient(&self) -> f64 {
        2.0 * self.damping * std::f64::consts::TAU * self.frequency
    }
}

/// Parameters of the rigid-body world used at engine fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    /// Torque limit of each wheel motor.
    pub motor_max_torque: f64,
    /// Area density shared by the chassis and wheels.
    pub density: f64,
    /// Friction of the ground and the steps.
    pub ground_friction: f64,
    /// Friction of the chassis and the wheels.
    pub wheel_friction: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            velocity_iterations: 8,
            position_iterations: 3,
            motor_max_torque: 10.0,
            density: 0.7,
            ground_friction: 0.7,
            wheel_friction: 0.3,
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns an error for zero velocity iterations, a negative torque
    /// limit, a non-positive density, or a negative friction coefficient.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.velocity_iterations == 0 {
            return Err(ConfigError::VelocityIterations);
        }
        if !self.motor_max_torque.is_finite() || self.motor_max_torque < 0.0 {
            return Err(ConfigError::MotorMaxTorque(self.motor_max_torque));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(ConfigError::Density(self.density));
        }
        for friction in [self.ground_friction, self.wheel_friction] {
            if !friction.is_finite() || friction < 0.0 {
                return Err(ConfigError::Friction(friction));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{Step, Wall};

    #[test]
    fn defaults_are_valid() {
        assert!(WmrConfig::default().validate().is_ok());
        assert!(ControlConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_fixed_step() {
        let config = WmrConfig {
            fixed_step: 0.0,
            ..WmrConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FixedStep(_))));
    }

    #[test]
    fn rejects_bad_control() {
        let config = WmrConfig {
            control: Some(ControlConfig {
                period: -0.1,
                ..ControlConfig::default()
            }),
            ..WmrConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ControlPeriod(_))
        ));

        let control = ControlConfig {
            speed_max: -1.0,
            ..ControlConfig::default()
        };
        assert_eq!(control.validate(), Err(ConfigError::SpeedMax(-1.0)));

        let control = ControlConfig {
            speed_slope: f64::NAN,
            ..ControlConfig::default()
        };
        assert_eq!(control.validate(), Err(ConfigError::Gains));
    }

    #[test]
    fn rejects_robot_starting_inside_a_wall() {
        let mut config = WmrConfig::default();
        config.arena.walls = vec![Wall { x: 4.0, height: 3.0 }];
        assert_eq!(
            config.validate(),
            Err(ConfigError::StartsInsideWall { wall_x: 4.0 })
        );
    }

    #[test]
    fn rejects_robot_starting_on_a_step() {
        let mut config = WmrConfig::default();
        config.arena.steps = vec![Step {
            x: 5.0,
            length: 2.0,
            height: 1.2,
        }];
        assert_eq!(
            config.validate(),
            Err(ConfigError::StartsOnStep { step_x: 5.0 })
        );
    }

    #[test]
    fn rejects_bad_suspension_and_friction() {
        let config = WmrConfig {
            suspension: SuspensionConfig {
                frequency: 0.0,
                ..SuspensionConfig::default()
            },
            ..WmrConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SuspensionFrequency(0.0)));

        let suspension = SuspensionConfig {
            damping: -0.1,
            ..SuspensionConfig::default()
        };
        assert_eq!(suspension.validate(), Err(ConfigError::SuspensionDamping(-0.1)));

        let engine = EngineConfig {
            wheel_friction: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(matches!(engine.validate(), Err(ConfigError::Friction(_))));
    }

    #[test]
    fn suspension_coefficients_follow_frequency_and_damping() {
        let suspension = SuspensionConfig {
            frequency: 1.0,
            damping: 0.5,
        };
        let omega = std::f64::consts::TAU;
        assert_relative_eq!(suspension.stiffness(), omega * omega);
        assert_relative_eq!(suspension.damping_coefficient(), omega);
    }

    #[test]
    fn parses_a_partial_toml_file() {
        let config: WmrConfig = toml::from_str(
            r"
            initial_position = 5.0

            [engine]
            velocity_iterations = 4

            [suspension]
            frequency = 6.0

            [[arena.walls]]
            x = 30.0
            height = 2.0
            ",
        )
        .unwrap();

        assert_eq!(config.initial_position, 5.0);
        assert_eq!(config.engine.velocity_iterations, 4);
        assert_eq!(config.engine.position_iterations, 3);
        assert_eq!(config.arena.walls, vec![Wall { x: 30.0, height: 2.0 }]);
        assert_eq!(config.arena.ground_extent, 100.0);
        assert_eq!(config.arena.steps, Arena::default().steps);
        assert_eq!(config.suspension.frequency, 6.0);
        assert_eq!(config.suspension.damping, 0.7);
        assert!(config.control.is_none());
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<WmrConfig, _> = toml::from_str("wheel_size = 2.0");
        assert!(result.is_err());
    }
}
