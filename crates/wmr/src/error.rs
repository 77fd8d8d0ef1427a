use cadence_core::TimeIncrementError;
use thiserror::Error;

/// Errors that can occur when validating a robot, arena or controller
/// configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("wheel radius must be finite and positive, got {0}")]
    WheelRadius(f64),

    #[error("chassis length must be finite and positive, got {0}")]
    ChassisLength(f64),

    #[error("wheel inward offset must be in [0, chassis_length / 2), got {0}")]
    WheelInwardOffset(f64),

    #[error("initial position must be finite, got {0}")]
    InitialPosition(f64),

    #[error("angular velocity must be finite, got {0}")]
    AngularVelocity(f64),

    #[error("invalid fixed step: {0}")]
    FixedStep(#[from] TimeIncrementError),

    #[error("sensor limit must be finite and positive, got {0}")]
    SensorLimit(f64),

    #[error("sensor height offset must be finite, got {0}")]
    SensorHeightOffset(f64),

    #[error("invalid control period: {0}")]
    ControlPeriod(TimeIncrementError),

    #[error("controller max speed must be finite and non-negative, got {0}")]
    SpeedMax(f64),

    #[error("controller slope and intercept must be finite")]
    Gains,

    #[error("velocity iterations must be at least one")]
    VelocityIterations,

    #[error("motor max torque must be finite and non-negative, got {0}")]
    MotorMaxTorque(f64),

    #[error("density must be finite and positive, got {0}")]
    Density(f64),

    #[error("friction coefficients must be finite and non-negative, got {0}")]
    Friction(f64),

    #[error("suspension frequency must be finite and positive, got {0}")]
    SuspensionFrequency(f64),

    #[error("suspension damping ratio must be finite and non-negative, got {0}")]
    SuspensionDamping(f64),

    #[error("ground extent must be finite and positive, got {0}")]
    GroundExtent(f64),

    #[error("wall {index} must have a finite position and positive height")]
    Wall { index: usize },

    #[error("step {index} must have a finite position and positive size")]
    Step { index: usize },

    #[error("robot starts overlapping the wall at x = {wall_x}")]
    StartsInsideWall { wall_x: f64 },

    #[error("robot starts on top of the step at x = {step_x}")]
    StartsOnStep { step_x: f64 },
}
