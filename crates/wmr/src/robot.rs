use crate::{BodyPose, ConfigError, Layout};

/// Rigid dimensions of the robot: a rectangular chassis on two equal wheels.
///
/// The wheel axles sit `chassis_length / 2 - wheel_inward_offset` ahead of
/// and behind the chassis center, at wheel-radius height above the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Robot {
    wheel_radius: f64,
    chassis_length: f64,
    wheel_inward_offset: f64,
}

impl Robot {
    /// Creates a robot with validated dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or length is not finite and positive,
    /// or if the inward offset would put the axles at or past the chassis
    /// center.
    pub fn new(
        wheel_radius: f64,
        chassis_length: f64,
        wheel_inward_offset: f64,
    ) -> Result<Self, ConfigError> {
        if !wheel_radius.is_finite() || wheel_radius <= 0.0 {
            return Err(ConfigError::WheelRadius(wheel_radius));
        }
        if !chassis_length.is_finite() || chassis_length <= 0.0 {
            return Err(ConfigError::ChassisLength(chassis_length));
        }
        if !wheel_inward_offset.is_finite()
            || wheel_inward_offset < 0.0
            || wheel_inward_offset >= chassis_length / 2.0
        {
            return Err(ConfigError::WheelInwardOffset(wheel_inward_offset));
        }

        Ok(Self {
            wheel_radius,
            chassis_length,
            wheel_inward_offset,
        })
    }

    #[must_use]
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    #[must_use]
    pub fn chassis_length(&self) -> f64 {
        self.chassis_length
    }

    #[must_use]
    pub fn wheel_inward_offset(&self) -> f64 {
        self.wheel_inward_offset
    }

    /// Chassis height, which grows with the wheels up to one unit.
    #[must_use]
    pub fn chassis_height(&self) -> f64 {
        (1.1 * self.wheel_radius).min(1.0)
    }

    /// Horizontal distance from the chassis center to each axle.
    #[must_use]
    pub fn axle_offset(&self) -> f64 {
        self.chassis_length / 2.0 - self.wheel_inward_offset
    }

    /// Leading edge of the front wheel for a chassis centered at `x`.
    #[must_use]
    pub fn front_edge(&self, x: f64) -> f64 {
        x + self.axle_offset() + self.wheel_radius
    }

    /// Trailing edge of the rear wheel for a chassis centered at `x`.
    #[must_use]
    pub fn rear_edge(&self, x: f64) -> f64 {
        x - self.axle_offset() - self.wheel_radius
    }

    /// Places every body for a chassis centered at `x` whose wheels have
    /// rolled through `rolled` radians.
    #[must_use]
    pub fn layout(&self, x: f64, rolled: f64) -> Layout {
        let y = self.wheel_radius;
        let axle = self.axle_offset();
        Layout {
            chassis: BodyPose::new(x, y, 0.0),
            front_wheel: BodyPose::new(x + axle, y, -rolled),
            rear_wheel: BodyPose::new(x - axle, y, -rolled),
        }
    }
}
