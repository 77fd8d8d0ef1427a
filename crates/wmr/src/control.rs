use cadence_core::Periodic;
use tracing::debug;
use uom::si::f64::Time;

use crate::{ConfigError, ControlConfig};

/// Proportional speed law: `clamp(slope * distance + intercept, -max, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    slope: f64,
    intercept: f64,
    max: f64,
}

impl Gains {
    /// # Errors
    ///
    /// Returns an error for non-finite gains or a negative or non-finite
    /// speed limit.
    pub fn new(slope: f64, intercept: f64, max: f64) -> Result<Self, ConfigError> {
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(ConfigError::Gains);
        }
        if !max.is_finite() || max < 0.0 {
            return Err(ConfigError::SpeedMax(max));
        }
        Ok(Self {
            slope,
            intercept,
            max,
        })
    }

    /// The commanded wheel angular velocity for a measured distance.
    #[must_use]
    pub fn command(&self, distance: f64) -> f64 {
        (self.slope * distance + self.intercept).clamp(-self.max, self.max)
    }

    /// Distance at which the command is zero, if the slope is not zero.
    #[must_use]
    pub fn set_point(&self) -> Option<f64> {
        (self.slope != 0.0).then(|| -self.intercept / self.slope)
    }
}

/// Applies [`Gains`] on a fixed period of logical time.
///
/// The schedule is first due at time zero and is polled once per frame, so a
/// frame that spans several periods still applies one command.
#[derive(Debug, Clone)]
pub struct ControlLoop {
    gains: Gains,
    schedule: Periodic,
}

impl ControlLoop {
    /// # Errors
    ///
    /// Returns an error if the period or gains are invalid.
    pub fn new(config: &ControlConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            gains: Gains::new(config.speed_slope, config.speed_intercept, config.speed_max)?,
            schedule: Periodic::starting_now(config.period()?),
        })
    }

    /// Returns a new speed command if the schedule is due at `now`.
    pub fn poll(&mut self, now: Time, distance: f64) -> Option<f64> {
        if !self.schedule.poll(now) {
            return None;
        }
        let speed = self.gains.command(distance);
        debug!(distance, speed, "control update");
        Some(speed)
    }

    pub fn reset(&mut self) {
        self.schedule.reset();
    }

    #[must_use]
    pub fn gains(&self) -> &Gains {
        &self.gains
    }
}
