use cadence_core::StepIntegrable;

/// Chassis position along the ground and the angle the wheels have rolled
/// through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelState {
    pub position: f64,
    pub rolled: f64,
}

/// Rates of change of a [`WheelState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelRates {
    pub linear: f64,
    pub angular: f64,
}

impl WheelRates {
    /// Rolling without slip: `v = ω r`.
    #[must_use]
    pub fn rolling(angular_velocity: f64, wheel_radius: f64) -> Self {
        Self {
            linear: angular_velocity * wheel_radius,
            angular: angular_velocity,
        }
    }
}

impl StepIntegrable<f64> for WheelState {
    type Derivative = WheelRates;

    fn step(&self, rates: WheelRates, dt: f64) -> Self {
        Self {
            position: self.position + rates.linear * dt,
            rolled: self.rolled + rates.angular * dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rolls_one_radius_per_radian() {
        let state = WheelState {
            position: 3.0,
            rolled: 0.0,
        };
        let next = state.step(WheelRates::rolling(2.0, 0.5), 1.5);

        assert_relative_eq!(next.position, 4.5);
        assert_relative_eq!(next.rolled, 3.0);
    }
}
