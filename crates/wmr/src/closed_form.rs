use cadence_core::StepIntegrable;

use crate::{
    Layout, Robot,
    kinematics::{WheelRates, WheelState},
};

/// Analytic kinematics: the pose is a function of absolute time.
///
/// Within a segment of constant angular velocity starting at `t0`,
/// `position = p0 + ω r (t - t0)` and `rolled = a0 + ω (t - t0)`. Changing
/// the angular velocity starts a new segment at the last evaluated time, so a
/// controller can steer the robot without sub-stepping.
///
/// There is no collision handling at this fidelity.
#[derive(Debug, Clone)]
pub struct ClosedForm {
    robot: Robot,
    initial: WheelState,
    initial_angular_velocity: f64,
    origin: WheelState,
    origin_time: f64,
    angular_velocity: f64,
    time: f64,
    state: WheelState,
}

impl ClosedForm {
    #[must_use]
    pub fn new(robot: Robot, initial_position: f64, angular_velocity: f64) -> Self {
        let initial = WheelState {
            position: initial_position,
            rolled: 0.0,
        };
        Self {
            robot,
            initial,
            initial_angular_velocity: angular_velocity,
            origin: initial,
            origin_time: 0.0,
            angular_velocity,
            time: 0.0,
            state: initial,
        }
    }

    /// Computes and stores the pose at absolute time `time` in seconds.
    pub fn evaluate(&mut self, time: f64) -> Layout {
        self.time = time;
        self.state = self.state_at(time);
        self.layout()
    }

    /// The state at `time` under the current segment, without storing it.
    #[must_use]
    pub fn state_at(&self, time: f64) -> WheelState {
        let rates = WheelRates::rolling(self.angular_velocity, self.robot.wheel_radius());
        self.origin.step(rates, time - self.origin_time)
    }

    /// Starts a new constant-velocity segment at the last evaluated time.
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.origin = self.state;
        self.origin_time = self.time;
        self.angular_velocity = angular_velocity;
    }

    pub fn reset(&mut self) {
        self.origin = self.initial;
        self.origin_time = 0.0;
        self.angular_velocity = self.initial_angular_velocity;
        self.time = 0.0;
        self.state = self.initial;
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.robot.layout(self.state.position, self.state.rolled)
    }

    #[must_use]
    pub fn state(&self) -> WheelState {
        self.state
    }

    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }
}
