use cadence_core::{StepIntegrable, Stepper, TimeIncrement};
use tracing::trace;

use crate::{
    Arena, Layout, Robot,
    kinematics::{WheelRates, WheelState},
};

/// Explicit-Euler kinematics with a stop-at-wall guard.
///
/// Each fixed step moves the chassis by `ω r dt` unless that would push the
/// front wheel's leading edge past the nearest wall ahead (or the rear
/// wheel's trailing edge past the nearest wall behind). A blocked step leaves
/// the state untouched while the clock keeps running, so the robot stops
/// dead against a wall without bouncing or penetrating. Steps are ignored;
/// the wheels roll along flat ground.
#[derive(Debug, Clone)]
pub struct ExplicitEuler {
    robot: Robot,
    arena: Arena,
    initial: WheelState,
    initial_angular_velocity: f64,
    state: WheelState,
    angular_velocity: f64,
    blocked: bool,
    layout: Layout,
}

impl ExplicitEuler {
    #[must_use]
    pub fn new(robot: Robot, arena: Arena, initial_position: f64, angular_velocity: f64) -> Self {
        let initial = WheelState {
            position: initial_position,
            rolled: 0.0,
        };
        Self {
            robot,
            arena,
            initial,
            initial_angular_velocity: angular_velocity,
            state: initial,
            angular_velocity,
            blocked: false,
            layout: robot.layout(initial.position, initial.rolled),
        }
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    #[must_use]
    pub fn state(&self) -> WheelState {
        self.state
    }

    /// Whether the most recent step was stopped by a wall.
    #[must_use]
    pub fn blocked(&self) -> bool {
        self.blocked
    }

    /// Whether moving the chassis from its current position to `next` keeps
    /// both wheels clear of every wall.
    fn is_clear(&self, next: f64) -> bool {
        let current = self.state.position;
        if next > current {
            let front = self.robot.front_edge(current);
            self.arena
                .wall_ahead(front)
                .is_none_or(|wall| self.robot.front_edge(next) <= wall.x)
        } else {
            let rear = self.robot.rear_edge(current);
            self.arena
                .wall_behind(rear)
                .is_none_or(|wall| self.robot.rear_edge(next) >= wall.x)
        }
    }
}

impl Stepper for ExplicitEuler {
    type Pose = Layout;

    fn step_once(&mut self, dt: TimeIncrement) {
        let rates = WheelRates::rolling(self.angular_velocity, self.robot.wheel_radius());
        let next = self.state.step(rates, dt.seconds());

        self.blocked = !self.is_clear(next.position);
        if self.blocked {
            trace!(position = self.state.position, "step blocked by wall");
        } else {
            self.state = next;
        }
    }

    fn sync(&mut self) {
        self.layout = self.robot.layout(self.state.position, self.state.rolled);
    }

    fn pose(&self) -> Layout {
        self.layout
    }

    fn reset(&mut self) {
        self.state = self.initial;
        self.angular_velocity = self.initial_angular_velocity;
        self.blocked = false;
    }
}
