use std::fmt::Debug;

use cadence_core::{Stepper, TimeIncrement};

use crate::{BodyId, BodyPose, Layout};

/// An opaque rigid-body world that owns the robot's bodies.
///
/// The driver never moves bodies itself at engine fidelity. It asks the world
/// to step and reads poses back afterwards. [`DriveWorld`](crate::DriveWorld)
/// is the built-in implementation; any engine that can expose these
/// operations can be plugged in through
/// [`Wmr::with_engine`](crate::Wmr::with_engine).
pub trait RigidBodyStepper: Debug {
    /// Advances every body by `dt` seconds.
    fn step(&mut self, dt: f64, velocity_iterations: usize, position_iterations: usize);

    fn body_pose(&self, body: BodyId) -> BodyPose;

    /// Teleports a body, clearing its velocity.
    fn set_body_pose(&mut self, body: BodyId, pose: BodyPose);

    /// Sets the target angular velocity of both wheel motors relative to the
    /// chassis, counter-clockwise positive.
    fn set_motor_speed(&mut self, speed: f64);

    /// Whether the front wheel is touching a wall.
    fn in_contact(&self) -> bool;
}

impl<W: RigidBodyStepper + ?Sized> RigidBodyStepper for Box<W> {
    fn step(&mut self, dt: f64, velocity_iterations: usize, position_iterations: usize) {
        (**self).step(dt, velocity_iterations, position_iterations);
    }

    fn body_pose(&self, body: BodyId) -> BodyPose {
        (**self).body_pose(body)
    }

    fn set_body_pose(&mut self, body: BodyId, pose: BodyPose) {
        (**self).set_body_pose(body, pose);
    }

    fn set_motor_speed(&mut self, speed: f64) {
        (**self).set_motor_speed(speed);
    }

    fn in_contact(&self) -> bool {
        (**self).in_contact()
    }
}

/// Drives a [`RigidBodyStepper`] one fixed step at a time.
///
/// Poses are read back from the world once per frame in
/// [`sync`](Stepper::sync). Reset teleports every body back to the pose it
/// had when this stepper was created.
#[derive(Debug)]
pub struct EngineBacked<W> {
    world: W,
    velocity_iterations: usize,
    position_iterations: usize,
    initial: Layout,
    initial_angular_velocity: f64,
    angular_velocity: f64,
    layout: Layout,
}

impl<W: RigidBodyStepper> EngineBacked<W> {
    /// Wraps `world`, capturing its current poses as the reset snapshot and
    /// commanding the wheels to `angular_velocity`.
    pub fn new(
        mut world: W,
        velocity_iterations: usize,
        position_iterations: usize,
        angular_velocity: f64,
    ) -> Self {
        world.set_motor_speed(-angular_velocity);
        let layout = read_layout(&world);
        Self {
            world,
            velocity_iterations,
            position_iterations,
            initial: layout,
            initial_angular_velocity: angular_velocity,
            angular_velocity,
            layout,
        }
    }

    /// Commands a wheel angular velocity, positive toward `+x`.
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
        self.world.set_motor_speed(-angular_velocity);
    }

    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    #[must_use]
    pub fn in_contact(&self) -> bool {
        self.world.in_contact()
    }

    pub fn world(&self) -> &W {
        &self.world
    }
}

impl<W: RigidBodyStepper> Stepper for EngineBacked<W> {
    type Pose = Layout;

    fn step_once(&mut self, dt: TimeIncrement) {
        self.world.step(
            dt.seconds(),
            self.velocity_iterations,
            self.position_iterations,
        );
    }

    fn sync(&mut self) {
        self.layout = read_layout(&self.world);
    }

    fn pose(&self) -> Layout {
        self.layout
    }

    fn reset(&mut self) {
        for id in BodyId::ALL {
            self.world.set_body_pose(id, self.initial.body(id));
        }
        self.set_angular_velocity(self.initial_angular_velocity);
    }
}

fn read_layout<W: RigidBodyStepper>(world: &W) -> Layout {
    Layout {
        chassis: world.body_pose(BodyId::Chassis),
        front_wheel: world.body_pose(BodyId::FrontWheel),
        rear_wheel: world.body_pose(BodyId::RearWheel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// Moves every body at the motor speed and records the calls it gets.
    #[derive(Debug, Default)]
    struct Scripted {
        x: f64,
        motor_speed: f64,
        steps: Vec<(f64, usize, usize)>,
    }

    impl RigidBodyStepper for Scripted {
        fn step(&mut self, dt: f64, velocity_iterations: usize, position_iterations: usize) {
            self.x += -self.motor_speed * dt;
            self.steps.push((dt, velocity_iterations, position_iterations));
        }

        fn body_pose(&self, body: BodyId) -> BodyPose {
            let offset = match body {
                BodyId::Chassis => 0.0,
                BodyId::FrontWheel => 1.0,
                BodyId::RearWheel => -1.0,
            };
            BodyPose::new(self.x + offset, 1.0, 0.0)
        }

        fn set_body_pose(&mut self, body: BodyId, pose: BodyPose) {
            if body == BodyId::Chassis {
                self.x = pose.position.x;
            }
        }

        fn set_motor_speed(&mut self, speed: f64) {
            self.motor_speed = speed;
        }

        fn in_contact(&self) -> bool {
            false
        }
    }

    fn dt() -> TimeIncrement {
        TimeIncrement::from_seconds(0.5).unwrap()
    }

    #[test]
    fn forwards_step_with_iteration_counts() {
        let mut engine = EngineBacked::new(Scripted::default(), 8, 3, 2.0);
        engine.step_once(dt());

        assert_eq!(engine.world().steps, vec![(0.5, 8, 3)]);
        assert_relative_eq!(engine.world().motor_speed, -2.0);
    }

    #[test]
    fn reads_poses_back_on_sync() {
        let mut engine = EngineBacked::new(Scripted::default(), 8, 3, 2.0);
        engine.step_once(dt());
        assert_relative_eq!(engine.pose().location(), 0.0);

        engine.sync();
        assert_relative_eq!(engine.pose().location(), 1.0);
        assert_relative_eq!(engine.pose().front_wheel.position.x, 2.0);
    }

    #[test]
    fn reset_teleports_bodies_and_restores_motor() {
        let mut engine = EngineBacked::new(Scripted::default(), 8, 3, 2.0);
        engine.step_once(dt());
        engine.set_angular_velocity(-1.0);
        engine.reset();
        engine.sync();

        assert_relative_eq!(engine.pose().location(), 0.0);
        assert_relative_eq!(engine.angular_velocity(), 2.0);
        assert_relative_eq!(engine.world().motor_speed, -2.0);
    }
}
