use std::{
    fmt,
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

use rapier2d::prelude::*;
use tracing::trace;

use crate::{
    Arena, BodyId, BodyPose, ConfigError, EngineConfig, Robot, SuspensionConfig, WmrConfig,
    engine::RigidBodyStepper,
};

const GRAVITY: Real = 9.8;

const WALL_FRICTION: Real = 0.2;

/// Damping factor of the wheel motors' velocity constraint. Large enough
/// that the torque limit, not the constraint softness, bounds acceleration.
const MOTOR_GAIN: Real = 1.0e4;

// Collision groups
const GROUP_WORLD: Group = Group::GROUP_1;
const GROUP_ROBOT: Group = Group::GROUP_2;

/// A `rapier2d` world holding one robot, the ground, the walls and the steps.
///
/// The robot is a cuboid chassis on two ball wheels. Each wheel hangs from
/// the chassis on a joint that locks it along the chassis' `x` axis and
/// leaves it free to spin and to slide along the chassis' `y` axis:
///
/// - **Motor**: a velocity motor on the spin axis, limited to
///   `motor_max_torque`.
/// - **Suspension**: a position motor on the slide axis whose stiffness and
///   damping come from [`SuspensionConfig`].
///
/// Robot colliders only collide with the arena, never with each other. The
/// front wheel reports collision events, which drive
/// [`in_contact`](RigidBodyStepper::in_contact).
pub struct DriveWorld {
    robot: Robot,
    parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    chassis: RigidBodyHandle,
    front_wheel: RigidBodyHandle,
    rear_wheel: RigidBodyHandle,
    axles: [ImpulseJointHandle; 2],
    wall_contact: WallContact,
    motor_speed: f64,
}

impl DriveWorld {
    /// Creates a world with the robot at rest, its chassis centered at
    /// `initial_position` and its wheels resting on the ground.
    #[must_use]
    pub fn new(
        robot: Robot,
        arena: &Arena,
        engine: &EngineConfig,
        suspension: &SuspensionConfig,
        initial_position: f64,
    ) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut impulse_joints = ImpulseJointSet::new();

        let world_groups = InteractionGroups::new(GROUP_WORLD, GROUP_ROBOT);
        let robot_groups = InteractionGroups::new(GROUP_ROBOT, GROUP_WORLD);

        let extent = arena.ground_extent;
        colliders.insert(
            ColliderBuilder::segment(point![-extent, 0.0], point![extent, 0.0])
                .friction(engine.ground_friction)
                .collision_groups(world_groups),
        );

        let walls = arena
            .walls
            .iter()
            .map(|wall| {
                colliders.insert(
                    ColliderBuilder::segment(point![wall.x, 0.0], point![wall.x, wall.height])
                        .friction(WALL_FRICTION)
                        .collision_groups(world_groups),
                )
            })
            .collect();

        for step in &arena.steps {
            colliders.insert(
                ColliderBuilder::cuboid(step.length / 2.0, step.height / 2.0)
                    .translation(vector![step.x, 0.0])
                    .friction(engine.ground_friction)
                    .collision_groups(world_groups),
            );
        }

        let layout = robot.layout(initial_position, 0.0);
        let dynamic = |pose: BodyPose| {
            RigidBodyBuilder::dynamic()
                .translation(vector![pose.position.x, pose.position.y])
                .rotation(pose.angle)
                .can_sleep(false)
        };
        let chassis = bodies.insert(dynamic(layout.chassis));
        let front_wheel = bodies.insert(dynamic(layout.front_wheel));
        let rear_wheel = bodies.insert(dynamic(layout.rear_wheel));

        colliders.insert_with_parent(
            ColliderBuilder::cuboid(robot.chassis_length() / 2.0, robot.chassis_height() / 2.0)
                .density(engine.density)
                .friction(engine.wheel_friction)
                .collision_groups(robot_groups),
            chassis,
            &mut bodies,
        );
        let wheel = || {
            ColliderBuilder::ball(robot.wheel_radius())
                .density(engine.density)
                .friction(engine.wheel_friction)
                .collision_groups(robot_groups)
        };
        let front_collider = colliders.insert_with_parent(
            wheel().active_events(ActiveEvents::COLLISION_EVENTS),
            front_wheel,
            &mut bodies,
        );
        colliders.insert_with_parent(wheel(), rear_wheel, &mut bodies);

        let axle = |offset: f64| {
            GenericJointBuilder::new(JointAxesMask::LIN_X)
                .local_anchor1(point![offset, 0.0])
                .local_anchor2(point![0.0, 0.0])
                .motor_position(
                    JointAxis::LinY,
                    0.0,
                    suspension.stiffness(),
                    suspension.damping_coefficient(),
                )
                .motor_velocity(JointAxis::AngX, 0.0, MOTOR_GAIN)
                .motor_max_force(JointAxis::AngX, engine.motor_max_torque)
                .build()
        };
        let axles = [
            impulse_joints.insert(chassis, front_wheel, axle(robot.axle_offset()), true),
            impulse_joints.insert(chassis, rear_wheel, axle(-robot.axle_offset()), true),
        ];

        Self {
            robot,
            parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints,
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            chassis,
            front_wheel,
            rear_wheel,
            axles,
            wall_contact: WallContact {
                wheel: front_collider,
                walls,
                touching: AtomicUsize::new(0),
            },
            motor_speed: 0.0,
        }
    }

    /// Builds the world described by a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &WmrConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            config.robot()?,
            &config.arena,
            &config.engine,
            &config.suspension,
            config.initial_position,
        ))
    }

    #[must_use]
    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    /// Horizontal chassis velocity.
    #[must_use]
    pub fn chassis_velocity(&self) -> f64 {
        self.bodies[self.chassis].linvel().x
    }

    fn handle(&self, body: BodyId) -> RigidBodyHandle {
        match body {
            BodyId::Chassis => self.chassis,
            BodyId::FrontWheel => self.front_wheel,
            BodyId::RearWheel => self.rear_wheel,
        }
    }
}

impl RigidBodyStepper for DriveWorld {
    /// Velocity iterations become solver iterations and position iterations
    /// become stabilization iterations.
    fn step(&mut self, dt: f64, velocity_iterations: usize, position_iterations: usize) {
        self.parameters.dt = dt;
        self.parameters.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        self.parameters.num_internal_stabilization_iterations = position_iterations;

        self.pipeline.step(
            &vector![0.0, -GRAVITY],
            &self.parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.wall_contact,
        );

        trace!(
            x = self.bodies[self.chassis].translation().x,
            velocity = self.chassis_velocity(),
            "world stepped"
        );
    }

    fn body_pose(&self, body: BodyId) -> BodyPose {
        let body = &self.bodies[self.handle(body)];
        let translation = body.translation();
        BodyPose::new(translation.x, translation.y, body.rotation().angle())
    }

    fn set_body_pose(&mut self, body: BodyId, pose: BodyPose) {
        let handle = self.handle(body);
        if let Some(body) = self.bodies.get_mut(handle) {
            let translation = vector![pose.position.x, pose.position.y];
            body.set_position(Isometry::new(translation, pose.angle), true);
            body.set_linvel(vector![0.0, 0.0], true);
            body.set_angvel(0.0, true);
        }
    }

    fn set_motor_speed(&mut self, speed: f64) {
        self.motor_speed = speed;
        for handle in self.axles {
            if let Some(joint) = self.impulse_joints.get_mut(handle) {
                joint
                    .data
                    .set_motor_velocity(JointAxis::AngX, speed, MOTOR_GAIN);
            }
        }
    }

    fn in_contact(&self) -> bool {
        self.wall_contact.touching()
    }
}

impl fmt::Debug for DriveWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveWorld")
            .field("robot", &self.robot)
            .field("chassis", &self.body_pose(BodyId::Chassis))
            .field("motor_speed", &self.motor_speed)
            .field("in_contact", &self.in_contact())
            .finish_non_exhaustive()
    }
}

/// Counts the walls the front wheel touches, from the collision events of
/// each step.
#[derive(Debug)]
struct WallContact {
    wheel: ColliderHandle,
    walls: Vec<ColliderHandle>,
    touching: AtomicUsize,
}

impl WallContact {
    fn involves(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        let is_wall = |handle: ColliderHandle| self.walls.contains(&handle);
        (a == self.wheel && is_wall(b)) || (b == self.wheel && is_wall(a))
    }

    fn touching(&self) -> bool {
        self.touching.load(Ordering::Relaxed) > 0
    }
}

impl EventHandler for WallContact {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if !self.involves(event.collider1(), event.collider2()) {
            return;
        }
        if event.started() {
            self.touching.fetch_add(1, Ordering::Relaxed);
        } else {
            // A stop without a matching start leaves the count at zero.
            let _ = self
                .touching
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{Step, Wall};

    const DT: f64 = 0.01;

    fn robot() -> Robot {
        Robot::new(1.0, 3.0, 0.1).unwrap()
    }

    fn world(arena: &Arena) -> DriveWorld {
        DriveWorld::new(
            robot(),
            arena,
            &EngineConfig::default(),
            &SuspensionConfig::default(),
            3.0,
        )
    }

    fn run(world: &mut DriveWorld, steps: usize) {
        for _ in 0..steps {
            world.step(DT, 8, 3);
        }
    }

    fn front_edge(world: &DriveWorld) -> f64 {
        world.body_pose(BodyId::FrontWheel).position.x + world.robot().wheel_radius()
    }

    fn arena_with_wall(x: f64) -> Arena {
        Arena {
            walls: vec![Wall { x, height: 3.0 }],
            ..Arena::open(100.0)
        }
    }

    #[test]
    fn starts_at_the_robot_layout() {
        let world = world(&Arena::default());
        let layout = robot().layout(3.0, 0.0);

        for id in BodyId::ALL {
            assert_eq!(world.body_pose(id), layout.body(id), "{id:?}");
        }
        assert!(!world.in_contact());
    }

    #[test]
    fn rolls_forward_under_the_motor() {
        let mut world = world(&Arena::open(100.0));
        world.set_motor_speed(-1.0);
        run(&mut world, 300);

        let chassis = world.body_pose(BodyId::Chassis);
        assert!(chassis.position.x > 4.0, "{}", chassis.position.x);
        assert!((0.8..1.05).contains(&chassis.position.y), "{}", chassis.position.y);
        assert_relative_eq!(world.chassis_velocity(), 1.0, epsilon = 0.05);
        assert!(world.body_pose(BodyId::FrontWheel).angle < 0.0);
    }

    #[test]
    fn zero_torque_never_moves() {
        let mut world = DriveWorld::new(
            robot(),
            &Arena::open(100.0),
            &EngineConfig {
                motor_max_torque: 0.0,
                ..EngineConfig::default()
            },
            &SuspensionConfig::default(),
            3.0,
        );
        world.set_motor_speed(-3.0);
        run(&mut world, 50);
        assert_relative_eq!(world.body_pose(BodyId::Chassis).position.x, 3.0, epsilon = 1e-3);
    }

    #[test]
    fn stops_at_the_wall_and_reports_contact() {
        let mut world = world(&arena_with_wall(10.0));
        world.set_motor_speed(-3.0);

        for _ in 0..600 {
            world.step(DT, 8, 3);
            assert!(front_edge(&world) < 10.05);
        }
        assert!(world.in_contact());
        assert!(front_edge(&world) > 9.95);

        let pinned = world.body_pose(BodyId::Chassis).position.x;
        run(&mut world, 100);
        assert_relative_eq!(world.body_pose(BodyId::Chassis).position.x, pinned, epsilon = 0.01);

        world.set_motor_speed(3.0);
        run(&mut world, 100);
        assert!(!world.in_contact());
        assert!(front_edge(&world) < 9.5);
    }

    #[test]
    fn tall_step_blocks_without_counting_as_a_wall() {
        let arena = Arena {
            steps: vec![Step {
                x: 10.0,
                length: 2.0,
                height: 6.0,
            }],
            ..Arena::open(100.0)
        };
        let mut world = world(&arena);
        world.set_motor_speed(-3.0);

        for _ in 0..600 {
            world.step(DT, 8, 3);
            assert!(front_edge(&world) < 9.05);
        }
        assert!(front_edge(&world) > 8.9);
        assert!(!world.in_contact());
    }

    #[test]
    fn softer_suspension_rides_lower() {
        let ride_height = |frequency: f64| {
            let mut world = DriveWorld::new(
                robot(),
                &Arena::open(100.0),
                &EngineConfig::default(),
                &SuspensionConfig {
                    frequency,
                    damping: 0.7,
                },
                3.0,
            );
            run(&mut world, 300);
            world.body_pose(BodyId::Chassis).position.y
        };

        let soft = ride_height(1.0);
        let stiff = ride_height(8.0);
        assert!(soft < stiff - 0.1, "soft {soft}, stiff {stiff}");
        assert!(stiff < 1.0);
    }

    #[test]
    fn teleport_clears_velocity() {
        let mut world = world(&Arena::open(100.0));
        world.set_motor_speed(-1.0);
        run(&mut world, 50);
        assert!(world.chassis_velocity() > 0.0);

        let layout = robot().layout(3.0, 0.0);
        for id in BodyId::ALL {
            world.set_body_pose(id, layout.body(id));
        }

        assert_eq!(world.chassis_velocity(), 0.0);
        assert_eq!(world.body_pose(BodyId::Chassis), layout.chassis);
    }
}
