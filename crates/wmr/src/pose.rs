use nalgebra::Point2;

/// The bodies that make up the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyId {
    Chassis,
    FrontWheel,
    RearWheel,
}

impl BodyId {
    pub const ALL: [BodyId; 3] = [BodyId::Chassis, BodyId::FrontWheel, BodyId::RearWheel];
}

/// Position and orientation of one rigid body.
///
/// Angles are in radians, counter-clockwise positive with `y` up, so a wheel
/// rolling toward `+x` has a decreasing angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: Point2<f64>,
    pub angle: f64,
}

impl BodyPose {
    #[must_use]
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            angle,
        }
    }
}

/// Poses of every body of the robot, as exposed for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub chassis: BodyPose,
    pub front_wheel: BodyPose,
    pub rear_wheel: BodyPose,
}

impl Layout {
    #[must_use]
    pub fn body(&self, id: BodyId) -> BodyPose {
        match id {
            BodyId::Chassis => self.chassis,
            BodyId::FrontWheel => self.front_wheel,
            BodyId::RearWheel => self.rear_wheel,
        }
    }

    /// Horizontal position of the chassis center.
    #[must_use]
    pub fn location(&self) -> f64 {
        self.chassis.position.x
    }
}
