use nalgebra::{Point2, Vector2};

use crate::{
    Arena, BodyPose, SensorConfig,
    geometry::{Segment, intersect},
};

/// What a sensor ray ended on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Wall,
    Step,
    Ground,
    /// Nothing within range.
    Clear,
}

/// One distance measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Distance to the nearest obstacle, capped at the sensor limit.
    pub distance: f64,
    pub base: Point2<f64>,
    /// Where the ray stops: the hit point, or the end of the unobstructed ray.
    pub tip: Point2<f64>,
    pub target: Target,
}

impl Reading {
    /// Whether something was detected within range.
    #[must_use]
    pub fn detects(&self) -> bool {
        self.target != Target::Clear
    }
}

/// A forward-looking distance sensor fixed above the chassis center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensor {
    height_offset: f64,
    limit: f64,
}

impl Sensor {
    #[must_use]
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            height_offset: config.height_offset,
            limit: config.limit,
        }
    }

    #[must_use]
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// The ray for a chassis at `chassis`, tilted with the chassis.
    #[must_use]
    pub fn ray(&self, chassis: &BodyPose) -> Segment {
        let (sin, cos) = chassis.angle.sin_cos();
        let base = chassis.position + Vector2::new(-sin, cos) * self.height_offset;
        Segment::from_ray(base, Vector2::new(cos, sin) * self.limit)
    }

    /// Measures the distance to the nearest wall, step or the ground.
    ///
    /// The distance is the smallest of the limit and every hit. The tip is
    /// the nearest hit, preferring an obstacle over the ground at equal
    /// distance.
    #[must_use]
    pub fn read(&self, chassis: &BodyPose, arena: &Arena) -> Reading {
        let ray = self.ray(chassis);

        let walls = arena
            .walls
            .iter()
            .filter_map(|wall| intersect(&ray, &wall.segment()))
            .map(|hit| (hit, Target::Wall));
        let steps = arena
            .steps
            .iter()
            .flat_map(|step| step.segments())
            .filter_map(|segment| intersect(&ray, &segment))
            .map(|hit| (hit, Target::Step));
        let ground = intersect(&ray, &arena.ground()).map(|hit| (hit, Target::Ground));

        let nearest = walls
            .chain(steps)
            .chain(ground)
            .min_by(|(a, _), (b, _)| a.t.total_cmp(&b.t));

        let (distance, tip, target) = match nearest {
            Some((hit, target)) => (self.limit.min(hit.distance_from(&ray)), hit.point, target),
            None => (self.limit, ray.end, Target::Clear),
        };

        Reading {
            distance,
            base: ray.start,
            tip,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{Step, Wall};

    fn sensor() -> Sensor {
        Sensor::new(&SensorConfig::default())
    }

    fn arena(walls: Vec<Wall>) -> Arena {
        Arena {
            walls,
            ..Arena::open(100.0)
        }
    }

    #[test]
    fn measures_wall_in_range() {
        let reading = sensor().read(
            &BodyPose::new(20.0, 1.0, 0.0),
            &arena(vec![Wall { x: 25.0, height: 3.0 }]),
        );

        assert_eq!(reading.target, Target::Wall);
        assert_relative_eq!(reading.distance, 5.0);
        assert_relative_eq!(reading.base.y, 1.75);
        assert_relative_eq!(reading.tip.x, 25.0);
        assert_relative_eq!(reading.tip.y, 1.75);
        assert!(reading.detects());
    }

    #[test]
    fn out_of_range_reports_the_limit() {
        let reading = sensor().read(&BodyPose::new(3.0, 1.0, 0.0), &Arena::default());

        assert_eq!(reading.target, Target::Clear);
        assert_relative_eq!(reading.distance, 10.0);
        assert_relative_eq!(reading.tip.x, 13.0);
        assert!(!reading.detects());
    }

    #[test]
    fn picks_the_nearest_of_several_walls() {
        let walls = vec![Wall { x: 8.0, height: 3.0 }, Wall { x: 6.0, height: 3.0 }];
        let reading = sensor().read(&BodyPose::new(3.0, 1.0, 0.0), &arena(walls));
        assert_relative_eq!(reading.distance, 3.0);
    }

    #[test]
    fn sensor_passes_over_a_low_wall() {
        let walls = vec![Wall { x: 6.0, height: 1.0 }];
        let reading = sensor().read(&BodyPose::new(3.0, 1.0, 0.0), &arena(walls));
        assert_eq!(reading.target, Target::Clear);
    }

    #[test]
    fn nose_down_chassis_sees_the_ground() {
        let chassis = BodyPose::new(0.0, 1.0, -std::f64::consts::FRAC_PI_4);
        let reading = sensor().read(&chassis, &Arena::open(100.0));

        assert_eq!(reading.target, Target::Ground);
        assert_relative_eq!(reading.tip.y, 0.0, epsilon = 1e-12);
        assert!(reading.distance < 10.0);
        assert_relative_eq!((reading.tip - reading.base).norm(), reading.distance, epsilon = 1e-12);
    }

    #[test]
    fn default_step_is_below_the_sensor() {
        let reading = sensor().read(&BodyPose::new(6.0, 1.0, 0.0), &Arena::default());
        assert_eq!(reading.target, Target::Clear);
    }

    #[test]
    fn tall_step_is_detected_on_its_near_face() {
        let arena = Arena {
            steps: vec![Step {
                x: 9.0,
                length: 2.0,
                height: 4.0,
            }],
            ..Arena::open(100.0)
        };
        let reading = sensor().read(&BodyPose::new(3.0, 1.0, 0.0), &arena);

        assert_eq!(reading.target, Target::Step);
        assert_relative_eq!(reading.distance, 5.0);
        assert_relative_eq!(reading.tip.x, 8.0);
    }

    #[test]
    fn nose_down_chassis_sees_the_step_top_before_the_ground() {
        let step = Step {
            x: 2.0,
            length: 2.0,
            height: 1.2,
        };
        let arena = Arena {
            steps: vec![step],
            ..Arena::open(100.0)
        };
        let chassis = BodyPose::new(0.0, 1.0, -std::f64::consts::FRAC_PI_4);
        let reading = sensor().read(&chassis, &arena);

        assert_eq!(reading.target, Target::Step);
        assert_relative_eq!(reading.tip.y, 0.6, epsilon = 1e-12);
    }
}
