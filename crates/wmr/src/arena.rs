use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, geometry::Segment};

/// A vertical wall rising from the ground at `x`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Wall {
    pub x: f64,
    pub height: f64,
}

impl Wall {
    #[must_use]
    pub fn segment(&self) -> Segment {
        Segment::new(Point2::new(self.x, 0.0), Point2::new(self.x, self.height))
    }
}

/// A `length` by `height` block centered on the ground line at `x`.
///
/// Half of the block is buried, so it rises `height / 2` above the ground.
/// Only the engine world drives over it; the kinematic fidelities roll
/// through it as if the ground were flat.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Step {
    pub x: f64,
    pub length: f64,
    pub height: f64,
}

impl Step {
    #[must_use]
    pub fn rise(&self) -> f64 {
        self.height / 2.0
    }

    #[must_use]
    pub fn near_face(&self) -> f64 {
        self.x - self.length / 2.0
    }

    #[must_use]
    pub fn far_face(&self) -> f64 {
        self.x + self.length / 2.0
    }

    /// The exposed outline: near face, top and far face.
    #[must_use]
    pub fn segments(&self) -> [Segment; 3] {
        let near_base = Point2::new(self.near_face(), 0.0);
        let near_top = Point2::new(self.near_face(), self.rise());
        let far_top = Point2::new(self.far_face(), self.rise());
        let far_base = Point2::new(self.far_face(), 0.0);
        [
            Segment::new(near_base, near_top),
            Segment::new(near_top, far_top),
            Segment::new(far_top, far_base),
        ]
    }

    /// Whether the block overlaps the span `[from, to]` along the ground.
    #[must_use]
    pub fn overlaps(&self, from: f64, to: f64) -> bool {
        self.near_face() < to && self.far_face() > from
    }
}

/// Flat ground spanning `[-ground_extent, ground_extent]` with vertical walls
/// and raised steps.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Arena {
    pub ground_extent: f64,
    pub walls: Vec<Wall>,
    pub steps: Vec<Step>,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            ground_extent: 100.0,
            walls: vec![Wall {
                x: 25.0,
                height: 3.0,
            }],
            steps: vec![Step {
                x: 10.0,
                length: 2.0,
                height: 1.2,
            }],
        }
    }
}

impl Arena {
    /// Ground with no walls or steps.
    #[must_use]
    pub fn open(ground_extent: f64) -> Self {
        Self {
            ground_extent,
            walls: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// The default walls on flat ground.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            steps: Vec::new(),
            ..Self::default()
        }
    }

    /// Checks that the ground, every wall and every step are well formed.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive ground extent, a wall with a
    /// non-finite position or non-positive height, or a step with a
    /// non-finite position or non-positive size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ground_extent.is_finite() || self.ground_extent <= 0.0 {
            return Err(ConfigError::GroundExtent(self.ground_extent));
        }
        for (index, wall) in self.walls.iter().enumerate() {
            if !wall.x.is_finite() || !wall.height.is_finite() || wall.height <= 0.0 {
                return Err(ConfigError::Wall { index });
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            let positive = |v: f64| v.is_finite() && v > 0.0;
            if !step.x.is_finite() || !positive(step.length) || !positive(step.height) {
                return Err(ConfigError::Step { index });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn ground(&self) -> Segment {
        Segment::new(
            Point2::new(-self.ground_extent, 0.0),
            Point2::new(self.ground_extent, 0.0),
        )
    }

    /// The closest wall at or ahead of `x`.
    #[must_use]
    pub fn wall_ahead(&self, x: f64) -> Option<&Wall> {
        self.walls
            .iter()
            .filter(|wall| wall.x >= x)
            .min_by(|a, b| a.x.total_cmp(&b.x))
    }

    /// The closest wall at or behind `x`.
    #[must_use]
    pub fn wall_behind(&self, x: f64) -> Option<&Wall> {
        self.walls
            .iter()
            .filter(|wall| wall.x <= x)
            .max_by(|a, b| a.x.total_cmp(&b.x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn arena() -> Arena {
        Arena {
            ground_extent: 50.0,
            walls: vec![
                Wall { x: 25.0, height: 3.0 },
                Wall { x: -4.0, height: 1.0 },
                Wall { x: 12.0, height: 2.0 },
            ],
            steps: Vec::new(),
        }
    }

    #[test]
    fn finds_nearest_walls() {
        let arena = arena();
        assert_eq!(arena.wall_ahead(0.0).map(|w| w.x), Some(12.0));
        assert_eq!(arena.wall_ahead(12.0).map(|w| w.x), Some(12.0));
        assert_eq!(arena.wall_ahead(30.0), None);
        assert_eq!(arena.wall_behind(0.0).map(|w| w.x), Some(-4.0));
        assert_eq!(arena.wall_behind(20.0).map(|w| w.x), Some(12.0));
        assert_eq!(arena.wall_behind(-10.0), None);
    }

    #[test]
    fn default_has_one_wall_and_one_step() {
        let arena = Arena::default();
        assert_eq!(arena.walls.len(), 1);
        assert_eq!(arena.steps.len(), 1);
        assert!(arena.validate().is_ok());

        let flat = Arena::flat();
        assert_eq!(flat.walls, arena.walls);
        assert!(flat.steps.is_empty());
    }

    #[test]
    fn default_step_is_half_buried() {
        let step = Arena::default().steps[0];
        assert_relative_eq!(step.rise(), 0.6);
        assert_relative_eq!(step.near_face(), 9.0);
        assert_relative_eq!(step.far_face(), 11.0);

        let [near, top, far] = step.segments();
        assert_eq!(near.start, Point2::new(9.0, 0.0));
        assert_eq!(top.end, Point2::new(11.0, 0.6));
        assert_eq!(far.end, Point2::new(11.0, 0.0));
    }

    #[test]
    fn step_overlap_is_exclusive_at_the_faces() {
        let step = Arena::default().steps[0];
        assert!(step.overlaps(8.0, 9.5));
        assert!(step.overlaps(10.5, 12.0));
        assert!(!step.overlaps(5.0, 9.0));
        assert!(!step.overlaps(11.0, 13.0));
    }

    #[test]
    fn rejects_bad_walls_and_steps() {
        let mut arena = arena();
        arena.walls[2].height = 0.0;
        assert_eq!(arena.validate(), Err(ConfigError::Wall { index: 2 }));

        let mut arena = Arena::default();
        arena.steps.push(Step {
            x: 40.0,
            length: -1.0,
            height: 1.0,
        });
        assert_eq!(arena.validate(), Err(ConfigError::Step { index: 1 }));

        assert_eq!(
            Arena::open(-1.0).validate(),
            Err(ConfigError::GroundExtent(-1.0))
        );
    }
}
