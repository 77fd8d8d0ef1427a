//! Two-dimensional segment intersection.

use nalgebra::{Point2, Vector2};

/// Below this magnitude the cross product of two directions is treated as
/// zero and the segments as parallel.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A line segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    /// Creates a segment from a start point and a direction vector.
    #[must_use]
    pub fn from_ray(start: Point2<f64>, direction: Vector2<f64>) -> Self {
        Self {
            start,
            end: start + direction,
        }
    }

    /// Vector from `start` to `end`.
    #[must_use]
    pub fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Point at parameter `t`, where `0` is `start` and `1` is `end`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + self.direction() * t
    }
}

/// Where two segments cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Parameter along the first segment.
    pub t: f64,
    /// Parameter along the second segment.
    pub u: f64,
    /// The crossing point, `first.start + t * first.direction()`.
    pub point: Point2<f64>,
}

impl Intersection {
    /// Distance from the start of the first segment to the crossing point.
    #[must_use]
    pub fn distance_from(&self, first: &Segment) -> f64 {
        (self.point - first.start).norm()
    }
}

/// Finds where segment `a` crosses segment `b`.
///
/// With `a = p + t r` and `b = q + u s`, solves
/// `t = (q - p) x s / (r x s)` and `u = (q - p) x r / (r x s)`. A crossing is
/// reported only when both parameters lie strictly inside `(0, 1)`, so
/// touching at an endpoint does not count. Parallel and collinear segments
/// never intersect.
///
/// ```
/// use cadence_wmr::geometry::{Segment, intersect};
/// use nalgebra::Point2;
///
/// let ray = Segment::new(Point2::new(0.0, 1.0), Point2::new(10.0, 1.0));
/// let wall = Segment::new(Point2::new(5.0, -2.0), Point2::new(5.0, 2.0));
///
/// let hit = intersect(&ray, &wall).unwrap();
/// assert_eq!(hit.t, 0.5);
/// assert_eq!(hit.point, Point2::new(5.0, 1.0));
/// ```
#[must_use]
pub fn intersect(a: &Segment, b: &Segment) -> Option<Intersection> {
    let r = a.direction();
    let s = b.direction();
    let rxs = r.perp(&s);
    if rxs.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let qp = b.start - a.start;
    let t = qp.perp(&s) / rxs;
    let u = qp.perp(&r) / rxs;

    let inside = |v: f64| v > 0.0 && v < 1.0;
    (inside(t) && inside(u)).then(|| Intersection {
        t,
        u,
        point: a.point_at(t),
    })
}
