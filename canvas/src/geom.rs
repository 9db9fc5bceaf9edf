//! Geometry primitives: scene-space points, axis-aligned bounds, and the
//! handful of vector operations the binding engine and transforms need.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::f64::consts::TAU;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point (or vector) in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Length of this point taken as a vector from the origin.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Rotate this point by `angle` radians (clockwise in y-down scene space)
    /// about `center`.
    #[must_use]
    pub fn rotate_around(self, center: Point, angle: f64) -> Point {
        if angle == 0.0 {
            return self;
        }
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point { x: center.x + dx * cos - dy * sin, y: center.y + dx * sin + dy * cos }
    }

    /// Rotate this point taken as a vector about the origin.
    #[must_use]
    pub fn rotate(self, angle: f64) -> Point {
        self.rotate_around(Point::default(), angle)
    }

    /// Component-wise scale.
    #[must_use]
    pub fn scale(self, sx: f64, sy: f64) -> Point {
        Point { x: self.x * sx, y: self.y * sy }
    }

    /// Whether both coordinates are within `eps` of `other`'s.
    #[must_use]
    pub fn approx_eq(self, other: Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point { x: self.x * rhs, y: self.y * rhs }
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point { x: -self.x, y: -self.y }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Normalized bounds spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self { left, top, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    /// Smallest bounds containing every point, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self { left: min_x, top: min_y, width: max_x - min_x, height: max_y - min_y })
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[must_use]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Corners in clockwise order starting at the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left, self.bottom()),
        ]
    }

    /// Smallest bounds containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Bounds { left, top, width: right - left, height: bottom - top }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside `self` (both corners contained).
    #[must_use]
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains_point(other.top_left()) && self.contains_point(other.bottom_right())
    }

    /// Distance from `p` to the nearest point on the rectangle's outline.
    ///
    /// Points inside measure to the closest edge; points outside measure to
    /// the closest point of the rectangle.
    #[must_use]
    pub fn distance_to_edge(&self, p: Point) -> f64 {
        if self.contains_point(p) {
            let dl = p.x - self.left;
            let dr = self.right() - p.x;
            let dt = p.y - self.top;
            let db = self.bottom() - p.y;
            return dl.min(dr).min(dt).min(db);
        }
        let cx = p.x.clamp(self.left, self.right());
        let cy = p.y.clamp(self.top, self.bottom());
        p.distance(Point::new(cx, cy))
    }

    /// Axis-aligned bounds of this rectangle after rotating it by `angle`
    /// about its own center.
    #[must_use]
    pub fn rotated_aabb(&self, angle: f64) -> Bounds {
        if angle == 0.0 {
            return *self;
        }
        let center = self.center();
        let corners = self.corners().map(|c| c.rotate_around(center, angle));
        Bounds::from_points(&corners).unwrap_or(*self)
    }

    /// Same bounds shifted by `delta`.
    #[must_use]
    pub fn translate(&self, delta: Point) -> Bounds {
        Bounds { left: self.left + delta.x, top: self.top + delta.y, ..*self }
    }
}

/// Normalize an angle in radians into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU { 0.0 } else { a }
}
