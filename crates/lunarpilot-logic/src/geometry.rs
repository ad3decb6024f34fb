//! Points, polar vectors, angle wrapping and hull rotation.
//!
//! Bearing convention: 0° points along +Y (up) and positive angles turn
//! clockwise toward +X, so `x = mag·sin(angle)` and `y = mag·cos(angle)`.
//! Angles are always degrees at module boundaries.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point or vector in simulation space (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Terrain polyline: x strictly increasing, at least one point.
pub type Line = Vec<Point>;

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Magnitude/bearing form of a vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Polar {
    pub mag: f64,
    /// Bearing in degrees, 0° = +Y, clockwise positive.
    pub angle: f64,
}

impl Polar {
    pub const fn new(mag: f64, angle: f64) -> Self {
        Self { mag, angle }
    }

    pub fn to_cart(self) -> Point {
        let rad = self.angle.to_radians();
        Point::new(self.mag * rad.sin(), self.mag * rad.cos())
    }

    pub fn from_cart(p: Point) -> Self {
        Self {
            mag: p.magnitude(),
            angle: p.x.atan2(p.y).to_degrees(),
        }
    }
}

/// Wrap an angle in degrees into the half-open interval `(-180, 180]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Rotate local-frame hull corners by the lander's angle.
///
/// The hull sprite is authored nose-up along +X, so a lander angle of
/// `a` degrees maps to a counter-clockwise rotation by `90° − a`.
pub fn rotate_corners<const N: usize>(corners: [(f64, f64); N], angle: f64) -> [Point; N] {
    let rad = (90.0 - angle).to_radians();
    let (sin, cos) = rad.sin_cos();
    corners.map(|(x, y)| Point::new(x * cos - y * sin, x * sin + y * cos))
}
