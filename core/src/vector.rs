//! Two-dimensional vector value type shared by every spatial system.

use std::{
    f64::consts::FRAC_PI_2,
    ops::{Add, Mul, Neg, Sub},
};

use serde::{Deserialize, Serialize};

/// Scale applied before rounding positions to a fixed number of decimals.
const PRECISION_SCALE: f64 = 1000.0;

/// Ordered pair of real numbers expressed in grid units.
///
/// Operations are pure and return new values. The `y` axis grows downwards,
/// matching the row ordering of the tile grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector2 {
    /// Vector with both components set to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns the unit vector pointing in the same direction.
    ///
    /// The zero vector has no direction and normalizes to itself instead of
    /// producing NaN components.
    #[must_use]
    pub fn normalize(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return Self::ZERO;
        }
        Self::new(self.x / magnitude, self.y / magnitude)
    }

    /// Multiplies both components by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Vector leading from `self` to `other`.
    #[must_use]
    pub fn towards(self, other: Self) -> Self {
        other - self
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.towards(other).magnitude()
    }

    /// Heading of the vector in radians.
    ///
    /// `0` points along `+x` and `π/2` along `+y`. The result lies within
    /// `(-π/2, 3π/2]`.
    #[must_use]
    pub fn angle(self) -> f64 {
        let unit = self.normalize();
        let swing = unit.y.clamp(-1.0, 1.0).acos();
        if unit.x < 0.0 {
            FRAC_PI_2 + swing
        } else {
            FRAC_PI_2 - swing
        }
    }

    /// Unit vector pointing along the provided heading.
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Rounds both components to three decimal places.
    #[must_use]
    pub fn round_to_precision(self) -> Self {
        Self::new(round_to_precision(self.x), round_to_precision(self.y))
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Heading from `from` towards `to`, see [`Vector2::angle`].
#[must_use]
pub fn find_angle(from: Vector2, to: Vector2) -> f64 {
    from.towards(to).angle()
}

/// Rounds a scalar to three decimal places, sending halves towards `+∞`.
#[must_use]
pub fn round_to_precision(value: f64) -> f64 {
    (value * PRECISION_SCALE + 0.5).floor() / PRECISION_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn normalize_produces_unit_length() {
        let unit = Vector2::new(3.0, -4.0).normalize();
        assert_close(unit.magnitude(), 1.0);
        assert_close(unit.x, 0.6);
        assert_close(unit.y, -0.8);
    }

    #[test]
    fn normalize_zero_vector_stays_zero() {
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    }

    #[test]
    fn cardinal_headings_match_convention() {
        assert_close(Vector2::new(1.0, 0.0).angle(), 0.0);
        assert_close(Vector2::new(0.0, 1.0).angle(), FRAC_PI_2);
        assert_close(Vector2::new(-1.0, 0.0).angle(), PI);
        assert_close(Vector2::new(0.0, -1.0).angle(), -FRAC_PI_2);
    }

    #[test]
    fn from_angle_inverts_angle() {
        for direction in [
            Vector2::new(0.3, 0.9),
            Vector2::new(-0.7, 0.2),
            Vector2::new(-0.4, -0.6),
            Vector2::new(0.5, -0.5),
        ] {
            let unit = direction.normalize();
            let restored = Vector2::from_angle(unit.angle());
            assert_close(restored.x, unit.x);
            assert_close(restored.y, unit.y);
        }
    }

    #[test]
    fn find_angle_points_from_first_to_second() {
        let heading = find_angle(Vector2::new(2.0, 2.0), Vector2::new(2.0, 7.0));
        assert_close(heading, FRAC_PI_2);
    }

    #[test]
    fn rounding_sends_halves_up() {
        assert_close(round_to_precision(0.0625), 0.063);
        assert_close(round_to_precision(-0.0625), -0.062);
        assert_close(round_to_precision(4.0), 4.0);
    }

    #[test]
    fn operators_are_componentwise() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(0.5, -3.0);
        assert_eq!(a + b, Vector2::new(1.5, -1.0));
        assert_eq!(a - b, Vector2::new(0.5, 5.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(-a, Vector2::new(-1.0, -2.0));
        assert_eq!(a.towards(b), b - a);
    }
}
