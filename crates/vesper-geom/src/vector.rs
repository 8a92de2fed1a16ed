//! Two-dimensional vector value type.
//!
//! [`Vec2`] is a plain `Copy` value. Every operation returns a new vector;
//! nothing mutates in place except explicit reassignment by the owner of a
//! field (for example a body's velocity).

use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector in screen space (+x right, +y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component (grows downward).
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// Unit vector pointing up the screen.
    pub const UP: Self = Self { x: 0.0, y: -1.0 };
    /// Unit vector pointing down the screen.
    pub const DOWN: Self = Self { x: 0.0, y: 1.0 };
    /// Unit vector pointing left.
    pub const LEFT: Self = Self { x: -1.0, y: 0.0 };
    /// Unit vector pointing right.
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0 };

    /// Construct a vector from its components.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians from the +x axis.
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[inline]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Distance between two points.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction.
    ///
    /// The zero vector and non-finite vectors normalize to [`Vec2::ZERO`].
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len)
    }

    /// This vector rotated by `angle` radians (positive turns from +x toward
    /// +y, i.e. clockwise on screen).
    pub fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Angle of this vector from the +x axis, in `(-π, π]`.
    #[inline]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Signed angle that rotates `self` onto `other`, in `(-π, π]`.
    ///
    /// Returns 0 when either vector is zero.
    pub fn signed_angle_to(self, other: Self) -> f64 {
        if self.length_squared() == 0.0 || other.length_squared() == 0.0 {
            return 0.0;
        }
        let angle = self.cross(other).atan2(self.dot(other));
        // atan2 yields -π for the exact antiparallel case; fold into (-π, π].
        if angle <= -PI {
            PI
        } else {
            angle
        }
    }

    /// Whether both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Copy with the x component replaced.
    #[inline]
    pub fn with_x(self, x: f64) -> Self {
        Self::new(x, self.y)
    }

    /// Copy with the y component replaced.
    #[inline]
    pub fn with_y(self, y: f64) -> Self {
        Self::new(self.x, y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-12;

    #[test]
    fn arithmetic_returns_new_values() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -4.0);
        assert_eq!(a + b, Vec2::new(4.0, -2.0));
        assert_eq!(a - b, Vec2::new(-2.0, 6.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
        // Operands are untouched.
        assert_eq!(a, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn normalize_unit_length() {
        let n = Vec2::new(3.0, 4.0).normalized();
        assert!((n.length() - 1.0).abs() < EPS);
        assert!((n.x - 0.6).abs() < EPS);
        assert!((n.y - 0.8).abs() < EPS);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        assert_eq!(Vec2::new(f64::NAN, 1.0).normalized(), Vec2::ZERO);
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = Vec2::RIGHT.rotated(FRAC_PI_2);
        assert!((r.x - 0.0).abs() < EPS);
        assert!((r.y - 1.0).abs() < EPS);
    }

    #[test]
    fn signed_angle_sign_follows_rotation() {
        let a = Vec2::RIGHT;
        assert!((a.signed_angle_to(Vec2::DOWN) - FRAC_PI_2).abs() < EPS);
        assert!((a.signed_angle_to(Vec2::UP) + FRAC_PI_2).abs() < EPS);
        assert_eq!(a.signed_angle_to(a), 0.0);
    }

    #[test]
    fn signed_angle_antiparallel_is_positive_pi() {
        let angle = Vec2::RIGHT.signed_angle_to(Vec2::LEFT);
        assert!((angle - PI).abs() < EPS);
    }

    #[test]
    fn signed_angle_with_zero_vector() {
        assert_eq!(Vec2::ZERO.signed_angle_to(Vec2::RIGHT), 0.0);
        assert_eq!(Vec2::RIGHT.signed_angle_to(Vec2::ZERO), 0.0);
    }

    #[test]
    fn distance_and_angle() {
        assert!((Vec2::new(0.0, 0.0).distance(Vec2::new(3.0, 4.0)) - 5.0).abs() < EPS);
        assert!((Vec2::DOWN.angle() - FRAC_PI_2).abs() < EPS);
        let v = Vec2::from_angle(1.0);
        assert!((v.angle() - 1.0).abs() < EPS);
    }
}
