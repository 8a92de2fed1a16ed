//! Axis-aligned rectangles and owner-anchored hitboxes.
//!
//! An [`Aabb`] is a world-space rectangle. A [`Hitbox`] is the *local*
//! description of a collision volume (offset + dimensions); its world
//! rectangle is always derived from the owner's current position via
//! [`Hitbox::bounds`], so a moving object and its collision volume can never
//! drift apart.

use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

/// World-space axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner.
    pub min: Vec2,
    /// Width (`x`) and height (`y`).
    pub size: Vec2,
}

impl Aabb {
    /// Construct from top-left corner and size.
    #[inline]
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Construct from `(x, y, width, height)`.
    #[inline]
    pub const fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.min.y + self.size.y
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.min.x + self.size.x * 0.5, self.min.y + self.size.y * 0.5)
    }

    /// A rectangle with a non-positive (or NaN) width or height.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Strict interval overlap on both axes.
    ///
    /// Touching edges do not overlap, and degenerate rectangles never overlap
    /// anything. The test is symmetric.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Overlap extents `(x_overlap, y_overlap)`.
    ///
    /// Components are negative or zero when the rectangles are separated on
    /// that axis.
    pub fn overlap_extents(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.right().min(other.right()) - self.left().max(other.left()),
            self.bottom().min(other.bottom()) - self.top().max(other.top()),
        )
    }

    /// Whether `point` lies strictly inside the rectangle.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x > self.left() && point.x < self.right() && point.y > self.top() && point.y < self.bottom()
    }

    /// Copy moved by `delta`.
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.min + delta, self.size)
    }
}

// ---------------------------------------------------------------------------
// Hitbox
// ---------------------------------------------------------------------------

/// Collision volume attached to an owner at a fixed local offset.
///
/// Offset and dimensions are set at construction and change only through
/// [`resize`](Self::resize).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hitbox {
    offset: Vec2,
    dimensions: Vec2,
}

impl Hitbox {
    /// A hitbox at `offset` from the owner position with the given size.
    pub const fn new(offset: Vec2, dimensions: Vec2) -> Self {
        Self { offset, dimensions }
    }

    /// A hitbox anchored at the owner position (zero offset).
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Local offset from the owner position.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Width and height.
    #[inline]
    pub fn dimensions(&self) -> Vec2 {
        self.dimensions
    }

    /// Explicitly change the collision volume.
    pub fn resize(&mut self, offset: Vec2, dimensions: Vec2) {
        self.offset = offset;
        self.dimensions = dimensions;
    }

    /// World-space rectangle for an owner at `owner_position`.
    #[inline]
    pub fn bounds(&self, owner_position: Vec2) -> Aabb {
        Aabb::new(owner_position + self.offset, self.dimensions)
    }

    /// Owner position that places this hitbox's top-left corner at `corner`.
    #[inline]
    pub fn owner_position_for(&self, corner: Vec2) -> Vec2 {
        corner - self.offset
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rectangles_collide() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_xywh(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Aabb::from_xywh(0.0, 0.0, 1.0, 1.0);
        let right = Aabb::from_xywh(1.0, 0.0, 1.0, 1.0);
        let below = Aabb::from_xywh(0.0, 1.0, 1.0, 1.0);
        let corner = Aabb::from_xywh(1.0, 1.0, 1.0, 1.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
        assert!(!a.overlaps(&corner));
    }

    #[test]
    fn degenerate_never_collides() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Aabb::from_xywh(2.0, 2.0, 0.0, 3.0)));
        assert!(!a.overlaps(&Aabb::from_xywh(2.0, 2.0, 3.0, -1.0)));
        assert!(!Aabb::from_xywh(2.0, 2.0, -3.0, 3.0).overlaps(&a));
    }

    #[test]
    fn overlap_extents_match_intervals() {
        let wall = Aabb::from_xywh(0.0, 0.0, 1.0, 1.0);
        let mover = Aabb::from_xywh(0.9, 0.0, 1.0, 1.0);
        let extents = wall.overlap_extents(&mover);
        assert!((extents.x - 0.1).abs() < 1e-12);
        assert_eq!(extents.y, 1.0);
    }

    #[test]
    fn bounds_follow_owner_position() {
        let hitbox = Hitbox::new(Vec2::new(2.0, 4.0), Vec2::new(8.0, 6.0));
        let b = hitbox.bounds(Vec2::new(10.0, 20.0));
        assert_eq!(b, Aabb::from_xywh(12.0, 24.0, 8.0, 6.0));
        let moved = hitbox.bounds(Vec2::new(0.0, 0.0));
        assert_eq!(moved.min, Vec2::new(2.0, 4.0));
    }

    #[test]
    fn resize_changes_volume() {
        let mut hitbox = Hitbox::sized(32.0, 32.0);
        hitbox.resize(Vec2::new(0.0, 16.0), Vec2::new(32.0, 16.0));
        assert_eq!(hitbox.offset(), Vec2::new(0.0, 16.0));
        assert_eq!(hitbox.dimensions(), Vec2::new(32.0, 16.0));
        assert_eq!(hitbox.owner_position_for(Vec2::new(5.0, 21.0)), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn edges_and_center() {
        let b = Aabb::from_xywh(1.0, 2.0, 4.0, 6.0);
        assert_eq!(b.left(), 1.0);
        assert_eq!(b.right(), 5.0);
        assert_eq!(b.top(), 2.0);
        assert_eq!(b.bottom(), 8.0);
        assert_eq!(b.center(), Vec2::new(3.0, 5.0));
        assert!(b.contains_point(Vec2::new(2.0, 3.0)));
        assert!(!b.contains_point(Vec2::new(1.0, 3.0)));
    }
}
