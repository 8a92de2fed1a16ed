//! Collision testing, push-out resolution, and kinematic integration.
//!
//! A [`PhysicsEngine`] answers two questions for the level each frame: do
//! two rectangles overlap, and where does a body end up after `dt`. Two
//! engines are provided:
//!
//! - [`KinematicPhysics`] -- plain `position += velocity * dt` (top-down).
//! - [`GravityPhysics`] -- adds a constant downward acceleration to bodies
//!   that are not on the ground (platformer, side-scroller).
//!
//! Resolution helpers ([`push_out`], [`stop_on_platform`]) are free
//! functions used by solid static objects from their collision hooks.
//!
//! # Example
//!
//! ```
//! use vesper_engine::physics::{Body, GravityPhysics, PhysicsEngine};
//! use vesper_geom::prelude::*;
//!
//! let physics = GravityPhysics::new(10.0);
//! let mut body = Body::at(Vec2::new(0.0, 0.0));
//! physics.integrate(&mut body, 1.0);
//! assert_eq!(body.velocity.y, 10.0);
//! assert_eq!(body.position.y, 10.0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use vesper_geom::prelude::*;

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// Kinematic state of a dynamic game object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World position of the owner (hitboxes hang off this).
    pub position: Vec2,
    /// Velocity in pixels per second.
    pub velocity: Vec2,
    /// Facing direction. Kept unit length when set through [`face`](Self::face).
    pub orientation: Vec2,
    /// Sprite rotation in radians.
    pub rotation: f64,
    /// Set while the body rests on a solid surface. Suppresses gravity.
    pub on_ground: bool,
    /// Multiplier on the engine's gravity. 0 for projectiles.
    pub gravity_scale: f64,
}

impl Body {
    /// A body at rest at `position`, facing down the screen.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            orientation: Vec2::DOWN,
            rotation: 0.0,
            on_ground: false,
            gravity_scale: 1.0,
        }
    }

    /// Builder-style velocity override.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Turn to face `direction`. A zero direction keeps the old facing.
    pub fn face(&mut self, direction: Vec2) {
        let unit = direction.normalized();
        if unit != Vec2::ZERO {
            self.orientation = unit;
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsEngine
// ---------------------------------------------------------------------------

/// Collision testing and per-frame integration.
pub trait PhysicsEngine: fmt::Debug + Send + Sync {
    /// Short name for logs and snapshots.
    fn name(&self) -> &'static str;

    /// Strict AABB overlap. Symmetric; degenerate rectangles never collide.
    fn detect_collision(&self, a: &Aabb, b: &Aabb) -> bool {
        a.overlaps(b)
    }

    /// Advance `body` by `dt` seconds.
    fn integrate(&self, body: &mut Body, dt: f64);

    /// Downward acceleration applied to ungrounded bodies (0 if none).
    fn gravity(&self) -> f64 {
        0.0
    }
}

/// Velocity-only integration, no gravity.
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicPhysics;

impl PhysicsEngine for KinematicPhysics {
    fn name(&self) -> &'static str {
        "kinematic"
    }

    fn integrate(&self, body: &mut Body, dt: f64) {
        body.position += body.velocity * dt;
    }
}

/// Integration with constant downward acceleration.
///
/// Bodies with `on_ground` set are not accelerated; their vertical velocity is
/// left as is.
#[derive(Debug, Clone, Copy)]
pub struct GravityPhysics {
    acceleration: f64,
}

impl GravityPhysics {
    /// Gravity of `acceleration` pixels per second squared (positive is down).
    pub fn new(acceleration: f64) -> Self {
        Self { acceleration }
    }
}

impl PhysicsEngine for GravityPhysics {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn integrate(&self, body: &mut Body, dt: f64) {
        if !body.on_ground {
            body.velocity.y += self.acceleration * body.gravity_scale * dt;
        }
        body.position += body.velocity * dt;
    }

    fn gravity(&self) -> f64 {
        self.acceleration
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Axis a push-out resolved along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushAxis {
    Horizontal,
    Vertical,
}

/// Push a body out of an immovable solid along the axis of smaller overlap.
///
/// The mover's edge is placed on the solid's edge on the side its center lies
/// (ties go to the right / below), and the velocity component on that axis is
/// zeroed. A push upward marks the body as standing on ground.
///
/// Returns `None` when the rectangles do not overlap.
pub fn push_out(solid: &Aabb, body: &mut Body, hitbox: &Hitbox) -> Option<PushAxis> {
    let mover = hitbox.bounds(body.position);
    if !solid.overlaps(&mover) {
        return None;
    }
    let overlap = solid.overlap_extents(&mover);
    let offset = hitbox.offset();
    let size = hitbox.dimensions();

    if overlap.x < overlap.y {
        body.position.x = if mover.center().x >= solid.center().x {
            solid.right() - offset.x
        } else {
            solid.left() - size.x - offset.x
        };
        body.velocity.x = 0.0;
        Some(PushAxis::Horizontal)
    } else {
        if mover.center().y >= solid.center().y {
            body.position.y = solid.bottom() - offset.y;
        } else {
            body.position.y = solid.top() - size.y - offset.y;
            body.on_ground = true;
        }
        body.velocity.y = 0.0;
        Some(PushAxis::Vertical)
    }
}

/// Floor/ceiling rule for platform walls.
///
/// `mover` is the mover's rectangle as it was when the contact was detected.
/// Landing: the mover's top is above the wall's top and it is falling.
/// Ceiling: the mover's top is below the wall's top and it is rising.
/// Either case zeroes vertical velocity.
pub fn stop_on_platform(wall: &Aabb, mover: &Aabb, body: &mut Body) {
    let landing = mover.top() < wall.top() && body.velocity.y > 0.0;
    let ceiling = mover.top() > wall.top() && body.velocity.y < 0.0;
    if landing || ceiling {
        body.velocity.y = 0.0;
    }
}

/// Thin strip centred on the bottom edge of a hitbox, inset horizontally so
/// walls beside the body do not register as ground.
pub fn ground_sensor(hitbox: &Hitbox, position: Vec2, depth: f64) -> Aabb {
    let bounds = hitbox.bounds(position);
    let inset = bounds.size.x * 0.1;
    Aabb::from_xywh(
        bounds.left() + inset,
        bounds.bottom() - depth,
        bounds.size.x - 2.0 * inset,
        2.0 * depth,
    )
}

/// Whether a ground sensor rests on `solid`: they overlap and the solid's top
/// edge lies within the sensor strip.
pub fn sensor_touches(sensor: &Aabb, solid: &Aabb) -> bool {
    sensor.overlaps(solid) && solid.top() >= sensor.top() && solid.top() < sensor.bottom()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_mover(x: f64, y: f64, velocity: Vec2) -> (Body, Hitbox) {
        (Body::at(Vec2::new(x, y)).with_velocity(velocity), Hitbox::sized(1.0, 1.0))
    }

    #[test]
    fn kinematic_integration_moves_by_velocity() {
        let mut body = Body::at(Vec2::new(1.0, 2.0)).with_velocity(Vec2::new(3.0, -4.0));
        KinematicPhysics.integrate(&mut body, 0.5);
        assert_eq!(body.position, Vec2::new(2.5, 0.0));
        assert_eq!(body.velocity, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn gravity_adds_exactly_g_per_second_from_rest() {
        let g = 9.81;
        let physics = GravityPhysics::new(g);
        let mut body = Body::at(Vec2::ZERO);
        physics.integrate(&mut body, 1.0);
        assert_eq!(body.velocity.y, g);
    }

    #[test]
    fn grounded_body_is_not_accelerated() {
        let physics = GravityPhysics::new(100.0);
        let mut body = Body::at(Vec2::ZERO).with_velocity(Vec2::new(0.0, 5.0));
        body.on_ground = true;
        physics.integrate(&mut body, 1.0);
        // Velocity kept, not zeroed, not accelerated.
        assert_eq!(body.velocity.y, 5.0);
        assert_eq!(body.position.y, 5.0);
    }

    #[test]
    fn zero_gravity_scale_ignores_gravity() {
        let physics = GravityPhysics::new(100.0);
        let mut body = Body::at(Vec2::ZERO).with_velocity(Vec2::new(10.0, 0.0));
        body.gravity_scale = 0.0;
        physics.integrate(&mut body, 0.5);
        assert_eq!(body.velocity, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn engines_share_detection() {
        let a = Aabb::from_xywh(0.0, 0.0, 2.0, 2.0);
        let b = Aabb::from_xywh(1.0, 1.0, 2.0, 2.0);
        assert!(KinematicPhysics.detect_collision(&a, &b));
        assert!(GravityPhysics::new(1.0).detect_collision(&b, &a));
        assert!(!KinematicPhysics.detect_collision(&a, &Aabb::from_xywh(2.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn push_out_horizontal_leaves_no_overlap() {
        let wall = Aabb::from_xywh(0.0, 0.0, 1.0, 1.0);
        let (mut body, hitbox) = unit_mover(0.9, 0.0, Vec2::new(-5.0, 0.0));

        assert_eq!(push_out(&wall, &mut body, &hitbox), Some(PushAxis::Horizontal));

        let bounds = hitbox.bounds(body.position);
        assert_eq!(bounds.left(), wall.right());
        assert_eq!(body.velocity.x, 0.0);
        assert!(!wall.overlaps(&bounds));
    }

    #[test]
    fn push_out_left_side() {
        let wall = Aabb::from_xywh(10.0, 0.0, 10.0, 10.0);
        let (mut body, hitbox) = unit_mover(9.5, 4.0, Vec2::new(3.0, 1.0));
        push_out(&wall, &mut body, &hitbox);
        assert_eq!(hitbox.bounds(body.position).right(), 10.0);
        assert_eq!(body.velocity, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn push_out_vertical_upward_sets_ground() {
        let floor = Aabb::from_xywh(0.0, 10.0, 100.0, 10.0);
        let (mut body, hitbox) = unit_mover(50.0, 9.75, Vec2::new(2.0, 40.0));
        assert_eq!(push_out(&floor, &mut body, &hitbox), Some(PushAxis::Vertical));
        assert_eq!(hitbox.bounds(body.position).bottom(), 10.0);
        assert_eq!(body.velocity, Vec2::new(2.0, 0.0));
        assert!(body.on_ground);
    }

    #[test]
    fn push_out_downward_from_ceiling() {
        let ceiling = Aabb::from_xywh(0.0, 0.0, 100.0, 10.0);
        let (mut body, hitbox) = unit_mover(50.0, 9.5, Vec2::new(0.0, -40.0));
        push_out(&ceiling, &mut body, &hitbox);
        assert_eq!(hitbox.bounds(body.position).top(), 10.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn push_out_respects_hitbox_offset() {
        let wall = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let hitbox = Hitbox::new(Vec2::new(4.0, 2.0), Vec2::new(4.0, 20.0));
        // Hitbox spans x 8..12, overlapping the wall by 2 on x.
        let mut body = Body::at(Vec2::new(4.0, -5.0));
        push_out(&wall, &mut body, &hitbox);
        assert_eq!(body.position.x, 6.0);
        assert_eq!(hitbox.bounds(body.position).left(), 10.0);
    }

    #[test]
    fn push_out_without_overlap_is_noop() {
        let wall = Aabb::from_xywh(0.0, 0.0, 1.0, 1.0);
        let (mut body, hitbox) = unit_mover(1.0, 0.0, Vec2::new(-1.0, 0.0));
        assert_eq!(push_out(&wall, &mut body, &hitbox), None);
        assert_eq!(body.position, Vec2::new(1.0, 0.0));
        assert_eq!(body.velocity.x, -1.0);
    }

    #[test]
    fn platform_landing_and_ceiling() {
        let wall = Aabb::from_xywh(0.0, 10.0, 20.0, 4.0);

        let mut falling = Body::at(Vec2::ZERO).with_velocity(Vec2::new(0.0, 50.0));
        stop_on_platform(&wall, &Aabb::from_xywh(5.0, 2.0, 4.0, 9.0), &mut falling);
        assert_eq!(falling.velocity.y, 0.0);

        let mut rising = Body::at(Vec2::ZERO).with_velocity(Vec2::new(0.0, -50.0));
        stop_on_platform(&wall, &Aabb::from_xywh(5.0, 13.0, 4.0, 9.0), &mut rising);
        assert_eq!(rising.velocity.y, 0.0);

        // Clipping the corner from below still counts as a ceiling.
        let mut corner = Body::at(Vec2::ZERO).with_velocity(Vec2::new(0.0, -50.0));
        stop_on_platform(&wall, &Aabb::from_xywh(19.5, 11.0, 4.0, 2.0), &mut corner);
        assert_eq!(corner.velocity.y, 0.0);

        // Rising with the top edge already above the wall's top keeps the jump.
        let mut clearing = Body::at(Vec2::ZERO).with_velocity(Vec2::new(0.0, -50.0));
        stop_on_platform(&wall, &Aabb::from_xywh(19.5, 8.0, 4.0, 4.0), &mut clearing);
        assert_eq!(clearing.velocity.y, -50.0);

        // Moving away from the wall is never stopped.
        let mut leaving = Body::at(Vec2::ZERO).with_velocity(Vec2::new(0.0, 50.0));
        stop_on_platform(&wall, &Aabb::from_xywh(5.0, 13.0, 4.0, 9.0), &mut leaving);
        assert_eq!(leaving.velocity.y, 50.0);
    }

    #[test]
    fn ground_sensor_detects_floor_under_feet() {
        let hitbox = Hitbox::sized(10.0, 20.0);
        let sensor = ground_sensor(&hitbox, Vec2::new(0.0, 0.0), 1.0);
        assert_eq!(sensor.top(), 19.0);
        assert_eq!(sensor.bottom(), 21.0);

        let floor = Aabb::from_xywh(-50.0, 20.0, 100.0, 10.0);
        assert!(sensor_touches(&sensor, &floor));

        // A wall beside the body, with its top above the sensor, is not ground.
        let wall = Aabb::from_xywh(-10.0, -30.0, 10.5, 60.0);
        assert!(!sensor_touches(&sensor, &wall));

        // A floor too far below is not touched.
        let low = Aabb::from_xywh(-50.0, 22.0, 100.0, 10.0);
        assert!(!sensor_touches(&sensor, &low));
    }

    #[test]
    fn face_ignores_zero_direction() {
        let mut body = Body::at(Vec2::ZERO);
        body.face(Vec2::new(3.0, 0.0));
        assert_eq!(body.orientation, Vec2::RIGHT);
        body.face(Vec2::ZERO);
        assert_eq!(body.orientation, Vec2::RIGHT);
    }
}
