//! Property tests for rectangle overlap and vector helpers.
//!
//! These tests use `proptest` to generate random rectangles and vectors and
//! verify the invariants the collision code depends on.

use proptest::prelude::*;
use vesper_geom::prelude::*;

/// Strategy that generates finite coordinates on a coarse grid so edge
/// coincidences (touching rectangles) actually occur.
fn coord() -> impl Strategy<Value = f64> {
    (-200i32..200i32).prop_map(|v| v as f64 * 0.5)
}

/// Sizes include zero and negative values to exercise degenerate input.
fn extent() -> impl Strategy<Value = f64> {
    (-4i32..80i32).prop_map(|v| v as f64 * 0.5)
}

fn aabb() -> impl Strategy<Value = Aabb> {
    (coord(), coord(), extent(), extent()).prop_map(|(x, y, w, h)| Aabb::from_xywh(x, y, w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5_000))]

    #[test]
    fn overlap_is_symmetric(a in aabb(), b in aabb()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn overlap_implies_positive_extents(a in aabb(), b in aabb()) {
        if a.overlaps(&b) {
            let e = a.overlap_extents(&b);
            prop_assert!(e.x > 0.0 && e.y > 0.0);
        }
    }

    #[test]
    fn touching_neighbour_never_overlaps(a in aabb(), w in extent(), h in extent()) {
        let right = Aabb::from_xywh(a.right(), a.top(), w, h);
        let below = Aabb::from_xywh(a.left(), a.bottom(), w, h);
        prop_assert!(!a.overlaps(&right));
        prop_assert!(!a.overlaps(&below));
    }

    #[test]
    fn degenerate_overlaps_nothing(a in aabb(), b in aabb()) {
        if a.is_degenerate() {
            prop_assert!(!a.overlaps(&b));
        }
    }

    #[test]
    fn rotation_preserves_length(x in coord(), y in coord(), angle in -10.0f64..10.0) {
        let v = Vec2::new(x, y);
        prop_assert!((v.rotated(angle).length() - v.length()).abs() < 1e-9);
    }

    #[test]
    fn signed_angle_stays_in_range(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
        let angle = Vec2::new(ax, ay).signed_angle_to(Vec2::new(bx, by));
        prop_assert!(angle > -std::f64::consts::PI - 1e-12);
        prop_assert!(angle <= std::f64::consts::PI);
    }

    #[test]
    fn rotating_by_signed_angle_aligns_directions(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        prop_assume!(a.length() > 1.0 && b.length() > 1.0);
        let turned = a.rotated(a.signed_angle_to(b)).normalized();
        let target = b.normalized();
        prop_assert!((turned - target).length() < 1e-9);
    }
}

#[test]
fn hitbox_serializes_through_json() {
    let hitbox = Hitbox::new(Vec2::new(6.0, 8.0), Vec2::new(20.0, 24.0));
    let json = serde_json::to_string(&hitbox).unwrap();
    let back: Hitbox = serde_json::from_str(&json).unwrap();
    assert_eq!(back, hitbox);
}
