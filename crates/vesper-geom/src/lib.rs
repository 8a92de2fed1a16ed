//! Vesper Geom -- vector and rectangle primitives for the Vesper engine.
//!
//! This crate is the leaf of the workspace: a [`Vec2`](vector::Vec2) value
//! type, world-space [`Aabb`](hitbox::Aabb) rectangles, and owner-anchored
//! [`Hitbox`](hitbox::Hitbox)es. Everything here is total: malformed input
//! (negative sizes, NaN) degrades to "no overlap" instead of erroring.
//!
//! # Quick Start
//!
//! ```
//! use vesper_geom::prelude::*;
//!
//! let hitbox = Hitbox::new(Vec2::new(4.0, 8.0), Vec2::new(24.0, 24.0));
//! let a = hitbox.bounds(Vec2::new(0.0, 0.0));
//! let b = hitbox.bounds(Vec2::new(20.0, 0.0));
//!
//! assert!(a.overlaps(&b));
//! assert_eq!(a.overlaps(&b), b.overlaps(&a));
//! ```

#![deny(unsafe_code)]

pub mod hitbox;
pub mod vector;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::hitbox::{Aabb, Hitbox};
    pub use crate::vector::Vec2;
}
