//! Arrows, bolts, and homing spells.

use serde::{Deserialize, Serialize};
use vesper_geom::prelude::*;

use super::Faction;

/// Steering parameters for a homing projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homing {
    /// Maximum turn in radians per second.
    pub turn_rate: f64,
}

/// Projectile-specific state of a [`DynamicObject`](super::dynamic::DynamicObject).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub faction: Faction,
    pub damage: f64,
    /// Seconds left before the projectile expires.
    pub ttl: f64,
    pub homing: Option<Homing>,
}

impl Projectile {
    pub fn new(faction: Faction, damage: f64, ttl: f64) -> Self {
        Self {
            faction,
            damage,
            ttl,
            homing: None,
        }
    }

    pub fn homing(mut self, turn_rate: f64) -> Self {
        self.homing = Some(Homing { turn_rate });
        self
    }

    /// Count down the lifetime. Returns `true` once it has run out.
    pub fn age(&mut self, dt: f64) -> bool {
        self.ttl -= dt;
        self.ttl <= 0.0
    }
}

/// Turn `velocity` toward `desired`, by at most `max_turn` radians.
///
/// Speed is preserved. A zero velocity or desired direction leaves the
/// velocity unchanged.
pub fn steer(velocity: Vec2, desired: Vec2, max_turn: f64) -> Vec2 {
    if velocity == Vec2::ZERO || desired == Vec2::ZERO {
        return velocity;
    }
    let angle = velocity.signed_angle_to(desired);
    let limit = max_turn.abs();
    velocity.rotated(angle.clamp(-limit, limit))
}
