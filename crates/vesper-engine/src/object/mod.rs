//! The game-object hierarchy.
//!
//! Every object in a level is either a [`StaticObject`](statics::StaticObject)
//! (immobile scenery, hazards, collectibles) or a
//! [`DynamicObject`](dynamic::DynamicObject) (bodies that move: the player,
//! enemies, projectiles, inert movers). Both implement [`GameObject`] for the
//! read-only capability set and [`CollisionResponse`] for the two collision
//! hooks the level dispatches during the narrow phase.
//!
//! Agents (the player and enemies) additionally carry an
//! [`Agent`](agent::Agent) block with health and timed [`Effect`]s.

pub mod agent;
pub mod dynamic;
pub mod enemy;
pub mod player;
pub mod projectile;
pub mod statics;

use serde::{Deserialize, Serialize};
use vesper_geom::prelude::*;

use crate::commands::FrameCommands;
use crate::id::ObjectId;

use self::dynamic::DynamicObject;
use self::statics::StaticObject;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Read-only capabilities shared by every game object.
pub trait GameObject {
    fn id(&self) -> ObjectId;

    /// World position of the owner. The hitbox hangs off this point.
    fn position(&self) -> Vec2;

    fn hitbox(&self) -> &Hitbox;

    /// Current world-space collision rectangle.
    fn bounds(&self) -> Aabb {
        self.hitbox().bounds(self.position())
    }

    fn animation(&self) -> &Animation;

    /// Solid objects block movement and stop projectiles.
    fn is_solid(&self) -> bool;

    fn is_player(&self) -> bool {
        false
    }

    fn faction(&self) -> Faction {
        Faction::Neutral
    }
}

/// The two collision hooks.
///
/// Hooks run while the level iterates its object sets, so they never add or
/// remove objects directly. Removals and spawns go through
/// [`FrameCommands`].
pub trait CollisionResponse {
    fn collide_with_static(&mut self, other: &mut StaticObject, commands: &mut FrameCommands);

    fn collide_with_dynamic(&mut self, other: &mut DynamicObject, commands: &mut FrameCommands);
}

// ---------------------------------------------------------------------------
// Faction
// ---------------------------------------------------------------------------

/// Which side an object fights for.
///
/// Projectiles never detonate on objects of their own faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
    Neutral,
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// Animation state key plus time spent in that state.
///
/// The core only picks the key; frame selection belongs to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    key: String,
    elapsed: f64,
}

impl Animation {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            elapsed: 0.0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Seconds since the key last changed.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Switch to `key`. The timer restarts only when the key actually changes.
    pub fn set(&mut self, key: &str) {
        if self.key != key {
            self.key.clear();
            self.key.push_str(key);
            self.elapsed = 0.0;
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new("idle")
    }
}

/// Cardinal suffix for animation keys (`walk_left`, `attack_down`, ...).
///
/// Horizontal wins only when `|x| > |y|` strictly. Screen space: positive y
/// is `down`.
pub fn direction_suffix(direction: Vec2) -> &'static str {
    if direction.x.abs() > direction.y.abs() {
        if direction.x > 0.0 {
            "right"
        } else {
            "left"
        }
    } else if direction.y > 0.0 {
        "down"
    } else {
        "up"
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Timed status effects an agent can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Visual flash after taking damage.
    DamageFlash,
    /// Ignores contact and projectile damage while active.
    Invulnerable,
    /// Visual glow after drinking a potion.
    Healing,
}

/// An active effect with its remaining lifetime in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub remaining: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_timer_restarts_on_key_change_only() {
        let mut anim = Animation::new("walk_down");
        anim.advance(0.5);
        anim.set("walk_down");
        assert_eq!(anim.elapsed(), 0.5);
        anim.set("attack_left");
        assert_eq!(anim.key(), "attack_left");
        assert_eq!(anim.elapsed(), 0.0);
    }

    #[test]
    fn suffix_prefers_vertical_on_ties() {
        assert_eq!(direction_suffix(Vec2::new(2.0, 1.0)), "right");
        assert_eq!(direction_suffix(Vec2::new(-2.0, 1.0)), "left");
        assert_eq!(direction_suffix(Vec2::new(1.0, 1.0)), "down");
        assert_eq!(direction_suffix(Vec2::new(1.0, -1.0)), "up");
        assert_eq!(direction_suffix(Vec2::ZERO), "up");
    }
}
