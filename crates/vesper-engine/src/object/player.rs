//! The user-controlled agent.
//!
//! A [`Player`] owns everything the level needs to turn [`ControlIntents`]
//! into motion: speed, firing cooldown, inventory, score, and (in gravity modes)
//! platformer controls with a ground sensor and coyote-time tracker.
//!
//! [`ControlIntents`]: crate::input::ControlIntents

use serde::{Deserialize, Serialize};

use super::agent::{Agent, Cooldown};
use crate::config::PlayerTuning;

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Something the player can pick up and carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collectible {
    Potion {
        /// Health restored on use.
        heal: f64,
    },
}

/// Carried collectibles, in pickup order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Collectible>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Collectible) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[Collectible] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove and return the potion that heals the most. Earlier pickups win
    /// ties.
    pub fn take_strongest_potion(&mut self) -> Option<Collectible> {
        let mut best: Option<(usize, f64)> = None;
        for (index, item) in self.items.iter().enumerate() {
            let Collectible::Potion { heal } = *item;
            if best.map_or(true, |(_, top)| heal > top) {
                best = Some((index, heal));
            }
        }
        best.map(|(index, _)| self.items.remove(index))
    }
}

// ---------------------------------------------------------------------------
// Coyote time
// ---------------------------------------------------------------------------

/// Remembers the last moment the ground sensor reported contact.
///
/// The player counts as grounded for `grace` seconds after leaving a ledge,
/// so a jump pressed slightly late still fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoyoteTracker {
    grace: f64,
    last_grounded_at: Option<f64>,
}

impl CoyoteTracker {
    pub fn new(grace: f64) -> Self {
        Self {
            grace,
            last_grounded_at: None,
        }
    }

    /// Record ground contact at time `now`.
    pub fn touch(&mut self, now: f64) {
        self.last_grounded_at = Some(now);
    }

    /// Grounded at `now`: contact was reported less than `grace` seconds ago.
    pub fn is_grounded(&self, now: f64) -> bool {
        self.last_grounded_at
            .map_or(false, |at| now >= at && now < at + self.grace)
    }

    /// Spend the grace window (a jump was taken).
    pub fn consume(&mut self) {
        self.last_grounded_at = None;
    }

    pub fn grace(&self) -> f64 {
        self.grace
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// How movement intents are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Controls {
    /// Free 2D movement, no jumping.
    TopDown,
    /// Horizontal movement plus jumping with coyote time.
    Platformer {
        jump_speed: f64,
        coyote: CoyoteTracker,
    },
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// State carried from one level to the next within a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerCarry {
    pub score: u64,
    pub inventory: Inventory,
}

/// Player-specific state of the player's [`DynamicObject`].
///
/// [`DynamicObject`]: super::dynamic::DynamicObject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub agent: Agent,
    pub controls: Controls,
    pub tuning: PlayerTuning,
    pub fire: Cooldown,
    pub inventory: Inventory,
    pub score: u64,
    /// Invulnerability granted after each hit, in seconds.
    pub invulnerability_time: f64,
}

impl Player {
    pub fn new(tuning: PlayerTuning, controls: Controls, invulnerability_time: f64) -> Self {
        Self {
            agent: Agent::new(tuning.max_health),
            fire: Cooldown::new(tuning.fire_cooldown),
            controls,
            tuning,
            inventory: Inventory::new(),
            score: 0,
            invulnerability_time,
        }
    }

    /// Restore score and inventory from a previous level.
    pub fn with_carry(mut self, carry: PlayerCarry) -> Self {
        self.score = carry.score;
        self.inventory = carry.inventory;
        self
    }

    pub fn carry(&self) -> PlayerCarry {
        PlayerCarry {
            score: self.score,
            inventory: self.inventory.clone(),
        }
    }

    pub fn is_platformer(&self) -> bool {
        matches!(self.controls, Controls::Platformer { .. })
    }

    /// Grounded for jumping purposes. Always `false` for top-down controls.
    pub fn is_grounded(&self, now: f64) -> bool {
        match &self.controls {
            Controls::TopDown => false,
            Controls::Platformer { coyote, .. } => coyote.is_grounded(now),
        }
    }

    pub fn award(&mut self, points: u32) -> u64 {
        self.score = self.score.saturating_add(u64::from(points));
        self.score
    }
}
