//! Deferred per-frame mutations and the frame event stream.
//!
//! [`FrameCommands`] collects everything a frame wants to do to the object
//! set while that set is being iterated: destructions (mark-then-sweep),
//! spawns (projectiles fired this frame), and outward-facing
//! [`FrameEvent`]s (sound cues, damage, pickups, level end). The level
//! applies destructions and spawns once, after the collision pass, so every
//! hook of a frame sees the same stable object set.
//!
//! # Example
//!
//! ```
//! use vesper_engine::commands::{DestroyCause, FrameCommands};
//! use vesper_engine::id::ObjectId;
//!
//! let mut cmds = FrameCommands::new();
//! let id = ObjectId::from_raw(3);
//!
//! assert!(cmds.destroy(id, DestroyCause::Impact));
//! // A second mark is ignored; the first cause wins.
//! assert!(!cmds.destroy(id, DestroyCause::Killed));
//! assert!(cmds.is_marked(id));
//! assert_eq!(cmds.pending_destroy().count(), 1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::id::ObjectId;
use crate::object::dynamic::DynamicObject;
use crate::object::player::Collectible;
use crate::object::{Faction, GameObject};

// ---------------------------------------------------------------------------
// Sound cues
// ---------------------------------------------------------------------------

/// Names of the fire-and-forget sound cues the core requests.
pub mod cue {
    pub const LEVEL_START: &str = "level_start";
    pub const PLAYER_FIRE: &str = "player_fire";
    pub const PLAYER_HURT: &str = "player_hurt";
    pub const PLAYER_JUMP: &str = "player_jump";
    pub const PLAYER_DEATH: &str = "player_death";
    pub const ARROW_FIRE: &str = "arrow_fire";
    pub const SPELL_CAST: &str = "spell_cast";
    pub const PROJECTILE_HIT: &str = "projectile_hit";
    pub const ENEMY_HURT: &str = "enemy_hurt";
    pub const ENEMY_DEATH: &str = "enemy_death";
    pub const ENEMY_ATTACK: &str = "enemy_attack";
    pub const PICKUP: &str = "pickup";
    pub const DRINK: &str = "drink";
    pub const GOAL: &str = "goal";
}

// ---------------------------------------------------------------------------
// DestroyCause
// ---------------------------------------------------------------------------

/// Why an object was removed from the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    /// A projectile hit something.
    Impact,
    /// An agent's health reached zero.
    Killed,
    /// A collectible was picked up.
    Consumed,
    /// A projectile's time-to-live ran out.
    Expired,
    /// Removed by the projectile cap to make room for a newer one.
    Evicted,
}

// ---------------------------------------------------------------------------
// FrameEvent
// ---------------------------------------------------------------------------

/// What a projectile collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactTarget {
    /// A solid static object.
    Static(ObjectId),
    /// A dynamic object: an agent or an inert mover.
    Dynamic(ObjectId),
}

/// End-of-level summary, emitted on every terminal level transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    /// Level name from the layout.
    pub level: String,
    /// Simulated seconds spent in the level.
    pub elapsed: f64,
    /// The player's score at the end of the level.
    pub score: u64,
    /// `true` when the goal was reached, `false` on game over.
    pub completed: bool,
}

/// Outward-facing things that happened during a frame.
///
/// Presentation and audio collaborators consume these; the core never calls
/// into them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameEvent {
    /// The level finished loading (or resetting) and is running.
    LevelStarted {
        /// Level name.
        level: String,
    },
    /// Request to play a named sound cue.
    Sound {
        /// Cue name (see [`cue`]).
        cue: String,
        /// Object the sound originates from, if any.
        source: Option<ObjectId>,
    },
    /// An agent lost health.
    Damaged {
        /// The agent that was hit.
        target: ObjectId,
        /// Health actually removed (after clamping).
        amount: f64,
        /// Health left.
        remaining: f64,
    },
    /// An agent regained health.
    Healed {
        /// The agent that was healed.
        target: ObjectId,
        /// Health actually restored (after clamping).
        amount: f64,
    },
    /// An object was queued for removal.
    Destroyed {
        /// The object.
        object: ObjectId,
        /// Why.
        cause: DestroyCause,
    },
    /// A new dynamic object entered the level.
    Spawned {
        /// The new object.
        object: ObjectId,
        /// Who it fights for.
        faction: Faction,
    },
    /// A projectile struck something and will be destroyed.
    ProjectileImpact {
        /// The projectile.
        projectile: ObjectId,
        /// What it hit.
        target: ImpactTarget,
    },
    /// The player picked up a collectible.
    Collected {
        /// The collectible's object id.
        item: ObjectId,
        /// What was collected.
        collectible: Collectible,
    },
    /// The player used an inventory item.
    ItemUsed {
        /// What was used.
        collectible: Collectible,
    },
    /// The player entered an info node.
    InfoShown {
        /// The info node.
        node: ObjectId,
        /// Text to display.
        text: String,
    },
    /// The player's score increased.
    ScoreAwarded {
        /// Points added.
        points: u32,
        /// New total.
        total: u64,
    },
    /// The player touched the goal.
    GoalReached {
        /// The goal object.
        goal: ObjectId,
    },
    /// The player's health reached zero.
    PlayerDied,
    /// The level reached a terminal state.
    LevelEnded {
        /// Final numbers for this level.
        summary: LevelSummary,
    },
}

// ---------------------------------------------------------------------------
// FrameCommands
// ---------------------------------------------------------------------------

/// Deferred mutations and events collected during one frame.
#[derive(Debug, Default)]
pub struct FrameCommands {
    /// Objects marked for removal, in marking order, without duplicates.
    destroy: Vec<(ObjectId, DestroyCause)>,
    /// Dynamic objects created this frame, appended after the sweep.
    spawns: Vec<DynamicObject>,
    /// Events in emission order.
    events: Vec<FrameEvent>,
}

impl FrameCommands {
    /// Create an empty command set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` for removal at the end of the frame.
    ///
    /// Returns `true` the first time an id is marked. Later marks are ignored
    /// so the first cause is the one reported.
    pub fn destroy(&mut self, id: ObjectId, cause: DestroyCause) -> bool {
        if self.is_marked(id) {
            return false;
        }
        debug!(object = %id, ?cause, "object marked for destruction");
        self.destroy.push((id, cause));
        self.events.push(FrameEvent::Destroyed { object: id, cause });
        true
    }

    /// Whether `id` has been marked for removal this frame.
    pub fn is_marked(&self, id: ObjectId) -> bool {
        self.destroy.iter().any(|(marked, _)| *marked == id)
    }

    /// Objects marked so far, in marking order.
    pub fn pending_destroy(&self) -> impl Iterator<Item = (ObjectId, DestroyCause)> + '_ {
        self.destroy.iter().copied()
    }

    /// Queue a new dynamic object. It joins the level after the sweep.
    pub fn spawn(&mut self, object: DynamicObject) {
        self.events.push(FrameEvent::Spawned {
            object: object.id(),
            faction: object.faction(),
        });
        self.spawns.push(object);
    }

    /// Objects queued for spawning this frame.
    pub fn spawned(&self) -> &[DynamicObject] {
        &self.spawns
    }

    /// Record an event.
    pub fn emit(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    /// Request a sound cue.
    pub fn sound(&mut self, cue: &str, source: Option<ObjectId>) {
        self.events.push(FrameEvent::Sound {
            cue: cue.to_owned(),
            source,
        });
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[FrameEvent] {
        &self.events
    }

    /// Drain the destruction marks.
    pub fn take_destroyed(&mut self) -> Vec<(ObjectId, DestroyCause)> {
        std::mem::take(&mut self.destroy)
    }

    /// Drain the queued spawns.
    pub fn take_spawns(&mut self) -> Vec<DynamicObject> {
        std::mem::take(&mut self.spawns)
    }

    /// Drain the events.
    pub fn take_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.destroy.is_empty() && self.spawns.is_empty() && self.events.is_empty()
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.destroy.clear();
        self.spawns.clear();
        self.events.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroy_is_idempotent_and_ordered() {
        let mut cmds = FrameCommands::new();
        let a = ObjectId::from_raw(1);
        let b = ObjectId::from_raw(2);
        assert!(cmds.destroy(b, DestroyCause::Killed));
        assert!(cmds.destroy(a, DestroyCause::Impact));
        assert!(!cmds.destroy(b, DestroyCause::Expired));

        let marked: Vec<_> = cmds.pending_destroy().collect();
        assert_eq!(marked, vec![(b, DestroyCause::Killed), (a, DestroyCause::Impact)]);

        // One Destroyed event per object, not per call.
        let destroyed = cmds
            .events()
            .iter()
            .filter(|e| matches!(e, FrameEvent::Destroyed { .. }))
            .count();
        assert_eq!(destroyed, 2);
    }

    #[test]
    fn sound_records_named_cue() {
        let mut cmds = FrameCommands::new();
        cmds.sound(cue::PICKUP, Some(ObjectId::from_raw(4)));
        assert_eq!(
            cmds.events(),
            &[FrameEvent::Sound {
                cue: "pickup".to_owned(),
                source: Some(ObjectId::from_raw(4)),
            }]
        );
    }

    #[test]
    fn take_drains_and_clear_empties() {
        let mut cmds = FrameCommands::new();
        cmds.destroy(ObjectId::from_raw(1), DestroyCause::Consumed);
        cmds.emit(FrameEvent::PlayerDied);
        assert!(!cmds.is_empty());

        assert_eq!(cmds.take_destroyed().len(), 1);
        assert_eq!(cmds.take_events().len(), 2);
        assert!(cmds.is_empty());

        cmds.emit(FrameEvent::PlayerDied);
        cmds.clear();
        assert!(cmds.is_empty());
    }
}
