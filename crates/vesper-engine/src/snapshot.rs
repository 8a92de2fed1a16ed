//! Serializable level snapshots with BLAKE3 hashing.
//!
//! [`LevelSnapshot`] is the presentation-facing view of a level: one
//! [`ObjectView`] per object (position, bounds, animation key, health,
//! effects) plus the level's clock and state. Renderers and tools read it;
//! replay compares its hash across runs to detect divergence.
//!
//! ```
//! use vesper_engine::prelude::*;
//!
//! let layout = LevelLayout::new("hash", GameMode::TopDown, Vec2::ZERO);
//! let mut a = Level::new(layout.clone(), EngineConfig::default()).unwrap();
//! let mut b = Level::new(layout, EngineConfig::default()).unwrap();
//! a.load().unwrap();
//! b.load().unwrap();
//!
//! let right = ControlIntents::moving(Vec2::RIGHT);
//! for _ in 0..30 {
//!     a.update(1.0 / 60.0, &right);
//!     b.update(1.0 / 60.0, &right);
//! }
//! assert_eq!(a.state_hash(), b.state_hash());
//! assert_eq!(a.capture_snapshot().hash.len(), 64);
//! ```
//!
//! Not captured: decision trees (fixed per archetype), the RNG stream, and
//! frame diagnostics.

use serde::{Deserialize, Serialize};
use vesper_geom::prelude::*;

use crate::id::ObjectId;
use crate::level::{Level, LevelState};
use crate::object::dynamic::DynamicObject;
use crate::object::statics::StaticObject;
use crate::object::{Effect, Faction, GameObject};

// ---------------------------------------------------------------------------
// ObjectView
// ---------------------------------------------------------------------------

/// Read-only presentation data for one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectView {
    pub id: ObjectId,
    /// Kind name (`"wall"`, `"player"`, `"archer"`, ...).
    pub kind: String,
    pub faction: Faction,
    pub position: Vec2,
    pub bounds: Aabb,
    /// `None` for static objects.
    pub velocity: Option<Vec2>,
    pub rotation: f64,
    pub animation: String,
    /// `(current, max)` for agents.
    pub health: Option<(f64, f64)>,
    pub effects: Vec<Effect>,
}

impl ObjectView {
    fn of_static(object: &StaticObject) -> Self {
        Self {
            id: object.id(),
            kind: object.kind().name().to_owned(),
            faction: object.faction(),
            position: object.position(),
            bounds: object.bounds(),
            velocity: None,
            rotation: 0.0,
            animation: object.animation().key().to_owned(),
            health: None,
            effects: Vec::new(),
        }
    }

    fn of_dynamic(object: &DynamicObject) -> Self {
        let agent = object.agent();
        Self {
            id: object.id(),
            kind: object.kind_name().to_owned(),
            faction: object.faction(),
            position: object.position(),
            bounds: object.bounds(),
            velocity: Some(object.body.velocity),
            rotation: object.body.rotation,
            animation: object.animation().key().to_owned(),
            health: agent.map(|a| (a.health(), a.max_health())),
            effects: agent.map(|a| a.effects().to_vec()).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// LevelSnapshot
// ---------------------------------------------------------------------------

/// A serializable picture of a level at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub level: String,
    pub state: LevelState,
    pub frame: u64,
    pub clock: f64,
    pub score: u64,
    /// The player first, then the other dynamic objects, then statics.
    pub objects: Vec<ObjectView>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of everything above.
    pub hash: String,
}

impl LevelSnapshot {
    /// The player's view (always the first object).
    pub fn player(&self) -> Option<&ObjectView> {
        self.objects.first()
    }

    pub fn find(&self, id: ObjectId) -> Option<&ObjectView> {
        self.objects.iter().find(|view| view.id == id)
    }
}

/// BLAKE3 hex digest of the hashable part of a snapshot.
fn compute_hash(level: &str, state: LevelState, frame: u64, clock: f64, score: u64, objects: &[ObjectView]) -> String {
    #[derive(Serialize)]
    struct HashableState<'a> {
        level: &'a str,
        state: LevelState,
        frame: u64,
        clock: f64,
        score: u64,
        objects: &'a [ObjectView],
    }

    let hashable = HashableState {
        level,
        state,
        frame,
        clock,
        score,
        objects,
    };

    // Plain data with string keys only, so serialization never errors. serde_json
    // writes non-finite floats as `null`: NaN and infinite positions hash alike.
    let json_bytes = serde_json::to_vec(&hashable).expect("level snapshot state should always be JSON-serializable");

    blake3::hash(&json_bytes).to_hex().to_string()
}

impl Level {
    /// Capture the presentation view of every live object.
    pub fn capture_snapshot(&self) -> LevelSnapshot {
        let mut objects = Vec::with_capacity(1 + self.dynamics().len() + self.statics().len());
        objects.push(ObjectView::of_dynamic(self.player()));
        objects.extend(self.dynamics().iter().map(ObjectView::of_dynamic));
        objects.extend(self.statics().iter().map(ObjectView::of_static));

        let name = self.layout().name.clone();
        let hash = compute_hash(&name, self.state(), self.frame(), self.clock(), self.score(), &objects);
        LevelSnapshot {
            level: name,
            state: self.state(),
            frame: self.frame(),
            clock: self.clock(),
            score: self.score(),
            objects,
            hash,
        }
    }

    /// BLAKE3 hex digest of the current level state.
    ///
    /// Non-finite floats are hashed as JSON `null`, so a NaN position and an
    /// infinite one produce the same digest.
    pub fn state_hash(&self) -> String {
        self.capture_snapshot().hash
    }
}
