//! Vesper Engine -- real-time simulation core for tile-free 2D action games.
//!
//! The engine runs one [`Level`](level::Level) at a time. Each
//! [`update`](level::Level::update) consumes the frame's
//! [`ControlIntents`](input::ControlIntents), runs enemy decision trees,
//! integrates bodies through the level's [`PhysicsEngine`](physics::PhysicsEngine),
//! resolves collisions via the objects' hooks, and sweeps destroyed objects.
//! Everything the outside world needs to react to (sound cues, damage,
//! pickups, level end) comes back as [`FrameEvent`](commands::FrameEvent)s.
//!
//! # Quick Start
//!
//! ```
//! use vesper_engine::prelude::*;
//!
//! let layout = LevelLayout::new("yard", GameMode::TopDown, Vec2::new(0.0, 0.0))
//!     .with_static(StaticKind::Wall, 100.0, -50.0, 20.0, 100.0);
//! let mut level = Level::new(layout, EngineConfig::default()).unwrap();
//! level.load().unwrap();
//!
//! let push_right = ControlIntents::moving(Vec2::RIGHT);
//! for _ in 0..120 {
//!     level.update(1.0 / 60.0, &push_right);
//! }
//!
//! // The wall stops the player at its left edge.
//! let wall = level.statics()[0].bounds();
//! assert_eq!(level.player().bounds().right(), wall.left());
//! ```

#![deny(unsafe_code)]

pub mod behavior;
pub mod commands;
pub mod config;
pub mod decision;
pub mod id;
pub mod input;
pub mod level;
pub mod logging;
pub mod object;
pub mod physics;
pub mod replay;
pub mod scoreboard;
pub mod session;
pub mod snapshot;

/// Re-export the geometry crate for convenience.
pub use vesper_geom;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while loading engine configuration or level layouts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be parsed into the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The values parsed but are out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors produced by level lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// The requested transition is not allowed from the current state.
    #[error("cannot move level from {from:?} to {to:?}")]
    InvalidTransition {
        from: level::LevelState,
        to: level::LevelState,
    },

    /// The layout or engine config failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors produced by a game session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A session needs at least one level.
    #[error("session has no levels")]
    NoLevels,

    /// A level failed to build or change state.
    #[error("level error: {0}")]
    Level(#[from] LevelError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use vesper_geom::prelude::*;

    pub use crate::commands::{cue, DestroyCause, FrameCommands, FrameEvent, ImpactTarget, LevelSummary};
    pub use crate::config::{EngineConfig, GameMode, LevelLayout, PlayerTuning};
    pub use crate::decision::{AgentContext, Decision, DecisionNode, DecisionTree, WorldView};
    pub use crate::id::{IdAllocator, ObjectId};
    pub use crate::input::{ControlIntents, IntentSource, ScriptedIntents};
    pub use crate::level::{FrameDiagnostics, FrameReport, Level, LevelState};
    pub use crate::object::agent::Agent;
    pub use crate::object::dynamic::{DynamicKind, DynamicObject};
    pub use crate::object::enemy::{EnemyKind, EnemyStats};
    pub use crate::object::player::{Collectible, PlayerCarry};
    pub use crate::object::statics::{StaticKind, StaticObject};
    pub use crate::object::{CollisionResponse, EffectKind, Faction, GameObject};
    pub use crate::physics::{Body, GravityPhysics, KinematicPhysics, PhysicsEngine};
    pub use crate::replay::{replay, ReplayLog, ReplayRecorder, ReplayResult};
    pub use crate::scoreboard::{MemoryScoreboard, ScoreEntry, Scoreboard};
    pub use crate::session::{Session, SessionState};
    pub use crate::snapshot::LevelSnapshot;
    pub use crate::{ConfigError, LevelError, SessionError};
}
