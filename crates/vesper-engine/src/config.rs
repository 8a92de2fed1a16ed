//! Engine tuning and level layouts.
//!
//! Both [`EngineConfig`] and [`LevelLayout`] are plain serde types so they can
//! live in JSON files next to the game's assets. `from_json_str` parses and
//! then [`validate`](EngineConfig::validate)s; constructing a value in code
//! skips validation until a [`Level`](crate::level::Level) is built from it.
//!
//! ```
//! use vesper_engine::config::{GameMode, LevelLayout};
//!
//! let layout = LevelLayout::from_json_str(r#"{
//!     "name": "cellar",
//!     "mode": "platformer",
//!     "player": { "x": 32.0, "y": 64.0 },
//!     "statics": [
//!         { "type": "wall", "x": 0.0, "y": 128.0, "width": 640.0, "height": 32.0 },
//!         { "type": "potion", "heal": 25.0, "x": 96.0, "y": 96.0, "width": 16.0, "height": 16.0 }
//!     ],
//!     "enemies": [ { "kind": "demon", "x": 300.0, "y": 96.0 } ]
//! }"#).unwrap();
//!
//! assert_eq!(layout.mode, GameMode::Platformer);
//! assert_eq!(layout.statics.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;
use vesper_geom::prelude::*;

use crate::object::enemy::{EnemyKind, EnemyStats};
use crate::object::statics::StaticKind;
use crate::physics::{GravityPhysics, KinematicPhysics, PhysicsEngine};
use crate::ConfigError;

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Player movement and combat tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Walking speed in pixels per second.
    pub speed: f64,
    pub max_health: f64,
    /// Seconds between shots.
    pub fire_cooldown: f64,
    pub projectile_speed: f64,
    pub projectile_damage: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 160.0,
            max_health: 100.0,
            fire_cooldown: 0.35,
            projectile_speed: 320.0,
            projectile_damage: 25.0,
        }
    }
}

/// Engine-wide tuning shared by every level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Downward acceleration in gravity modes, pixels per second squared.
    pub gravity: f64,
    /// Initial upward speed of a platformer jump.
    pub jump_speed: f64,
    /// Grace period after leaving the ground during which a jump still fires.
    pub coyote_time: f64,
    /// Player invulnerability after each hit, in seconds.
    pub invulnerability_time: f64,
    /// Reach of the ground sensor above and below the player's feet.
    pub ground_sensor_depth: f64,
    /// Seed for the level's random number generator.
    pub rng_seed: u64,
    /// Live projectiles allowed per faction. The oldest is evicted first.
    pub max_projectiles: usize,
    /// Seconds a projectile flies before expiring.
    pub projectile_ttl: f64,
    /// Projectile hitbox edge length.
    pub projectile_size: f64,
    pub player: PlayerTuning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: 1200.0,
            jump_speed: 480.0,
            coyote_time: 0.07,
            invulnerability_time: 1.0,
            ground_sensor_depth: 2.0,
            rng_seed: 0x5EED,
            max_projectiles: 32,
            projectile_ttl: 2.0,
            projectile_size: 8.0,
            player: PlayerTuning::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("gravity", self.gravity)?;
        non_negative("jump_speed", self.jump_speed)?;
        non_negative("coyote_time", self.coyote_time)?;
        non_negative("invulnerability_time", self.invulnerability_time)?;
        positive("ground_sensor_depth", self.ground_sensor_depth)?;
        positive("projectile_ttl", self.projectile_ttl)?;
        positive("projectile_size", self.projectile_size)?;
        positive("player.max_health", self.player.max_health)?;
        non_negative("player.speed", self.player.speed)?;
        non_negative("player.fire_cooldown", self.player.fire_cooldown)?;
        non_negative("player.projectile_speed", self.player.projectile_speed)?;
        non_negative("player.projectile_damage", self.player.projectile_damage)?;
        if self.max_projectiles == 0 {
            return Err(ConfigError::Invalid("max_projectiles must be at least 1".into()));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} must be positive and finite, got {value}")))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} must be non-negative and finite, got {value}")))
    }
}

// ---------------------------------------------------------------------------
// GameMode
// ---------------------------------------------------------------------------

/// How a level plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Free 2D movement, no gravity.
    TopDown,
    /// Gravity, jumping, coyote time.
    Platformer,
    /// Platformer with a constant horizontal auto-scroll speed.
    SideScroller,
}

impl GameMode {
    pub fn uses_gravity(self) -> bool {
        !matches!(self, GameMode::TopDown)
    }

    /// The physics engine this mode runs on.
    pub fn physics(self, config: &EngineConfig) -> Box<dyn PhysicsEngine> {
        if self.uses_gravity() {
            Box::new(GravityPhysics::new(config.gravity))
        } else {
            Box::new(KinematicPhysics)
        }
    }
}

// ---------------------------------------------------------------------------
// LevelLayout
// ---------------------------------------------------------------------------

/// A static object placed in a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticSpawn {
    #[serde(flatten)]
    pub kind: StaticKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl StaticSpawn {
    pub fn cell(&self) -> Aabb {
        Aabb::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// An enemy placed in a layout. `stats` overrides the kind's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<EnemyStats>,
}

impl EnemySpawn {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn stats(&self) -> EnemyStats {
        self.stats.clone().unwrap_or_else(|| EnemyStats::for_kind(self.kind))
    }
}

/// An inert body placed in a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverSpawn {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything needed to build (and rebuild) one stage.
///
/// A layout carries exactly one player spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    pub mode: GameMode,
    /// Horizontal auto-scroll speed (side-scroller only).
    #[serde(default)]
    pub scroll_speed: f64,
    /// Player spawn position.
    pub player: Vec2,
    #[serde(default)]
    pub statics: Vec<StaticSpawn>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub movers: Vec<MoverSpawn>,
}

impl LevelLayout {
    /// An empty layout with only the player spawn.
    pub fn new(name: impl Into<String>, mode: GameMode, player: Vec2) -> Self {
        Self {
            name: name.into(),
            mode,
            scroll_speed: 0.0,
            player,
            statics: Vec::new(),
            enemies: Vec::new(),
            movers: Vec::new(),
        }
    }

    pub fn with_static(mut self, kind: StaticKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.statics.push(StaticSpawn { kind, x, y, width, height });
        self
    }

    pub fn with_enemy(mut self, kind: EnemyKind, x: f64, y: f64) -> Self {
        self.enemies.push(EnemySpawn { kind, x, y, stats: None });
        self
    }

    pub fn with_enemy_stats(mut self, kind: EnemyKind, x: f64, y: f64, stats: EnemyStats) -> Self {
        self.enemies.push(EnemySpawn {
            kind,
            x,
            y,
            stats: Some(stats),
        });
        self
    }

    pub fn with_mover(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.movers.push(MoverSpawn { x, y, width, height });
        self
    }

    pub fn with_scroll_speed(mut self, speed: f64) -> Self {
        self.scroll_speed = speed;
        self
    }

    /// Parse and validate a JSON layout.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("level name must not be empty".into()));
        }
        if !self.player.is_finite() {
            return Err(ConfigError::Invalid(format!("player spawn {} is not finite", self.player)));
        }
        if !self.scroll_speed.is_finite() {
            return Err(ConfigError::Invalid("scroll_speed must be finite".into()));
        }
        if self.scroll_speed != 0.0 && self.mode != GameMode::SideScroller {
            warn!(level = %self.name, mode = ?self.mode, "scroll_speed is ignored outside side-scroller mode");
        }
        for (index, spawn) in self.statics.iter().enumerate() {
            let cell = spawn.cell();
            if !cell.min.is_finite() || !cell.size.is_finite() || cell.is_degenerate() {
                return Err(ConfigError::Invalid(format!(
                    "static #{index} ({}) has an invalid cell {:?}",
                    spawn.kind.name(),
                    cell
                )));
            }
        }
        for (index, spawn) in self.enemies.iter().enumerate() {
            if !spawn.position().is_finite() {
                return Err(ConfigError::Invalid(format!("enemy #{index} has a non-finite position")));
            }
            let stats = spawn.stats();
            if !(stats.max_health > 0.0) || stats.size.x <= 0.0 || stats.size.y <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "enemy #{index} ({}) needs positive health and size",
                    spawn.kind.name()
                )));
            }
        }
        for (index, spawn) in self.movers.iter().enumerate() {
            if !(spawn.width > 0.0 && spawn.height > 0.0) || !Vec2::new(spawn.x, spawn.y).is_finite() {
                return Err(ConfigError::Invalid(format!("mover #{index} has an invalid cell")));
            }
        }
        Ok(())
    }
}
