//! Hostile agents and their per-kind tuning.

use serde::{Deserialize, Serialize};
use vesper_geom::prelude::*;

use super::agent::{Agent, Cooldown};
use crate::decision::DecisionTree;

/// Enemy archetypes. Each gets its own decision tree (see
/// [`behavior::tree_for`](crate::behavior::tree_for)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Keeps its distance and shoots arrows.
    Archer,
    /// Chases on sight, wanders otherwise.
    Demon,
    /// Chases, then charges when close. Returns home when it loses sight.
    Minotaur,
    /// Keeps its distance and casts homing spells.
    Sorcerer,
    /// Immobile turret.
    Tower,
}

impl EnemyKind {
    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Archer => "archer",
            EnemyKind::Demon => "demon",
            EnemyKind::Minotaur => "minotaur",
            EnemyKind::Sorcerer => "sorcerer",
            EnemyKind::Tower => "tower",
        }
    }

    /// Immobile enemies are never integrated and keep zero velocity.
    pub fn is_immobile(self) -> bool {
        matches!(self, EnemyKind::Tower)
    }
}

/// Tunable numbers for one enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub max_health: f64,
    /// Walking speed in pixels per second.
    pub speed: f64,
    /// Contact damage dealt to the player.
    pub strength: f64,
    /// The player is detected inside this radius (center to center).
    pub detection_radius: f64,
    /// Retreat distance for ranged kinds, charge distance for the minotaur.
    pub attack_range: f64,
    /// Seconds between shots or casts.
    pub attack_cooldown: f64,
    pub score_value: u32,
    /// Sprite and hitbox size.
    pub size: Vec2,
    pub projectile_speed: f64,
    pub projectile_damage: f64,
    /// Homing turn rate in radians per second (sorcerer spells).
    pub turn_rate: f64,
}

impl EnemyStats {
    /// Default tuning for `kind`.
    pub fn for_kind(kind: EnemyKind) -> Self {
        let base = Self {
            max_health: 40.0,
            speed: 70.0,
            strength: 8.0,
            detection_radius: 260.0,
            attack_range: 90.0,
            attack_cooldown: 1.4,
            score_value: 100,
            size: Vec2::new(28.0, 28.0),
            projectile_speed: 260.0,
            projectile_damage: 12.0,
            turn_rate: 0.0,
        };
        match kind {
            EnemyKind::Archer => base,
            EnemyKind::Demon => Self {
                max_health: 60.0,
                speed: 90.0,
                strength: 15.0,
                detection_radius: 200.0,
                attack_range: 0.0,
                attack_cooldown: 0.0,
                score_value: 150,
                size: Vec2::new(32.0, 32.0),
                projectile_speed: 0.0,
                projectile_damage: 0.0,
                ..base
            },
            EnemyKind::Minotaur => Self {
                max_health: 120.0,
                speed: 60.0,
                strength: 25.0,
                detection_radius: 240.0,
                attack_range: 120.0,
                attack_cooldown: 0.0,
                score_value: 300,
                size: Vec2::new(40.0, 40.0),
                projectile_speed: 0.0,
                projectile_damage: 0.0,
                ..base
            },
            EnemyKind::Sorcerer => Self {
                max_health: 50.0,
                speed: 55.0,
                strength: 6.0,
                detection_radius: 300.0,
                attack_range: 110.0,
                attack_cooldown: 2.2,
                score_value: 200,
                projectile_speed: 150.0,
                projectile_damage: 18.0,
                turn_rate: 2.5,
                ..base
            },
            EnemyKind::Tower => Self {
                max_health: 80.0,
                speed: 0.0,
                strength: 0.0,
                detection_radius: 320.0,
                attack_range: 0.0,
                attack_cooldown: 1.0,
                score_value: 120,
                size: Vec2::new(32.0, 48.0),
                projectile_speed: 240.0,
                projectile_damage: 10.0,
                ..base
            },
        }
    }
}

/// Minotaur charge speed as a multiple of walking speed.
pub const CHARGE_MULTIPLIER: f64 = 2.5;

/// Enemy-specific state of a [`DynamicObject`](super::dynamic::DynamicObject).
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub agent: Agent,
    pub stats: EnemyStats,
    pub attack: Cooldown,
    /// Spawn position; the minotaur walks back here.
    pub home: Vec2,
    /// Current wander heading (demon).
    pub wander: Vec2,
    /// `None` only while the level is running the tree.
    pub(crate) tree: Option<DecisionTree>,
}

impl Enemy {
    pub fn new(kind: EnemyKind, stats: EnemyStats, home: Vec2, tree: DecisionTree) -> Self {
        Self {
            kind,
            agent: Agent::new(stats.max_health),
            attack: Cooldown::new(stats.attack_cooldown),
            stats,
            home,
            wander: Vec2::ZERO,
            tree: Some(tree),
        }
    }

    pub fn tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }

    /// Replace the decision tree.
    pub fn set_tree(&mut self, tree: DecisionTree) {
        self.tree = Some(tree);
    }
}
