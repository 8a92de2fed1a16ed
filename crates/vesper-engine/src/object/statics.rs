//! Immobile objects: walls, hazards, collectibles, and markers.
//!
//! Static objects never move and never collide with each other. All of their
//! behavior lives in [`CollisionResponse::collide_with_dynamic`], which the
//! level calls after the dynamic side's own hook for the same pair.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vesper_geom::prelude::*;

use super::dynamic::{hurt_player, DynamicObject};
use super::player::Collectible;
use super::{Animation, CollisionResponse, GameObject};
use crate::commands::{cue, DestroyCause, FrameCommands, FrameEvent};
use crate::id::ObjectId;
use crate::physics::{push_out, stop_on_platform};

/// What a static object is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StaticKind {
    /// Solid block. Pushes movers out along the axis of least overlap.
    Wall,
    /// Solid block that also stops vertical motion on landing and on ceiling
    /// bumps.
    PlatformWall,
    /// Ends the level when the player touches it.
    Goal,
    /// Damages the player. Only the lower half of the cell hurts.
    Spike { damage: f64 },
    /// Picked up into the player's inventory.
    Potion { heal: f64 },
    /// Shows `text` each time the player walks in.
    InfoNode { text: String },
}

impl StaticKind {
    pub fn name(&self) -> &'static str {
        match self {
            StaticKind::Wall => "wall",
            StaticKind::PlatformWall => "platform_wall",
            StaticKind::Goal => "goal",
            StaticKind::Spike { .. } => "spike",
            StaticKind::Potion { .. } => "potion",
            StaticKind::InfoNode { .. } => "info_node",
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, StaticKind::Wall | StaticKind::PlatformWall)
    }
}

/// Whether the player is inside an info node, last frame and this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Presence {
    inside: bool,
    touched: bool,
}

/// An immobile game object occupying one rectangular cell.
#[derive(Debug, Clone)]
pub struct StaticObject {
    id: ObjectId,
    position: Vec2,
    hitbox: Hitbox,
    animation: Animation,
    kind: StaticKind,
    presence: Presence,
}

impl StaticObject {
    /// Build a static object covering `cell`.
    ///
    /// Spikes get their hitbox resized to the lower half of the cell.
    pub fn new(id: ObjectId, kind: StaticKind, cell: Aabb) -> Self {
        let mut hitbox = Hitbox::new(Vec2::ZERO, cell.size);
        if matches!(kind, StaticKind::Spike { .. }) {
            let half = cell.size.y * 0.5;
            hitbox.resize(Vec2::new(0.0, half), Vec2::new(cell.size.x, half));
        }
        Self {
            id,
            position: cell.min,
            hitbox,
            animation: Animation::new(kind.name()),
            kind,
            presence: Presence::default(),
        }
    }

    pub fn kind(&self) -> &StaticKind {
        &self.kind
    }

    /// End-of-frame bookkeeping for info nodes: remember whether the player
    /// was inside this frame.
    pub(crate) fn refresh_presence(&mut self) {
        self.presence.inside = self.presence.touched;
        self.presence.touched = false;
    }

    pub(crate) fn advance_animation(&mut self, dt: f64) {
        self.animation.advance(dt);
    }
}

impl GameObject for StaticObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    fn animation(&self) -> &Animation {
        &self.animation
    }

    fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }
}

impl CollisionResponse for StaticObject {
    /// Statics never collide with each other.
    fn collide_with_static(&mut self, _other: &mut StaticObject, _commands: &mut FrameCommands) {}

    fn collide_with_dynamic(&mut self, other: &mut DynamicObject, commands: &mut FrameCommands) {
        let bounds = self.bounds();
        match &self.kind {
            StaticKind::Wall => {
                if movable(other) {
                    let hitbox = *other.hitbox();
                    push_out(&bounds, &mut other.body, &hitbox);
                }
            }
            StaticKind::PlatformWall => {
                if movable(other) {
                    let hitbox = *other.hitbox();
                    let before = other.bounds();
                    push_out(&bounds, &mut other.body, &hitbox);
                    stop_on_platform(&bounds, &before, &mut other.body);
                }
            }
            StaticKind::Goal => {
                if other.is_player() {
                    commands.emit(FrameEvent::GoalReached { goal: self.id });
                    commands.sound(cue::GOAL, Some(self.id));
                }
            }
            StaticKind::Spike { damage } => {
                if other.is_player() {
                    hurt_player(other, *damage, commands);
                }
            }
            StaticKind::Potion { heal } => {
                if commands.is_marked(self.id) {
                    return;
                }
                let Some(player) = other.as_player_mut() else {
                    return;
                };
                let collectible = Collectible::Potion { heal: *heal };
                player.inventory.add(collectible);
                debug!(potion = %self.id, heal, "potion collected");
                commands.emit(FrameEvent::Collected {
                    item: self.id,
                    collectible,
                });
                commands.sound(cue::PICKUP, Some(self.id));
                commands.destroy(self.id, DestroyCause::Consumed);
            }
            StaticKind::InfoNode { text } => {
                if other.is_player() {
                    if !self.presence.inside && !self.presence.touched {
                        commands.emit(FrameEvent::InfoShown {
                            node: self.id,
                            text: text.clone(),
                        });
                    }
                    self.presence.touched = true;
                }
            }
        }
    }
}

/// Projectiles detonate instead of being pushed; immobile enemies stay put.
fn movable(object: &DynamicObject) -> bool {
    !object.is_projectile() && !object.is_immobile()
}
