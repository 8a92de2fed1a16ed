//! Moving objects: the player, enemies, projectiles, and inert movers.

use vesper_geom::prelude::*;

use super::enemy::Enemy;
use super::player::Player;
use super::projectile::Projectile;
use super::statics::StaticObject;
use super::{agent::Agent, direction_suffix, Animation, CollisionResponse, EffectKind, Faction, GameObject};
use crate::commands::{cue, DestroyCause, FrameCommands, FrameEvent, ImpactTarget};
use crate::decision::DecisionTree;
use crate::id::ObjectId;
use crate::physics::Body;

/// How long the damage flash lasts after a hit.
pub const DAMAGE_FLASH_TIME: f64 = 0.15;

/// What a dynamic object is.
#[derive(Debug, Clone)]
pub enum DynamicKind {
    Player(Box<Player>),
    Enemy(Box<Enemy>),
    Projectile(Projectile),
    /// Inert body that only falls and gets pushed around.
    Mover,
}

/// A game object with a [`Body`].
#[derive(Debug, Clone)]
pub struct DynamicObject {
    id: ObjectId,
    pub body: Body,
    hitbox: Hitbox,
    pub animation: Animation,
    pub kind: DynamicKind,
}

impl DynamicObject {
    pub fn new(id: ObjectId, position: Vec2, hitbox: Hitbox, kind: DynamicKind) -> Self {
        let mut body = Body::at(position);
        if matches!(kind, DynamicKind::Projectile(_)) {
            body.gravity_scale = 0.0;
        }
        Self {
            id,
            body,
            hitbox,
            animation: Animation::default(),
            kind,
        }
    }

    pub fn player(id: ObjectId, position: Vec2, hitbox: Hitbox, player: Player) -> Self {
        Self::new(id, position, hitbox, DynamicKind::Player(Box::new(player)))
    }

    /// An enemy with a hitbox covering its sprite.
    pub fn enemy(id: ObjectId, position: Vec2, enemy: Enemy) -> Self {
        let hitbox = Hitbox::new(Vec2::ZERO, enemy.stats.size);
        Self::new(id, position, hitbox, DynamicKind::Enemy(Box::new(enemy)))
    }

    /// A projectile flying with `velocity`, rotated to face its heading.
    pub fn projectile(id: ObjectId, position: Vec2, velocity: Vec2, size: Vec2, projectile: Projectile) -> Self {
        let mut object = Self::new(id, position, Hitbox::new(Vec2::ZERO, size), DynamicKind::Projectile(projectile));
        object.body.velocity = velocity;
        object.body.face(velocity);
        object.body.rotation = velocity.angle();
        object.animation.set("fly");
        object
    }

    pub fn mover(id: ObjectId, position: Vec2, size: Vec2) -> Self {
        Self::new(id, position, Hitbox::new(Vec2::ZERO, size), DynamicKind::Mover)
    }

    /// Queue this object for removal at the end of the frame.
    pub fn destroy(&self, commands: &mut FrameCommands, cause: DestroyCause) -> bool {
        commands.destroy(self.id, cause)
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            DynamicKind::Player(_) => "player",
            DynamicKind::Enemy(enemy) => enemy.kind.name(),
            DynamicKind::Projectile(_) => "projectile",
            DynamicKind::Mover => "mover",
        }
    }

    pub fn hitbox_mut(&mut self) -> &mut Hitbox {
        &mut self.hitbox
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn agent(&self) -> Option<&Agent> {
        match &self.kind {
            DynamicKind::Player(player) => Some(&player.agent),
            DynamicKind::Enemy(enemy) => Some(&enemy.agent),
            _ => None,
        }
    }

    pub fn agent_mut(&mut self) -> Option<&mut Agent> {
        match &mut self.kind {
            DynamicKind::Player(player) => Some(&mut player.agent),
            DynamicKind::Enemy(enemy) => Some(&mut enemy.agent),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            DynamicKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            DynamicKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            DynamicKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match &mut self.kind {
            DynamicKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            DynamicKind::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    pub fn as_projectile_mut(&mut self) -> Option<&mut Projectile> {
        match &mut self.kind {
            DynamicKind::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, DynamicKind::Projectile(_))
    }

    /// Immobile objects skip integration and never move.
    pub fn is_immobile(&self) -> bool {
        self.as_enemy().is_some_and(|enemy| enemy.kind.is_immobile())
    }

    /// Take the decision tree out for traversal. Pair with
    /// [`restore_tree`](Self::restore_tree).
    pub(crate) fn take_tree(&mut self) -> Option<DecisionTree> {
        self.as_enemy_mut().and_then(|enemy| enemy.tree.take())
    }

    pub(crate) fn restore_tree(&mut self, tree: DecisionTree) {
        if let Some(enemy) = self.as_enemy_mut() {
            enemy.tree = Some(tree);
        }
    }
}

impl GameObject for DynamicObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.body.position
    }

    fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    fn animation(&self) -> &Animation {
        &self.animation
    }

    fn is_solid(&self) -> bool {
        false
    }

    fn is_player(&self) -> bool {
        matches!(self.kind, DynamicKind::Player(_))
    }

    fn faction(&self) -> Faction {
        match &self.kind {
            DynamicKind::Player(_) => Faction::Player,
            DynamicKind::Enemy(_) => Faction::Enemy,
            DynamicKind::Projectile(projectile) => projectile.faction,
            DynamicKind::Mover => Faction::Neutral,
        }
    }
}

// ---------------------------------------------------------------------------
// Collision hooks
// ---------------------------------------------------------------------------

impl CollisionResponse for DynamicObject {
    fn collide_with_static(&mut self, other: &mut StaticObject, commands: &mut FrameCommands) {
        if !self.is_projectile() || !other.is_solid() || commands.is_marked(self.id) {
            return;
        }
        commands.emit(FrameEvent::ProjectileImpact {
            projectile: self.id,
            target: ImpactTarget::Static(other.id()),
        });
        commands.sound(cue::PROJECTILE_HIT, Some(self.id));
        commands.destroy(self.id, DestroyCause::Impact);
    }

    fn collide_with_dynamic(&mut self, other: &mut DynamicObject, commands: &mut FrameCommands) {
        if commands.is_marked(self.id) {
            return;
        }
        match &mut self.kind {
            DynamicKind::Projectile(projectile) => {
                if other.is_projectile() || other.faction() == projectile.faction {
                    return;
                }
                // Inert movers stop the projectile but take no damage.
                let damage = projectile.damage;
                if other.is_player() {
                    hurt_player(other, damage, commands);
                } else if other.agent().is_some() {
                    hurt_enemy(other, damage, commands);
                }
                commands.emit(FrameEvent::ProjectileImpact {
                    projectile: self.id,
                    target: ImpactTarget::Dynamic(other.id),
                });
                commands.sound(cue::PROJECTILE_HIT, Some(self.id));
                commands.destroy(self.id, DestroyCause::Impact);
            }
            DynamicKind::Enemy(enemy) => {
                if !other.is_player() || enemy.stats.strength <= 0.0 {
                    return;
                }
                let key = format!("attack_{}", direction_suffix(self.body.orientation));
                self.animation.set(&key);
                if hurt_player(other, enemy.stats.strength, commands) {
                    commands.sound(cue::ENEMY_ATTACK, Some(self.id));
                }
            }
            DynamicKind::Player(_) | DynamicKind::Mover => {}
        }
    }
}

/// Damage the player unless it is invulnerable. A landed hit grants
/// invulnerability and a damage flash. Returns whether the hit landed.
pub(crate) fn hurt_player(target: &mut DynamicObject, amount: f64, commands: &mut FrameCommands) -> bool {
    let id = target.id;
    let Some(player) = target.as_player_mut() else {
        return false;
    };
    if player.agent.has_effect(EffectKind::Invulnerable) {
        return false;
    }
    let removed = player.agent.take_damage(amount);
    player.agent.add_effect(EffectKind::Invulnerable, player.invulnerability_time);
    player.agent.add_effect(EffectKind::DamageFlash, DAMAGE_FLASH_TIME);
    commands.emit(FrameEvent::Damaged {
        target: id,
        amount: removed,
        remaining: player.agent.health(),
    });
    commands.sound(cue::PLAYER_HURT, Some(id));
    true
}

fn hurt_enemy(target: &mut DynamicObject, amount: f64, commands: &mut FrameCommands) {
    let id = target.id;
    let Some(agent) = target.agent_mut() else {
        return;
    };
    let removed = agent.take_damage(amount);
    agent.add_effect(EffectKind::DamageFlash, DAMAGE_FLASH_TIME);
    commands.emit(FrameEvent::Damaged {
        target: id,
        amount: removed,
        remaining: agent.health(),
    });
    commands.sound(cue::ENEMY_HURT, Some(id));
}
