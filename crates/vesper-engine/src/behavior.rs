//! Archetype decision trees for the enemy kinds.
//!
//! Shapes (`true` on the right):
//!
//! ```text
//! archer    detected? -> (too_close? -> retreat | (ready? -> shoot_arrow | hold)) | idle
//! demon     detected? -> chase | wander
//! minotaur  detected? -> (in_attack_range? -> charge | chase) | return_home
//! sorcerer  detected? -> (too_close? -> retreat | (ready? -> cast_homing | hold)) | idle
//! tower     detected? -> (ready? -> shoot_arrow | hold) | idle
//! ```
//!
//! Predicates and actions here are ordinary functions over the enemy's
//! [`DynamicObject`] and the borrowed [`AgentContext`].

use rand::Rng;
use vesper_geom::prelude::*;

use crate::commands::cue;
use crate::decision::{AgentContext, Decision, DecisionNode, DecisionTree};
use crate::object::dynamic::DynamicObject;
use crate::object::enemy::{EnemyKind, CHARGE_MULTIPLIER};
use crate::object::projectile::Projectile;
use crate::object::{direction_suffix, Faction, GameObject};

/// Build the decision tree for `kind`.
pub fn tree_for(kind: EnemyKind) -> DecisionTree {
    let root = match kind {
        EnemyKind::Archer => ranged(SHOOT_ARROW),
        EnemyKind::Sorcerer => ranged(CAST_HOMING),
        EnemyKind::Demon => DecisionNode::branch(
            DETECTED,
            Some(DecisionNode::leaf(WANDER)),
            Some(DecisionNode::leaf(CHASE)),
        ),
        EnemyKind::Minotaur => DecisionNode::branch(
            DETECTED,
            Some(DecisionNode::leaf(RETURN_HOME)),
            Some(DecisionNode::branch(
                IN_ATTACK_RANGE,
                Some(DecisionNode::leaf(CHASE)),
                Some(DecisionNode::leaf(CHARGE)),
            )),
        ),
        EnemyKind::Tower => DecisionNode::branch(DETECTED, Some(DecisionNode::leaf(IDLE)), Some(fire_when_ready(SHOOT_ARROW))),
    };
    DecisionTree::new(root)
}

fn fire_when_ready(attack: Decision) -> DecisionNode {
    DecisionNode::branch(READY, Some(DecisionNode::leaf(HOLD)), Some(DecisionNode::leaf(attack)))
}

fn ranged(attack: Decision) -> DecisionNode {
    DecisionNode::branch(
        DETECTED,
        Some(DecisionNode::leaf(IDLE)),
        Some(DecisionNode::branch(
            TOO_CLOSE,
            Some(fire_when_ready(attack)),
            Some(DecisionNode::leaf(RETREAT)),
        )),
    )
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

// Interior nodes take an action too; it runs when the chosen child is absent.
const DETECTED: Decision = Decision::new("detected", player_detected, stand_still);
const TOO_CLOSE: Decision = Decision::new("too_close", player_too_close, stand_still);
const READY: Decision = Decision::new("ready", attack_ready, stand_still);
const IN_ATTACK_RANGE: Decision = Decision::new("in_attack_range", player_too_close, stand_still);

const IDLE: Decision = Decision::new("idle", never, stand_still);
const HOLD: Decision = Decision::new("hold", never, hold_and_face);
const RETREAT: Decision = Decision::new("retreat", never, retreat);
const CHASE: Decision = Decision::new("chase", never, chase);
const CHARGE: Decision = Decision::new("charge", never, charge);
const WANDER: Decision = Decision::new("wander", never, wander);
const RETURN_HOME: Decision = Decision::new("return_home", never, return_home);
const SHOOT_ARROW: Decision = Decision::new("shoot_arrow", never, shoot_arrow);
const CAST_HOMING: Decision = Decision::new("cast_homing", never, cast_homing);

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn distance_to_player(agent: &DynamicObject, ctx: &AgentContext<'_>) -> f64 {
    agent.center().distance(ctx.world.player.center())
}

fn player_detected(agent: &DynamicObject, ctx: &AgentContext<'_>, _dt: f64) -> bool {
    let Some(enemy) = agent.as_enemy() else {
        return false;
    };
    let alive = ctx.world.player.agent().is_some_and(|a| !a.is_dead());
    alive && distance_to_player(agent, ctx) <= enemy.stats.detection_radius
}

fn player_too_close(agent: &DynamicObject, ctx: &AgentContext<'_>, _dt: f64) -> bool {
    agent
        .as_enemy()
        .is_some_and(|enemy| distance_to_player(agent, ctx) < enemy.stats.attack_range)
}

fn attack_ready(agent: &DynamicObject, _ctx: &AgentContext<'_>, _dt: f64) -> bool {
    agent.as_enemy().is_some_and(|enemy| enemy.attack.is_ready())
}

fn never(_: &DynamicObject, _: &AgentContext<'_>, _: f64) -> bool {
    false
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

fn speed_of(agent: &DynamicObject) -> f64 {
    agent.as_enemy().map_or(0.0, |enemy| enemy.stats.speed)
}

/// Set velocity along `direction` (unit) at `speed`. With gravity only the
/// horizontal component is driven.
fn drive(agent: &mut DynamicObject, direction: Vec2, speed: f64, gravity: bool, motion: &str) {
    if gravity {
        agent.body.velocity.x = if direction.x == 0.0 { 0.0 } else { direction.x.signum() * speed };
    } else {
        agent.body.velocity = direction * speed;
    }
    agent.body.face(direction);
    let key = format!("{motion}_{}", direction_suffix(agent.body.orientation));
    agent.animation.set(&key);
}

fn halt(agent: &mut DynamicObject, gravity: bool) {
    if gravity {
        agent.body.velocity.x = 0.0;
    } else {
        agent.body.velocity = Vec2::ZERO;
    }
}

fn stand_still(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, _dt: f64) {
    halt(agent, ctx.world.gravity);
    let key = format!("idle_{}", direction_suffix(agent.body.orientation));
    agent.animation.set(&key);
}

fn hold_and_face(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, dt: f64) {
    let toward = ctx.world.player.center() - agent.center();
    agent.body.face(toward);
    stand_still(agent, ctx, dt);
}

fn chase(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, _dt: f64) {
    let direction = (ctx.world.player.center() - agent.center()).normalized();
    let speed = speed_of(agent);
    drive(agent, direction, speed, ctx.world.gravity, "walk");
}

fn charge(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, _dt: f64) {
    let direction = (ctx.world.player.center() - agent.center()).normalized();
    let speed = speed_of(agent) * CHARGE_MULTIPLIER;
    drive(agent, direction, speed, ctx.world.gravity, "charge");
}

fn retreat(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, _dt: f64) {
    let away = (agent.center() - ctx.world.player.center()).normalized();
    let speed = speed_of(agent);
    drive(agent, away, speed, ctx.world.gravity, "walk");
}

fn return_home(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, dt: f64) {
    let Some(home) = agent.as_enemy().map(|enemy| enemy.home) else {
        return;
    };
    let offset = home - agent.body.position;
    let speed = speed_of(agent);
    // Close enough to stop this frame.
    if offset.length() <= speed * dt || (ctx.world.gravity && offset.x.abs() <= speed * dt) {
        stand_still(agent, ctx, dt);
    } else {
        drive(agent, offset.normalized(), speed, ctx.world.gravity, "walk");
    }
}

/// Average seconds between wander heading changes.
const WANDER_PERIOD: f64 = 2.0;

fn wander(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, dt: f64) {
    let Some(enemy) = agent.as_enemy_mut() else {
        return;
    };
    let change = enemy.wander == Vec2::ZERO || ctx.rng.gen_bool((dt / WANDER_PERIOD).clamp(0.0, 1.0));
    if change {
        let angle = ctx.rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
        enemy.wander = Vec2::from_angle(angle);
    }
    let heading = enemy.wander;
    let speed = enemy.stats.speed * 0.5;
    drive(agent, heading, speed, ctx.world.gravity, "walk");
}

fn shoot_arrow(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, dt: f64) {
    fire(agent, ctx, false);
    hold_and_face(agent, ctx, dt);
}

fn cast_homing(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, dt: f64) {
    fire(agent, ctx, true);
    hold_and_face(agent, ctx, dt);
}

/// Spawn an enemy projectile from the agent's center toward the player.
fn fire(agent: &mut DynamicObject, ctx: &mut AgentContext<'_>, homing: bool) {
    let origin = agent.center();
    let direction = (ctx.world.player.center() - origin).normalized();
    let id = agent.id();
    let Some(enemy) = agent.as_enemy_mut() else {
        return;
    };
    if direction == Vec2::ZERO {
        return;
    }
    let size = ctx.config.projectile_size;
    let mut projectile = Projectile::new(Faction::Enemy, enemy.stats.projectile_damage, ctx.config.projectile_ttl);
    if homing {
        projectile = projectile.homing(enemy.stats.turn_rate);
    }
    let spawned = DynamicObject::projectile(
        ctx.ids.allocate(),
        origin - Vec2::new(size * 0.5, size * 0.5),
        direction * enemy.stats.projectile_speed,
        Vec2::new(size, size),
        projectile,
    );
    enemy.attack.trigger();
    ctx.commands.spawn(spawned);
    ctx.commands.sound(if homing { cue::SPELL_CAST } else { cue::ARROW_FIRE }, Some(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use crate::commands::FrameCommands;
    use crate::config::{EngineConfig, PlayerTuning};
    use crate::decision::{DecisionNode, WorldView};
    use crate::id::{IdAllocator, ObjectId};
    use crate::object::enemy::{Enemy, EnemyStats};
    use crate::object::player::{Controls, Player};

    fn enemy_at(kind: EnemyKind, x: f64) -> DynamicObject {
        let enemy = Enemy::new(kind, EnemyStats::for_kind(kind), Vec2::new(x, 0.0), tree_for(kind));
        DynamicObject::enemy(ObjectId::from_raw(1), Vec2::new(x, 0.0), enemy)
    }

    fn player_at(x: f64) -> DynamicObject {
        DynamicObject::player(
            ObjectId::from_raw(0),
            Vec2::new(x, 0.0),
            Hitbox::sized(28.0, 28.0),
            Player::new(PlayerTuning::default(), Controls::TopDown, 1.0),
        )
    }

    /// Run the agent's own tree once with the player at `player_x`.
    fn step(agent: &mut DynamicObject, player_x: f64) -> (Option<&'static str>, FrameCommands) {
        let player = player_at(player_x);
        let mut commands = FrameCommands::new();
        let mut ids = IdAllocator::new();
        let mut rng = Pcg64::seed_from_u64(1);
        let config = EngineConfig::default();
        let tree = agent.take_tree().expect("enemy has a tree");
        let mut ctx = AgentContext {
            world: WorldView {
                player: &player,
                statics: &[],
                time: 0.0,
                gravity: false,
            },
            commands: &mut commands,
            ids: &mut ids,
            rng: &mut rng,
            config: &config,
        };
        let chosen = tree.run(agent, &mut ctx, 1.0 / 60.0);
        agent.restore_tree(tree);
        (chosen, commands)
    }

    #[test]
    fn archer_shoots_then_holds() {
        let mut archer = enemy_at(EnemyKind::Archer, 0.0);
        let (chosen, commands) = step(&mut archer, 200.0);
        assert_eq!(chosen, Some("shoot_arrow"));
        assert_eq!(commands.spawned().len(), 1);
        let arrow = &commands.spawned()[0];
        assert_eq!(arrow.faction(), Faction::Enemy);
        assert!(arrow.body.velocity.x > 0.0);

        let (chosen, commands) = step(&mut archer, 200.0);
        assert_eq!(chosen, Some("hold"));
        assert!(commands.spawned().is_empty());
    }

    #[test]
    fn archer_retreats_when_crowded() {
        let mut archer = enemy_at(EnemyKind::Archer, 0.0);
        let (chosen, _) = step(&mut archer, 40.0);
        assert_eq!(chosen, Some("retreat"));
        assert!(archer.body.velocity.x < 0.0);
    }

    #[test]
    fn out_of_range_enemies_idle_or_wander() {
        let mut archer = enemy_at(EnemyKind::Archer, 0.0);
        assert_eq!(step(&mut archer, 5_000.0).0, Some("idle"));
        assert_eq!(archer.body.velocity, Vec2::ZERO);

        let mut demon = enemy_at(EnemyKind::Demon, 0.0);
        assert_eq!(step(&mut demon, 5_000.0).0, Some("wander"));
        let speed = demon.body.velocity.length();
        assert!((speed - 45.0).abs() < 1e-9);
    }

    #[test]
    fn minotaur_chases_then_charges() {
        let mut minotaur = enemy_at(EnemyKind::Minotaur, 0.0);
        assert_eq!(step(&mut minotaur, 200.0).0, Some("chase"));
        assert!((minotaur.body.velocity.length() - 60.0).abs() < 1e-9);
        assert!(minotaur.body.velocity.x > 0.0);

        assert_eq!(step(&mut minotaur, 80.0).0, Some("charge"));
        assert!((minotaur.body.velocity.length() - 150.0).abs() < 1e-9);
        assert_eq!(minotaur.animation.key(), "charge_right");
    }

    #[test]
    fn sorcerer_casts_homing() {
        let mut sorcerer = enemy_at(EnemyKind::Sorcerer, 0.0);
        let (chosen, commands) = step(&mut sorcerer, 250.0);
        assert_eq!(chosen, Some("cast_homing"));
        let spell = commands.spawned()[0].as_projectile().unwrap();
        assert!(spell.homing.is_some());
    }

    #[test]
    fn tower_never_moves() {
        let mut tower = enemy_at(EnemyKind::Tower, 0.0);
        for x in [100.0, 20.0, 5_000.0] {
            step(&mut tower, x);
            assert_eq!(tower.body.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn tree_shapes() {
        let count = |kind| tree_for(kind).root().map_or(0, DecisionNode::len);
        assert_eq!(count(EnemyKind::Archer), 7);
        assert_eq!(count(EnemyKind::Sorcerer), 7);
        assert_eq!(count(EnemyKind::Demon), 3);
        assert_eq!(count(EnemyKind::Minotaur), 5);
        assert_eq!(count(EnemyKind::Tower), 5);
    }
}
