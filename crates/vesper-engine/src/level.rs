//! The level: object ownership, lifecycle, and the per-frame update.
//!
//! A [`Level`] owns every object of one stage: the player (in its own field,
//! so there is always exactly one), the static objects, and the other dynamic
//! objects. [`Level::update`] advances the simulation by one variable-length
//! frame:
//!
//! 1. Player intents (jump, movement, potions, firing).
//! 2. Enemy decision trees.
//! 3. Projectile upkeep, then integration of every movable body.
//! 4. Narrow phase: dynamic vs static pairs, then dynamic vs dynamic pairs.
//!    Ground sensing in gravity modes, then death checks.
//! 5. Sweep: pending destructions are removed, then this frame's spawns join.
//! 6. Effects, cooldowns, animation timers, info-node presence.
//! 7. Goal check.
//!
//! Hooks never mutate the object sets directly; destruction is
//! mark-then-sweep through [`FrameCommands`], so every pair within a frame
//! sees the same objects. Objects already marked are skipped for later pairs.
//!
//! # Lifecycle
//!
//! ```text
//! Unloaded --load--> Running --reset--> Resetting --> Running
//!                       |
//!                       +--goal--> Advancing   (terminal)
//!                       +--death-> GameOver    (terminal)
//! ```

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vesper_geom::prelude::*;

use crate::behavior::tree_for;
use crate::commands::{cue, DestroyCause, FrameCommands, FrameEvent, LevelSummary};
use crate::config::{EngineConfig, GameMode, LevelLayout};
use crate::decision::{AgentContext, WorldView};
use crate::id::{IdAllocator, ObjectId};
use crate::input::{ControlIntents, IntentSource};
use crate::object::dynamic::{DynamicKind, DynamicObject};
use crate::object::enemy::Enemy;
use crate::object::player::{Collectible, Controls, CoyoteTracker, Player, PlayerCarry};
use crate::object::projectile::{steer, Projectile};
use crate::object::statics::StaticObject;
use crate::object::{direction_suffix, CollisionResponse, EffectKind, Faction, GameObject};
use crate::physics::{ground_sensor, sensor_touches, PhysicsEngine};
use crate::LevelError;

/// How long the healing glow lasts after drinking a potion.
const HEALING_GLOW_TIME: f64 = 0.5;

// ---------------------------------------------------------------------------
// LevelState
// ---------------------------------------------------------------------------

/// Lifecycle state of a level instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelState {
    /// Built but not started.
    Unloaded,
    /// Accepting updates.
    Running,
    /// Rebuilding its objects from the layout.
    Resetting,
    /// The goal was reached. Terminal.
    Advancing,
    /// The player died. Terminal.
    GameOver,
}

impl LevelState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LevelState::Advancing | LevelState::GameOver)
    }
}

// ---------------------------------------------------------------------------
// FrameDiagnostics / FrameReport
// ---------------------------------------------------------------------------

/// Wall-clock timing of the last update, per phase.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    pub intents: Duration,
    pub decisions: Duration,
    pub integration: Duration,
    pub collisions: Duration,
    pub sweep: Duration,
    pub upkeep: Duration,
    pub total: Duration,
}

/// Result of one [`Level::update`].
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Frame counter after the update.
    pub frame: u64,
    /// Level state after the update.
    pub state: LevelState,
    /// Events in emission order.
    pub events: Vec<FrameEvent>,
    pub diagnostics: FrameDiagnostics,
}

impl FrameReport {
    fn idle(frame: u64, state: LevelState) -> Self {
        Self {
            frame,
            state,
            events: Vec::new(),
            diagnostics: FrameDiagnostics::default(),
        }
    }

    /// Sound cues requested this frame, in order.
    pub fn sounds(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().filter_map(|event| match event {
            FrameEvent::Sound { cue, .. } => Some(cue.as_str()),
            _ => None,
        })
    }

    /// The level summary, if the level ended this frame.
    pub fn ended(&self) -> Option<&LevelSummary> {
        self.events.iter().find_map(|event| match event {
            FrameEvent::LevelEnded { summary } => Some(summary),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// One stage and everything in it.
pub struct Level {
    layout: LevelLayout,
    config: EngineConfig,
    /// Score and inventory the player starts with (and restarts with on reset).
    carry: PlayerCarry,
    physics: Box<dyn PhysicsEngine>,
    state: LevelState,
    player: DynamicObject,
    statics: Vec<StaticObject>,
    dynamics: Vec<DynamicObject>,
    ids: IdAllocator,
    rng: Pcg64,
    commands: FrameCommands,
    clock: f64,
    frame: u64,
    summary: Option<LevelSummary>,
    last_diagnostics: FrameDiagnostics,
}

impl Level {
    /// Validate the inputs and build every object. The level starts
    /// [`Unloaded`](LevelState::Unloaded); call [`load`](Self::load) to run it.
    pub fn new(layout: LevelLayout, config: EngineConfig) -> Result<Self, LevelError> {
        Self::with_carry(layout, config, PlayerCarry::default())
    }

    /// Like [`new`](Self::new), with the player's score and inventory carried
    /// over from a previous level.
    pub fn with_carry(layout: LevelLayout, config: EngineConfig, carry: PlayerCarry) -> Result<Self, LevelError> {
        layout.validate()?;
        config.validate()?;
        let mut ids = IdAllocator::new();
        let player = build_player(ids.allocate(), &layout, &config, carry.clone());
        let mut level = Self {
            physics: layout.mode.physics(&config),
            rng: Pcg64::seed_from_u64(config.rng_seed),
            layout,
            config,
            carry,
            state: LevelState::Unloaded,
            player,
            statics: Vec::new(),
            dynamics: Vec::new(),
            ids,
            commands: FrameCommands::new(),
            clock: 0.0,
            frame: 0,
            summary: None,
            last_diagnostics: FrameDiagnostics::default(),
        };
        level.populate();
        Ok(level)
    }

    /// Rebuild the object set from the layout, reusing the vectors'
    /// allocations. Clock, frame counter, ids, and RNG restart.
    fn populate(&mut self) {
        self.ids.reset();
        self.statics.clear();
        self.dynamics.clear();
        self.commands.clear();
        self.rng = Pcg64::seed_from_u64(self.config.rng_seed);
        self.clock = 0.0;
        self.frame = 0;
        self.summary = None;

        self.player = build_player(self.ids.allocate(), &self.layout, &self.config, self.carry.clone());
        for spawn in &self.layout.statics {
            self.statics
                .push(StaticObject::new(self.ids.allocate(), spawn.kind.clone(), spawn.cell()));
        }
        for spawn in &self.layout.enemies {
            let enemy = Enemy::new(spawn.kind, spawn.stats(), spawn.position(), tree_for(spawn.kind));
            let mut object = DynamicObject::enemy(self.ids.allocate(), spawn.position(), enemy);
            if spawn.kind.is_immobile() {
                object.body.gravity_scale = 0.0;
            }
            self.dynamics.push(object);
        }
        for spawn in &self.layout.movers {
            self.dynamics.push(DynamicObject::mover(
                self.ids.allocate(),
                Vec2::new(spawn.x, spawn.y),
                Vec2::new(spawn.width, spawn.height),
            ));
        }
        debug!(
            level = %self.layout.name,
            statics = self.statics.len(),
            dynamics = self.dynamics.len(),
            "level populated"
        );
    }

    /// Start the level: `Unloaded -> Running`.
    pub fn load(&mut self) -> Result<(), LevelError> {
        if self.state != LevelState::Unloaded {
            warn!(level = %self.layout.name, state = ?self.state, "load rejected");
            return Err(LevelError::InvalidTransition {
                from: self.state,
                to: LevelState::Running,
            });
        }
        self.state = LevelState::Running;
        info!(level = %self.layout.name, mode = ?self.layout.mode, "level loaded");
        self.on_start();
        Ok(())
    }

    /// Rebuild the level from its layout and keep running.
    pub fn reset(&mut self) -> Result<(), LevelError> {
        if self.state != LevelState::Running {
            warn!(level = %self.layout.name, state = ?self.state, "reset rejected");
            return Err(LevelError::InvalidTransition {
                from: self.state,
                to: LevelState::Resetting,
            });
        }
        self.state = LevelState::Resetting;
        self.populate();
        self.state = LevelState::Running;
        info!(level = %self.layout.name, "level reset");
        self.on_start();
        Ok(())
    }

    /// Announce the start of the level. The events are delivered with the
    /// next update's report (or through [`drain_events`](Self::drain_events)).
    pub fn on_start(&mut self) {
        self.commands.emit(FrameEvent::LevelStarted {
            level: self.layout.name.clone(),
        });
        self.commands.sound(cue::LEVEL_START, None);
    }

    /// Take events emitted outside an update (level start).
    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        self.commands.take_events()
    }

    /// Pull the frame's intents from `source` and update.
    pub fn step(&mut self, dt: f64, source: &mut dyn IntentSource) -> FrameReport {
        let intents = source.next_intents(self.frame);
        self.update(dt, &intents)
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// A level that is not running, or a negative or non-finite `dt`, yields
    /// an empty report and changes nothing.
    pub fn update(&mut self, dt: f64, intents: &ControlIntents) -> FrameReport {
        if self.state != LevelState::Running {
            return FrameReport::idle(self.frame, self.state);
        }
        if !(dt.is_finite() && dt >= 0.0) {
            warn!(dt, "ignoring frame with invalid dt");
            return FrameReport::idle(self.frame, self.state);
        }

        let frame_start = Instant::now();
        let mut diagnostics = FrameDiagnostics::default();
        self.clock += dt;
        self.frame += 1;
        let now = self.clock;

        let phase = Instant::now();
        self.apply_intents(intents, now);
        diagnostics.intents = phase.elapsed();

        let phase = Instant::now();
        self.run_decisions(dt);
        diagnostics.decisions = phase.elapsed();

        let phase = Instant::now();
        self.update_projectiles(dt);
        self.integrate(dt);
        diagnostics.integration = phase.elapsed();

        let phase = Instant::now();
        self.resolve_collisions();
        if self.layout.mode.uses_gravity() {
            self.sense_ground(now);
        }
        self.check_deaths();
        diagnostics.collisions = phase.elapsed();

        let phase = Instant::now();
        self.enforce_projectile_cap();
        self.sweep();
        diagnostics.sweep = phase.elapsed();

        let phase = Instant::now();
        self.tick_timers(dt);
        diagnostics.upkeep = phase.elapsed();

        let goal_reached = self
            .commands
            .events()
            .iter()
            .any(|event| matches!(event, FrameEvent::GoalReached { .. }));
        if goal_reached && self.state == LevelState::Running {
            self.finish(true);
        }

        diagnostics.total = frame_start.elapsed();
        self.last_diagnostics = diagnostics.clone();
        FrameReport {
            frame: self.frame,
            state: self.state,
            events: self.commands.take_events(),
            diagnostics,
        }
    }

    // -- Phase 1: player intents ------------------------------------------

    fn apply_intents(&mut self, intents: &ControlIntents, now: f64) {
        let mode = self.layout.mode;
        let scroll_speed = self.layout.scroll_speed;
        let hitbox = *self.player.hitbox();
        let player_id = self.player.id();
        let movement = intents.clamped_movement();

        let object = &mut self.player;
        let DynamicKind::Player(player) = &mut object.kind else {
            return;
        };
        let body = &mut object.body;
        let speed = player.tuning.speed;

        // Mode prelude: jumping.
        if let Controls::Platformer { jump_speed, coyote } = &mut player.controls {
            if intents.jump && (body.on_ground || coyote.is_grounded(now)) {
                body.velocity.y = -*jump_speed;
                body.on_ground = false;
                coyote.consume();
                self.commands.sound(cue::PLAYER_JUMP, Some(player_id));
            }
        }

        match mode {
            GameMode::TopDown => {
                body.velocity = movement * speed;
                body.face(movement);
            }
            GameMode::Platformer | GameMode::SideScroller => {
                let base = if mode == GameMode::SideScroller { scroll_speed } else { 0.0 };
                body.velocity.x = base + movement.x * speed;
                body.face(Vec2::new(movement.x, 0.0));
            }
        }

        let airborne = mode.uses_gravity() && !body.on_ground && !player.is_grounded(now);
        let motion = if airborne {
            "jump"
        } else if movement != Vec2::ZERO {
            "walk"
        } else {
            "idle"
        };
        let key = format!("{motion}_{}", direction_suffix(body.orientation));
        object.animation.set(&key);

        if intents.use_item {
            if let Some(potion) = player.inventory.take_strongest_potion() {
                let Collectible::Potion { heal } = potion;
                let healed = player.agent.heal(heal);
                player.agent.add_effect(EffectKind::Healing, HEALING_GLOW_TIME);
                self.commands.emit(FrameEvent::ItemUsed { collectible: potion });
                self.commands.emit(FrameEvent::Healed {
                    target: player_id,
                    amount: healed,
                });
                self.commands.sound(cue::DRINK, Some(player_id));
            }
        }

        if intents.fire && player.fire.is_ready() {
            let size = self.config.projectile_size;
            let origin = hitbox.bounds(body.position).center();
            let projectile = Projectile::new(Faction::Player, player.tuning.projectile_damage, self.config.projectile_ttl);
            let spawned = DynamicObject::projectile(
                self.ids.allocate(),
                origin - Vec2::new(size * 0.5, size * 0.5),
                body.orientation * player.tuning.projectile_speed,
                Vec2::new(size, size),
                projectile,
            );
            player.fire.trigger();
            self.commands.spawn(spawned);
            self.commands.sound(cue::PLAYER_FIRE, Some(player_id));
        }
    }

    // -- Phase 2: decisions -----------------------------------------------

    fn run_decisions(&mut self, dt: f64) {
        let Level {
            player,
            statics,
            dynamics,
            commands,
            ids,
            rng,
            config,
            clock,
            layout,
            ..
        } = self;
        let world = WorldView {
            player: &*player,
            statics: statics.as_slice(),
            time: *clock,
            gravity: layout.mode.uses_gravity(),
        };
        for agent in dynamics.iter_mut() {
            let Some(tree) = agent.take_tree() else {
                continue;
            };
            let mut ctx = AgentContext {
                world,
                commands: &mut *commands,
                ids: &mut *ids,
                rng: &mut *rng,
                config: &*config,
            };
            tree.run(agent, &mut ctx, dt);
            agent.restore_tree(tree);
            if agent.is_immobile() {
                agent.body.velocity = Vec2::ZERO;
            }
        }
    }

    // -- Phase 3: projectiles and integration -----------------------------

    fn update_projectiles(&mut self, dt: f64) {
        let target = self.player.center();
        for object in &mut self.dynamics {
            let id = object.id();
            let Some(projectile) = object.as_projectile_mut() else {
                continue;
            };
            let homing = projectile.homing;
            if projectile.age(dt) {
                self.commands.destroy(id, DestroyCause::Expired);
                continue;
            }
            if let Some(homing) = homing {
                let desired = target - object.center();
                object.body.velocity = steer(object.body.velocity, desired, homing.turn_rate * dt);
                let heading = object.body.velocity;
                object.body.face(heading);
                object.body.rotation = heading.angle();
            }
        }
    }

    fn integrate(&mut self, dt: f64) {
        let physics = &*self.physics;
        physics.integrate(&mut self.player.body, dt);
        for object in &mut self.dynamics {
            if object.is_immobile() {
                object.body.velocity = Vec2::ZERO;
                continue;
            }
            if !self.commands.is_marked(object.id()) {
                physics.integrate(&mut object.body, dt);
            }
        }
    }

    // -- Phase 4: collisions, ground, deaths ------------------------------

    fn resolve_collisions(&mut self) {
        let Level {
            player,
            statics,
            dynamics,
            commands,
            physics,
            ..
        } = self;
        let physics = &**physics;

        collide_with_statics(player, statics, physics, commands);
        for object in dynamics.iter_mut() {
            collide_with_statics(object, statics, physics, commands);
        }

        for other in dynamics.iter_mut() {
            collide_pair(player, other, physics, commands);
        }
        for i in 0..dynamics.len() {
            let (head, tail) = dynamics.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                collide_pair(a, b, physics, commands);
            }
        }
    }

    fn sense_ground(&mut self, now: f64) {
        let depth = self.config.ground_sensor_depth;
        let statics = &self.statics;
        let commands = &self.commands;
        let on_solid = |object: &DynamicObject| {
            if object.body.velocity.y < 0.0 {
                return false;
            }
            let sensor = ground_sensor(object.hitbox(), object.body.position, depth);
            statics
                .iter()
                .any(|s| s.is_solid() && !commands.is_marked(s.id()) && sensor_touches(&sensor, &s.bounds()))
        };

        let contact = on_solid(&self.player);
        self.player.body.on_ground = contact;
        if contact {
            if let Some(Player {
                controls: Controls::Platformer { coyote, .. },
                ..
            }) = self.player.as_player_mut()
            {
                coyote.touch(now);
            }
        }

        for object in &mut self.dynamics {
            if object.is_projectile() || object.is_immobile() {
                continue;
            }
            object.body.on_ground = on_solid(&*object);
        }
    }

    fn check_deaths(&mut self) {
        let mut points = Vec::new();
        for object in &self.dynamics {
            let Some(enemy) = object.as_enemy() else {
                continue;
            };
            if enemy.agent.is_dead() && !self.commands.is_marked(object.id()) {
                self.commands.destroy(object.id(), DestroyCause::Killed);
                self.commands.sound(cue::ENEMY_DEATH, Some(object.id()));
                debug!(enemy = %object.id(), kind = enemy.kind.name(), "enemy killed");
                points.push(enemy.stats.score_value);
            }
        }
        if let Some(player) = self.player.as_player_mut() {
            for value in points {
                let total = player.award(value);
                self.commands.emit(FrameEvent::ScoreAwarded { points: value, total });
            }
        }

        let player_dead = self.player.agent().is_some_and(|agent| agent.is_dead());
        if player_dead && self.state == LevelState::Running {
            self.commands.emit(FrameEvent::PlayerDied);
            self.commands.sound(cue::PLAYER_DEATH, Some(self.player.id()));
            self.finish(false);
        }
    }

    // -- Phase 5: sweep ---------------------------------------------------

    /// Mark the oldest projectiles of each faction beyond the cap.
    fn enforce_projectile_cap(&mut self) {
        let cap = self.config.max_projectiles;
        for faction in [Faction::Player, Faction::Enemy] {
            let spawned = self
                .commands
                .spawned()
                .iter()
                .filter(|object| object.is_projectile() && object.faction() == faction)
                .count();
            let live: Vec<ObjectId> = self
                .dynamics
                .iter()
                .filter(|object| object.is_projectile() && object.faction() == faction)
                .map(GameObject::id)
                .filter(|id| !self.commands.is_marked(*id))
                .collect();
            let excess = (live.len() + spawned).saturating_sub(cap);
            for id in live.into_iter().take(excess) {
                self.commands.destroy(id, DestroyCause::Evicted);
            }
        }
    }

    fn sweep(&mut self) {
        let removed = self.commands.take_destroyed();
        if !removed.is_empty() {
            let gone = |id: ObjectId| removed.iter().any(|(marked, _)| *marked == id);
            self.statics.retain(|object| !gone(object.id()));
            self.dynamics.retain(|object| !gone(object.id()));
        }
        self.dynamics.extend(self.commands.take_spawns());
    }

    // -- Phase 6: timers --------------------------------------------------

    fn tick_timers(&mut self, dt: f64) {
        if let Some(player) = self.player.as_player_mut() {
            player.agent.tick_effects(dt);
            player.fire.tick(dt);
        }
        self.player.animation.advance(dt);
        for object in &mut self.dynamics {
            if let Some(agent) = object.agent_mut() {
                agent.tick_effects(dt);
            }
            if let Some(enemy) = object.as_enemy_mut() {
                enemy.attack.tick(dt);
            }
            object.animation.advance(dt);
        }
        for object in &mut self.statics {
            object.refresh_presence();
            object.advance_animation(dt);
        }
    }

    fn finish(&mut self, completed: bool) {
        self.state = if completed {
            LevelState::Advancing
        } else {
            LevelState::GameOver
        };
        let summary = LevelSummary {
            level: self.layout.name.clone(),
            elapsed: self.clock,
            score: self.score(),
            completed,
        };
        info!(
            level = %summary.level,
            completed,
            score = summary.score,
            elapsed = summary.elapsed,
            "level ended"
        );
        self.commands.emit(FrameEvent::LevelEnded {
            summary: summary.clone(),
        });
        self.summary = Some(summary);
    }

    // -- Accessors --------------------------------------------------------

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn player(&self) -> &DynamicObject {
        &self.player
    }

    /// Mutable access to the player object, for scripted setups and tools.
    pub fn player_mut(&mut self) -> &mut DynamicObject {
        &mut self.player
    }

    pub fn statics(&self) -> &[StaticObject] {
        &self.statics
    }

    /// Dynamic objects other than the player.
    pub fn dynamics(&self) -> &[DynamicObject] {
        &self.dynamics
    }

    pub fn dynamics_mut(&mut self) -> &mut [DynamicObject] {
        &mut self.dynamics
    }

    pub fn physics(&self) -> &dyn PhysicsEngine {
        &*self.physics
    }

    /// Simulated seconds since the level started.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Number of updates run since the level started.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn score(&self) -> u64 {
        self.player.as_player().map_or(0, |player| player.score)
    }

    /// Score and inventory to hand to the next level.
    pub fn carry(&self) -> PlayerCarry {
        self.player.as_player().map(Player::carry).unwrap_or_default()
    }

    /// Set once the level reaches a terminal state.
    pub fn summary(&self) -> Option<&LevelSummary> {
        self.summary.as_ref()
    }

    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.last_diagnostics
    }

    /// Look up a dynamic object (including the player) by id.
    pub fn find_dynamic(&self, id: ObjectId) -> Option<&DynamicObject> {
        if self.player.id() == id {
            return Some(&self.player);
        }
        self.dynamics.iter().find(|object| object.id() == id)
    }

    pub fn find_static(&self, id: ObjectId) -> Option<&StaticObject> {
        self.statics.iter().find(|object| object.id() == id)
    }
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.layout.name)
            .field("state", &self.state)
            .field("frame", &self.frame)
            .field("statics", &self.statics.len())
            .field("dynamics", &self.dynamics.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Player sprite is 32x32; the hitbox covers the body below the head in
/// top-down mode and the full height in gravity modes.
fn player_hitbox(mode: GameMode) -> Hitbox {
    match mode {
        GameMode::TopDown => Hitbox::new(Vec2::new(6.0, 8.0), Vec2::new(20.0, 24.0)),
        GameMode::Platformer | GameMode::SideScroller => Hitbox::new(Vec2::new(6.0, 2.0), Vec2::new(20.0, 30.0)),
    }
}

fn build_player(id: ObjectId, layout: &LevelLayout, config: &EngineConfig, carry: PlayerCarry) -> DynamicObject {
    let controls = if layout.mode.uses_gravity() {
        Controls::Platformer {
            jump_speed: config.jump_speed,
            coyote: CoyoteTracker::new(config.coyote_time),
        }
    } else {
        Controls::TopDown
    };
    let player = Player::new(config.player.clone(), controls, config.invulnerability_time).with_carry(carry);
    let mut object = DynamicObject::player(id, layout.player, player_hitbox(layout.mode), player);
    if layout.mode.uses_gravity() {
        object.body.orientation = Vec2::RIGHT;
        object.animation.set("idle_right");
    } else {
        object.animation.set("idle_down");
    }
    object
}

/// Dynamic side first, then the static side. Bounds are re-read for every pair
/// because push-out moves the dynamic object.
fn collide_with_statics(
    object: &mut DynamicObject,
    statics: &mut [StaticObject],
    physics: &dyn PhysicsEngine,
    commands: &mut FrameCommands,
) {
    for other in statics.iter_mut() {
        if commands.is_marked(object.id()) {
            return;
        }
        if commands.is_marked(other.id()) || !physics.detect_collision(&object.bounds(), &other.bounds()) {
            continue;
        }
        object.collide_with_static(other, commands);
        other.collide_with_dynamic(object, commands);
    }
}

fn collide_pair(a: &mut DynamicObject, b: &mut DynamicObject, physics: &dyn PhysicsEngine, commands: &mut FrameCommands) {
    if commands.is_marked(a.id()) || commands.is_marked(b.id()) {
        return;
    }
    if !physics.detect_collision(&a.bounds(), &b.bounds()) {
        return;
    }
    a.collide_with_dynamic(b, commands);
    b.collide_with_dynamic(a, commands);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::statics::StaticKind;

    const DT: f64 = 1.0 / 60.0;

    fn running(layout: LevelLayout) -> Level {
        let mut level = Level::new(layout, EngineConfig::default()).unwrap();
        level.load().unwrap();
        level
    }

    #[test]
    fn load_twice_is_rejected() {
        let mut level = running(LevelLayout::new("a", GameMode::TopDown, Vec2::ZERO));
        let err = level.load().unwrap_err();
        assert!(matches!(
            err,
            LevelError::InvalidTransition {
                from: LevelState::Running,
                to: LevelState::Running
            }
        ));
    }

    #[test]
    fn unloaded_level_ignores_updates() {
        let mut level = Level::new(LevelLayout::new("a", GameMode::TopDown, Vec2::ZERO), EngineConfig::default()).unwrap();
        let report = level.update(DT, &ControlIntents::moving(Vec2::RIGHT));
        assert_eq!(report.state, LevelState::Unloaded);
        assert!(report.events.is_empty());
        assert_eq!(level.frame(), 0);
        assert_eq!(level.player().position(), Vec2::ZERO);
    }

    #[test]
    fn start_events_arrive_with_first_report() {
        let mut level = running(LevelLayout::new("a", GameMode::TopDown, Vec2::ZERO));
        let report = level.update(DT, &ControlIntents::idle());
        assert!(matches!(report.events[0], FrameEvent::LevelStarted { .. }));
        assert_eq!(report.sounds().collect::<Vec<_>>(), vec![cue::LEVEL_START]);
    }

    #[test]
    fn invalid_dt_changes_nothing() {
        let mut level = running(LevelLayout::new("a", GameMode::TopDown, Vec2::ZERO));
        level.update(f64::NAN, &ControlIntents::moving(Vec2::RIGHT));
        level.update(-1.0, &ControlIntents::moving(Vec2::RIGHT));
        assert_eq!(level.frame(), 0);
        assert_eq!(level.clock(), 0.0);
    }

    #[test]
    fn top_down_movement_uses_player_speed() {
        let mut level = running(LevelLayout::new("a", GameMode::TopDown, Vec2::ZERO));
        level.update(0.5, &ControlIntents::moving(Vec2::RIGHT));
        assert_eq!(level.player().position(), Vec2::new(80.0, 0.0));
        assert_eq!(level.player().animation().key(), "walk_right");
    }

    #[test]
    fn ids_are_unique_and_player_first() {
        let layout = LevelLayout::new("a", GameMode::TopDown, Vec2::ZERO)
            .with_static(StaticKind::Wall, 50.0, 50.0, 10.0, 10.0)
            .with_enemy(crate::object::enemy::EnemyKind::Tower, 500.0, 500.0)
            .with_mover(200.0, 200.0, 8.0, 8.0);
        let level = running(layout);
        assert_eq!(level.player().id(), ObjectId::from_raw(0));
        assert_eq!(level.statics()[0].id(), ObjectId::from_raw(1));
        assert_eq!(level.dynamics()[0].id(), ObjectId::from_raw(2));
        assert_eq!(level.dynamics()[1].id(), ObjectId::from_raw(3));
        assert!(level.find_dynamic(ObjectId::from_raw(3)).is_some());
    }
}
