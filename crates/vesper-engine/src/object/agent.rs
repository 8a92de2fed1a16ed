//! Health and timed effects for agents.

use serde::{Deserialize, Serialize};

use super::{Effect, EffectKind};

/// Health pool plus active effects.
///
/// Health is always kept inside `[0, max_health]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    health: f64,
    max_health: f64,
    effects: Vec<Effect>,
}

impl Agent {
    /// A full-health agent. Negative or NaN maxima are treated as zero.
    pub fn new(max_health: f64) -> Self {
        let max_health = if max_health > 0.0 { max_health } else { 0.0 };
        Self {
            health: max_health,
            max_health,
            effects: Vec::new(),
        }
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Remove up to `amount` health. Returns the health actually removed.
    ///
    /// Not gated by [`EffectKind::Invulnerable`]; callers that honor
    /// invulnerability check [`has_effect`](Self::has_effect) first.
    pub fn take_damage(&mut self, amount: f64) -> f64 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        before - self.health
    }

    /// Restore up to `amount` health. Returns the health actually restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health + amount).clamp(0.0, self.max_health);
        self.health - before
    }

    /// Overwrite health, clamped.
    pub fn set_health(&mut self, health: f64) {
        self.health = if health.is_nan() { 0.0 } else { health.clamp(0.0, self.max_health) };
    }

    /// Start an effect, or extend it if one of that kind is already running.
    pub fn add_effect(&mut self, kind: EffectKind, duration: f64) {
        if let Some(effect) = self.effects.iter_mut().find(|e| e.kind == kind) {
            effect.remaining = effect.remaining.max(duration);
        } else if duration > 0.0 {
            self.effects.push(Effect { kind, remaining: duration });
        }
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Count down effect timers and drop the expired ones.
    pub fn tick_effects(&mut self, dt: f64) {
        for effect in &mut self.effects {
            effect.remaining -= dt;
        }
        self.effects.retain(|e| e.remaining > 0.0);
    }
}

/// Repeating ability timer (firing, casting).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    period: f64,
    remaining: f64,
}

impl Cooldown {
    /// A cooldown that starts ready.
    pub fn new(period: f64) -> Self {
        Self { period, remaining: 0.0 }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Start the wait for the next use.
    pub fn trigger(&mut self) {
        self.remaining = self.period;
    }

    pub fn tick(&mut self, dt: f64) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
    }

    pub fn remaining(&self) -> f64 {
        self.remaining.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_cycles() {
        let mut cd = Cooldown::new(0.5);
        assert!(cd.is_ready());
        cd.trigger();
        assert!(!cd.is_ready());
        cd.tick(0.25);
        assert!(!cd.is_ready());
        cd.tick(0.25);
        assert!(cd.is_ready());
    }

    #[test]
    fn lethal_damage_lands_on_exactly_zero() {
        let mut agent = Agent::new(30.0);
        assert_eq!(agent.take_damage(30.0), 30.0);
        assert_eq!(agent.health(), 0.0);
        assert!(agent.is_dead());

        assert_eq!(agent.take_damage(5.0), 0.0);
        assert_eq!(agent.health(), 0.0);
    }

    #[test]
    fn overkill_and_overheal_clamp() {
        let mut agent = Agent::new(10.0);
        assert_eq!(agent.take_damage(25.0), 10.0);
        assert_eq!(agent.heal(100.0), 10.0);
        assert_eq!(agent.health(), 10.0);
    }

    #[test]
    fn negative_and_nan_amounts_are_ignored() {
        let mut agent = Agent::new(10.0);
        assert_eq!(agent.take_damage(-4.0), 0.0);
        assert_eq!(agent.take_damage(f64::NAN), 0.0);
        assert_eq!(agent.heal(f64::NAN), 0.0);
        assert_eq!(agent.health(), 10.0);
    }

    #[test]
    fn effects_expire_and_refresh() {
        let mut agent = Agent::new(10.0);
        agent.add_effect(EffectKind::Invulnerable, 1.0);
        agent.tick_effects(0.75);
        assert!(agent.has_effect(EffectKind::Invulnerable));

        // Refresh takes the longer of current and new duration.
        agent.add_effect(EffectKind::Invulnerable, 0.5);
        assert_eq!(agent.effects().len(), 1);
        agent.tick_effects(0.5);
        assert!(!agent.has_effect(EffectKind::Invulnerable));
    }
}
