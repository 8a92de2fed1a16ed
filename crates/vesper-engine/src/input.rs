//! Control intents: the only input the core consumes.
//!
//! Raw devices are outside the core. Whatever reads the keyboard or gamepad
//! turns it into one [`ControlIntents`] per frame, usually through an
//! [`IntentSource`].

use serde::{Deserialize, Serialize};
use vesper_geom::prelude::*;

/// What the player wants to do this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlIntents {
    /// Desired movement direction. Longer than unit length is clamped.
    pub movement: Vec2,
    pub jump: bool,
    /// Drink the strongest potion in the inventory.
    pub use_item: bool,
    pub fire: bool,
}

impl ControlIntents {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(movement: Vec2) -> Self {
        Self {
            movement,
            ..Self::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    pub fn with_fire(mut self) -> Self {
        self.fire = true;
        self
    }

    pub fn with_use_item(mut self) -> Self {
        self.use_item = true;
        self
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    /// Movement with its length limited to 1. Non-finite input counts as no
    /// movement.
    pub fn clamped_movement(&self) -> Vec2 {
        if !self.movement.is_finite() {
            return Vec2::ZERO;
        }
        if self.movement.length_squared() > 1.0 {
            self.movement.normalized()
        } else {
            self.movement
        }
    }
}

/// Yields the intents for each frame.
pub trait IntentSource {
    fn next_intents(&mut self, frame: u64) -> ControlIntents;
}

/// A fixed script of intents, for tests, demos, and replays.
///
/// Once the script runs out every further frame is idle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIntents {
    frames: Vec<ControlIntents>,
    cursor: usize,
}

impl ScriptedIntents {
    pub fn new(frames: Vec<ControlIntents>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Append `intents` for `count` frames.
    pub fn then(mut self, intents: ControlIntents, count: usize) -> Self {
        self.frames.extend(std::iter::repeat(intents).take(count));
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }
}

impl IntentSource for ScriptedIntents {
    fn next_intents(&mut self, _frame: u64) -> ControlIntents {
        let intents = self.frames.get(self.cursor).copied().unwrap_or_default();
        self.cursor = self.cursor.saturating_add(1);
        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_plays_then_goes_idle() {
        let mut script = ScriptedIntents::default()
            .then(ControlIntents::moving(Vec2::RIGHT), 2)
            .then(ControlIntents::idle().with_jump(), 1);
        assert_eq!(script.remaining(), 3);
        assert_eq!(script.next_intents(0).movement, Vec2::RIGHT);
        assert_eq!(script.next_intents(1).movement, Vec2::RIGHT);
        assert!(script.next_intents(2).jump);
        assert!(script.next_intents(3).is_idle());
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn diagonal_movement_is_clamped() {
        let intents = ControlIntents::moving(Vec2::new(1.0, 1.0));
        assert!((intents.clamped_movement().length() - 1.0).abs() < 1e-12);
        let half = ControlIntents::moving(Vec2::new(0.5, 0.0));
        assert_eq!(half.clamped_movement(), Vec2::new(0.5, 0.0));
        let bad = ControlIntents::moving(Vec2::new(f64::NAN, 0.0));
        assert_eq!(bad.clamped_movement(), Vec2::ZERO);
    }
}
