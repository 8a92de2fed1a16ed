//! A run through a sequence of levels.
//!
//! [`Session`] owns the current [`Level`], advances to the next layout when
//! the goal is reached (carrying the score and inventory over), accumulates
//! simulated playtime, and reports the run to a [`Scoreboard`] exactly once
//! when it ends: on game over or after the last level is cleared.
//!
//! ```
//! use vesper_engine::prelude::*;
//!
//! let first = LevelLayout::new("one", GameMode::TopDown, Vec2::ZERO)
//!     .with_static(StaticKind::Goal, 20.0, 0.0, 16.0, 32.0);
//! let second = LevelLayout::new("two", GameMode::TopDown, Vec2::ZERO)
//!     .with_static(StaticKind::Goal, 20.0, 0.0, 16.0, 32.0);
//!
//! let mut session = Session::new("ada", vec![first, second], EngineConfig::default(), MemoryScoreboard::new()).unwrap();
//! while session.state() == SessionState::Playing {
//!     session.update(1.0 / 60.0, &ControlIntents::moving(Vec2::RIGHT)).unwrap();
//! }
//! assert_eq!(session.level_index(), 1);
//! assert_eq!(session.scoreboard().entries().len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{EngineConfig, LevelLayout};
use crate::input::{ControlIntents, IntentSource};
use crate::level::{FrameReport, Level, LevelState};
use crate::scoreboard::{ScoreEntry, Scoreboard};
use crate::SessionError;

/// Whether a session still accepts play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Playing,
    /// The run ended and was reported.
    Finished,
}

/// A player's run through an ordered list of levels.
#[derive(Debug)]
pub struct Session<B: Scoreboard> {
    player_name: String,
    layouts: Vec<LevelLayout>,
    config: EngineConfig,
    index: usize,
    level: Level,
    playtime: f64,
    state: SessionState,
    scoreboard: B,
}

impl<B: Scoreboard> Session<B> {
    /// Build and load the first level.
    pub fn new(
        player_name: impl Into<String>,
        layouts: Vec<LevelLayout>,
        config: EngineConfig,
        scoreboard: B,
    ) -> Result<Self, SessionError> {
        let first = layouts.first().cloned().ok_or(SessionError::NoLevels)?;
        let mut level = Level::new(first, config.clone())?;
        level.load()?;
        let player_name = player_name.into();
        info!(player = %player_name, levels = layouts.len(), "session started");
        Ok(Self {
            player_name,
            layouts,
            config,
            index: 0,
            level,
            playtime: 0.0,
            state: SessionState::Playing,
            scoreboard,
        })
    }

    /// Update the current level and handle its end.
    ///
    /// After the session finishes this returns the finished level's empty
    /// report.
    pub fn update(&mut self, dt: f64, intents: &ControlIntents) -> Result<FrameReport, SessionError> {
        let before = self.level.clock();
        let report = self.level.update(dt, intents);
        if self.state == SessionState::Finished {
            return Ok(report);
        }
        self.playtime += self.level.clock() - before;

        match report.state {
            LevelState::Advancing if self.index + 1 < self.layouts.len() => self.advance()?,
            LevelState::Advancing | LevelState::GameOver => self.finish(),
            _ => {}
        }
        Ok(report)
    }

    /// Pull each frame's intents from `source` until the session finishes or
    /// `max_frames` updates have run.
    pub fn run(&mut self, dt: f64, source: &mut dyn IntentSource, max_frames: u64) -> Result<SessionState, SessionError> {
        for _ in 0..max_frames {
            if self.state == SessionState::Finished {
                break;
            }
            let intents = source.next_intents(self.level.frame());
            self.update(dt, &intents)?;
        }
        Ok(self.state)
    }

    fn advance(&mut self) -> Result<(), SessionError> {
        let carry = self.level.carry();
        self.index += 1;
        let layout = self.layouts[self.index].clone();
        let mut next = Level::with_carry(layout, self.config.clone(), carry)?;
        next.load()?;
        info!(
            player = %self.player_name,
            level = %next.layout().name,
            index = self.index,
            "session advanced"
        );
        self.level = next;
        Ok(())
    }

    fn finish(&mut self) {
        self.state = SessionState::Finished;
        let entry = ScoreEntry {
            name: self.player_name.clone(),
            elapsed_playtime: self.playtime,
            score: self.level.score(),
        };
        info!(
            player = %entry.name,
            score = entry.score,
            elapsed = entry.elapsed_playtime,
            cleared = self.level.state() == LevelState::Advancing,
            "session finished"
        );
        self.scoreboard.submit(entry);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current(&self) -> &Level {
        &self.level
    }

    pub fn current_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    /// Position of the current level in the layout list.
    pub fn level_index(&self) -> usize {
        self.index
    }

    /// Simulated seconds played across every level so far.
    pub fn elapsed_playtime(&self) -> f64 {
        self.playtime
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn scoreboard(&self) -> &B {
        &self.scoreboard
    }

    pub fn into_scoreboard(self) -> B {
        self.scoreboard
    }
}
