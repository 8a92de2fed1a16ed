//! Deterministic replay with input recording and checkpoint verification.
//!
//! A [`ReplayRecorder`] captures the layout, the engine config, every frame's
//! [`InputFrame`] (its `dt` and intents), and periodic state-hash
//! checkpoints. The resulting [`ReplayLog`] is plain JSON. [`replay`] rebuilds
//! the level from the log, feeds the inputs back frame by frame, and compares
//! hashes at each checkpoint.
//!
//! ```
//! use vesper_engine::prelude::*;
//!
//! let layout = LevelLayout::new("replay", GameMode::TopDown, Vec2::ZERO);
//! let config = EngineConfig::default();
//! let mut level = Level::new(layout.clone(), config.clone()).unwrap();
//! level.load().unwrap();
//!
//! let mut recorder = ReplayRecorder::new(layout, config, 10);
//! let intents = ControlIntents::moving(Vec2::RIGHT).with_fire();
//! for _ in 0..50 {
//!     recorder.record_frame(level.frame(), 1.0 / 60.0, intents, Some(level.state_hash()));
//!     level.update(1.0 / 60.0, &intents);
//! }
//! let log = recorder.finish();
//!
//! let result = replay(&log).unwrap();
//! assert!(result.completed);
//! assert!(result.first_divergence.is_none());
//! ```

use std::collections::BTreeMap;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{EngineConfig, LevelLayout};
use crate::input::ControlIntents;
use crate::level::Level;

// ---------------------------------------------------------------------------
// Log types
// ---------------------------------------------------------------------------

/// Input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Frame length in seconds.
    pub dt: f64,
    pub intents: ControlIntents,
}

/// One entry in a [`ReplayLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayEntry {
    /// Input applied at `frame` (the frame counter before the update).
    Input { frame: u64, input: InputFrame },
    /// State hash taken at `frame`, before that frame's update.
    Checkpoint { frame: u64, state_hash: String },
}

/// Everything needed to reproduce a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub layout: LevelLayout,
    pub config: EngineConfig,
    /// Number of frames recorded. Replay runs exactly this many.
    pub total_frames: u64,
    pub entries: Vec<ReplayEntry>,
}

impl ReplayLog {
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("failed to serialize replay log")
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("failed to parse replay log")
    }
}

/// Outcome of [`replay`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    /// `true` when every recorded frame ran without a divergence.
    pub completed: bool,
    pub frames_replayed: u64,
    pub first_divergence: Option<ReplayDivergence>,
}

/// The first checkpoint whose hash did not match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayDivergence {
    pub frame: u64,
    pub expected_hash: String,
    pub actual_hash: String,
}

// ---------------------------------------------------------------------------
// ReplayRecorder
// ---------------------------------------------------------------------------

/// Records a run into a [`ReplayLog`].
///
/// Call [`record_frame`](Self::record_frame) before each update. Frames must
/// be recorded in strictly increasing order.
#[derive(Debug)]
pub struct ReplayRecorder {
    log: ReplayLog,
    /// Checkpoint every N frames. 0 means whenever a hash is supplied.
    checkpoint_interval: u64,
    last_frame: Option<u64>,
}

impl ReplayRecorder {
    pub fn new(layout: LevelLayout, config: EngineConfig, checkpoint_interval: u64) -> Self {
        Self {
            log: ReplayLog {
                layout,
                config,
                total_frames: 0,
                entries: Vec::new(),
            },
            checkpoint_interval,
            last_frame: None,
        }
    }

    /// Record one frame. Out-of-order frames are dropped with a warning.
    pub fn record_frame(&mut self, frame: u64, dt: f64, intents: ControlIntents, state_hash: Option<String>) {
        if let Some(previous) = self.last_frame {
            if frame <= previous {
                warn!(frame, previous, "replay frame recorded out of order; dropped");
                return;
            }
        }
        self.last_frame = Some(frame);
        self.log.total_frames += 1;

        if let Some(hash) = state_hash {
            if self.checkpoint_interval == 0 || frame % self.checkpoint_interval == 0 {
                self.log.entries.push(ReplayEntry::Checkpoint { frame, state_hash: hash });
            }
        }
        self.log.entries.push(ReplayEntry::Input {
            frame,
            input: InputFrame { dt, intents },
        });
    }

    pub fn frames_recorded(&self) -> u64 {
        self.log.total_frames
    }

    pub fn finish(self) -> ReplayLog {
        self.log
    }
}

// ---------------------------------------------------------------------------
// replay()
// ---------------------------------------------------------------------------

/// Rebuild the level from `log` and verify it reproduces every checkpoint.
///
/// # Errors
///
/// Returns an error if the log is malformed (duplicate entries, a missing
/// input frame) or if the level cannot be built or loaded.
pub fn replay(log: &ReplayLog) -> anyhow::Result<ReplayResult> {
    let mut inputs: BTreeMap<u64, InputFrame> = BTreeMap::new();
    let mut checkpoints: BTreeMap<u64, &str> = BTreeMap::new();
    for entry in &log.entries {
        match entry {
            ReplayEntry::Input { frame, input } => {
                if inputs.insert(*frame, *input).is_some() {
                    return Err(anyhow!("replay log contains duplicate Input entry at frame {frame}"));
                }
            }
            ReplayEntry::Checkpoint { frame, state_hash } => {
                if checkpoints.insert(*frame, state_hash.as_str()).is_some() {
                    return Err(anyhow!("replay log contains duplicate Checkpoint entry at frame {frame}"));
                }
            }
        }
    }
    if inputs.len() as u64 != log.total_frames {
        return Err(anyhow!(
            "replay log has {} input frames but claims {} total frames",
            inputs.len(),
            log.total_frames
        ));
    }

    let mut level = Level::new(log.layout.clone(), log.config.clone()).context("failed to rebuild level for replay")?;
    level.load().context("failed to load level for replay")?;

    let mut frames_replayed = 0;
    for (&frame, input) in &inputs {
        if level.frame() != frame {
            return Err(anyhow!(
                "replay expected frame {frame} but the level is at frame {}",
                level.frame()
            ));
        }
        if let Some(&expected) = checkpoints.get(&frame) {
            let actual = level.state_hash();
            if actual != expected {
                warn!(frame, "replay diverged");
                return Ok(ReplayResult {
                    completed: false,
                    frames_replayed,
                    first_divergence: Some(ReplayDivergence {
                        frame,
                        expected_hash: expected.to_owned(),
                        actual_hash: actual,
                    }),
                });
            }
        }
        level.update(input.dt, &input.intents);
        frames_replayed += 1;
    }

    info!(frames = frames_replayed, level = %log.layout.name, "replay verified");
    Ok(ReplayResult {
        completed: true,
        frames_replayed,
        first_divergence: None,
    })
}
