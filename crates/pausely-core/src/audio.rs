//! Audio cue collaborator.
//!
//! The engine only ever asks for a cue to be played; playback lives with
//! the presentation layer. Playback failures are logged by the
//! implementation and never block tick progression.

use serde::{Deserialize, Serialize};

/// The two cues the timer emits: "start" when work resumes, "stop" when
/// a pause or break begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Start,
    Stop,
}

/// Fire-and-forget cue playback.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Silent player for headless use and tests.
pub struct NullCuePlayer;

impl CuePlayer for NullCuePlayer {
    fn play(&self, _cue: Cue) {}
}
