//! Session records.
//!
//! One start-to-stop timer run produces exactly one record. The record is
//! finalized at stop time with an empty note, persisted immediately, and
//! mutated at most once afterwards when a note is attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerEngine, TimerMode};

/// A finalized timer session.
///
/// Uniquely identified by `start` within the local session log. Field
/// names mirror the on-disk log entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub mode: TimerMode,
    pub work_seconds: u64,
    pub pause_seconds: u64,
    pub work_cycles: u64,
    /// Empty until note attachment completes.
    #[serde(default)]
    pub note: String,
}

impl SessionRecord {
    /// Pure construction from the live timer state; `end` is now, the
    /// note starts empty. Returns `None` when no session is in progress.
    ///
    /// Must be called exactly once per effective `stop()`.
    pub fn finalize(engine: &TimerEngine, user_id: Option<String>) -> Option<Self> {
        let mode = engine.mode()?;
        let start = engine.session_start()?;
        Some(Self {
            user_id,
            start,
            end: Utc::now(),
            mode,
            work_seconds: engine.manual_work_secs(),
            pause_seconds: engine.manual_pause_secs(),
            work_cycles: match mode {
                TimerMode::Auto => engine.work_cycles(),
                TimerMode::Manual => 0,
            },
            note: String::new(),
        })
    }
}
