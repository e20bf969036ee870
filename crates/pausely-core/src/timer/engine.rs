//! Timer engine implementation.
//!
//! The timer engine is a pure state machine. It does not own a clock or
//! any I/O - the caller drives it by invoking `tick()` once per second and
//! executing the returned effects (audio cues, counter persistence).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> SelectingMode -> Manual(Running <-> Paused) -> Idle
//!                       \> Auto(Work <-> Break)       -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(policy);
//! engine.start();
//! engine.select_mode(TimerMode::Manual);
//! // Once per second:
//! let effects = engine.tick();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format::{format_hms, format_mm_ss};
use super::policy::DurationPolicy;
use crate::audio::Cue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Manual,
    Auto,
}

impl TimerMode {
    /// Wire value used by the session log and the sync endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Manual => "manual",
            TimerMode::Auto => "auto",
        }
    }
}

/// Alternating timer phase. Only meaningful in Auto mode; never terminal
/// while a session runs - it cycles until `stop()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

/// Side effect requested by a state transition.
///
/// The engine stays pure; the controller executes these against the
/// audio collaborator and the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PlayCue(Cue),
    PersistWorkSeconds(u64),
    PersistPauseSeconds(u64),
    PersistWorkCycles(u64),
}

/// Core timer state machine.
///
/// Owned exclusively by one controller; never shared across concurrent
/// mutators.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    policy: DurationPolicy,
    /// None while idle or selecting a mode.
    mode: Option<TimerMode>,
    /// True between `start()` and `select_mode()`.
    selecting: bool,
    phase: Phase,
    remaining_secs: u64,
    is_running: bool,
    session_start: Option<DateTime<Utc>>,
    /// Completed work phases (Auto mode only).
    work_cycles: u64,
    /// Accumulated seconds while running (Manual mode only).
    manual_work_secs: u64,
    /// Accumulated seconds while paused (Manual mode only).
    manual_pause_secs: u64,
}

/// Read-only projection handed to the presentation layer on every tick.
#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub mode: Option<TimerMode>,
    pub selecting: bool,
    pub phase: Phase,
    pub remaining_secs: u64,
    /// Countdown rendered as `MM:SS`, minutes unbounded.
    pub remaining_display: String,
    pub is_running: bool,
    pub work_cycles: u64,
    pub manual_work_secs: u64,
    pub manual_pause_secs: u64,
    /// Accumulated work time rendered as `HH:MM:SS`.
    pub work_display: String,
    pub pause_display: String,
}

impl TimerEngine {
    pub fn new(policy: DurationPolicy) -> Self {
        Self {
            policy,
            mode: None,
            selecting: false,
            phase: Phase::Work,
            remaining_secs: policy.work_secs,
            is_running: false,
            session_start: None,
            work_cycles: 0,
            manual_work_secs: 0,
            manual_pause_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Option<TimerMode> {
        self.mode
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        self.session_start
    }

    pub fn work_cycles(&self) -> u64 {
        self.work_cycles
    }

    pub fn manual_work_secs(&self) -> u64 {
        self.manual_work_secs
    }

    pub fn manual_pause_secs(&self) -> u64 {
        self.manual_pause_secs
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            selecting: self.selecting,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            remaining_display: format_mm_ss(self.remaining_secs),
            is_running: self.is_running,
            work_cycles: self.work_cycles,
            manual_work_secs: self.manual_work_secs,
            manual_pause_secs: self.manual_pause_secs,
            work_display: format_hms(self.manual_work_secs),
            pause_display: format_hms(self.manual_pause_secs),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle -> SelectingMode. Resets counters and countdown.
    ///
    /// Records the session start only if unset: a second `start()` before
    /// a `stop()` must not overwrite an in-progress session's start time.
    pub fn start(&mut self) {
        if self.mode.is_some() {
            return;
        }
        self.selecting = true;
        self.manual_work_secs = 0;
        self.manual_pause_secs = 0;
        self.remaining_secs = self.policy.work_secs;
        if self.session_start.is_none() {
            self.session_start = Some(Utc::now());
        }
    }

    /// SelectingMode -> Manual·Running or Auto·Work·Running.
    pub fn select_mode(&mut self, mode: TimerMode) -> Vec<Effect> {
        if !self.selecting || self.mode.is_some() {
            return Vec::new();
        }
        self.selecting = false;
        self.mode = Some(mode);
        self.manual_work_secs = 0;
        self.manual_pause_secs = 0;
        self.remaining_secs = self.policy.work_secs;
        self.session_start = Some(Utc::now());
        self.is_running = true;
        match mode {
            TimerMode::Manual => vec![Effect::PlayCue(Cue::Start)],
            TimerMode::Auto => {
                self.phase = Phase::Work;
                self.work_cycles = 0;
                Vec::new()
            }
        }
    }

    /// Restore in-progress manual counters persisted by an interrupted
    /// session. No-op outside Manual mode.
    pub fn restore_manual_counters(&mut self, work_secs: u64, pause_secs: u64) {
        if self.mode == Some(TimerMode::Manual) {
            self.manual_work_secs = work_secs;
            self.manual_pause_secs = pause_secs;
        }
    }

    /// Manual only: Running <-> Paused, with a start/stop cue.
    pub fn toggle_running(&mut self) -> Vec<Effect> {
        if self.mode != Some(TimerMode::Manual) {
            return Vec::new();
        }
        self.is_running = !self.is_running;
        let cue = if self.is_running { Cue::Start } else { Cue::Stop };
        vec![Effect::PlayCue(cue)]
    }

    /// Advance the state machine by one second.
    pub fn tick(&mut self) -> Vec<Effect> {
        match self.mode {
            Some(TimerMode::Manual) => self.tick_manual(),
            Some(TimerMode::Auto) => self.tick_auto(),
            None => Vec::new(),
        }
    }

    /// Clear all session state back to Idle.
    pub fn reset(&mut self) {
        self.mode = None;
        self.selecting = false;
        self.is_running = false;
        self.phase = Phase::Work;
        self.remaining_secs = self.policy.work_secs;
        self.manual_work_secs = 0;
        self.manual_pause_secs = 0;
        self.work_cycles = 0;
        self.session_start = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick_manual(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.is_running {
            // The manual countdown is cyclical and cosmetic: hitting zero
            // signals a cue and restarts, without gating the counters.
            if self.remaining_secs <= 1 {
                self.remaining_secs = self.policy.work_secs;
                effects.push(Effect::PlayCue(Cue::Start));
            } else {
                self.remaining_secs -= 1;
            }
            self.manual_work_secs += 1;
            effects.push(Effect::PersistWorkSeconds(self.manual_work_secs));
        } else {
            // Countdown frozen while paused; only the pause counter runs.
            self.manual_pause_secs += 1;
            effects.push(Effect::PersistPauseSeconds(self.manual_pause_secs));
        }
        effects
    }

    fn tick_auto(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.remaining_secs <= 1 {
            match self.phase {
                Phase::Work => {
                    // Cycle count increments exactly once per completed
                    // work phase, never on break completion.
                    self.work_cycles += 1;
                    self.phase = Phase::Break;
                    effects.push(Effect::PlayCue(Cue::Stop));
                    effects.push(Effect::PersistWorkCycles(self.work_cycles));
                }
                Phase::Break => {
                    self.phase = Phase::Work;
                    effects.push(Effect::PlayCue(Cue::Start));
                }
            }
            self.remaining_secs = self.policy.for_phase(self.phase);
        } else {
            self.remaining_secs -= 1;
        }
        effects
    }
}
