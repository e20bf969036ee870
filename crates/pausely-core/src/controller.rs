//! Session lifecycle controller.
//!
//! Owns the timer engine and the single periodic tick task. The engine
//! stays pure; this controller executes its effects (audio cues, counter
//! persistence) and drives the stop flow: finalize -> authoritative log
//! append -> counter reset -> best-effort sync -> note capture.
//!
//! The ticker is re-armed with a cancel-then-reschedule on every
//! mode/running-state transition, so at most one tick chain is ever
//! alive. A stale interval surviving a transition would double-decrement
//! the countdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::audio::CuePlayer;
use crate::error::{CoreError, SyncError};
use crate::journal;
use crate::session::SessionRecord;
use crate::storage::counters;
use crate::storage::{Config, Database, KvStore};
use crate::sync::SyncClient;
use crate::timer::{Effect, TimerEngine, TimerMode, TimerSnapshot};

/// Read-only key holding the logged-in user JSON, written by the login
/// flow.
const USER_KEY: &str = "user";
/// Read-only key holding the bearer token for sync.
const TOKEN_KEY: &str = "token";

pub struct SessionController {
    engine: Arc<Mutex<TimerEngine>>,
    db: Arc<Database>,
    sync: SyncClient,
    cues: Arc<dyn CuePlayer>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    /// The just-finalized record while the UI awaits a note.
    pending: Arc<Mutex<Option<SessionRecord>>>,
}

impl SessionController {
    pub fn new(db: Arc<Database>, config: &Config, cues: Arc<dyn CuePlayer>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(TimerEngine::new(config.policy()))),
            db,
            sync: SyncClient::new(config.sync.api_url.clone()),
            cues,
            ticker: Arc::new(Mutex::new(None)),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        self.engine.lock().await.snapshot()
    }

    /// Whether a finalized session is waiting for its note.
    pub async fn awaiting_note(&self) -> bool {
        self.pending.lock().await.is_some()
    }

    /// Idle -> SelectingMode.
    pub async fn start(&self) {
        self.engine.lock().await.start();
    }

    /// Pick a mode and begin ticking. Entering Manual restores any
    /// in-progress counters left behind by an interrupted session.
    pub async fn select_mode(&self, mode: TimerMode) {
        let (effects, active) = {
            let mut engine = self.engine.lock().await;
            let effects = engine.select_mode(mode);
            if engine.mode() == Some(TimerMode::Manual) {
                match counters::load_all(self.db.as_ref()) {
                    Ok(c) => {
                        engine.restore_manual_counters(c.manual_work_secs, c.manual_pause_secs)
                    }
                    Err(e) => log::warn!("failed to load persisted counters: {e}"),
                }
            }
            (effects, engine.mode().is_some())
        };
        run_effects(&effects, self.db.as_ref(), self.cues.as_ref());
        if active {
            self.spawn_ticker().await;
        }
    }

    /// Manual only: Running <-> Paused.
    pub async fn toggle_running(&self) {
        let (effects, active) = {
            let mut engine = self.engine.lock().await;
            (engine.toggle_running(), engine.mode().is_some())
        };
        run_effects(&effects, self.db.as_ref(), self.cues.as_ref());
        if active {
            self.spawn_ticker().await;
        }
    }

    /// Finalize the running session.
    ///
    /// With no active session this is a no-op that still clears the
    /// selection state and leaves the stored counters untouched.
    /// Otherwise: the record is appended to the session log (must
    /// succeed), the persisted counters reset to zero, a sync attempted
    /// when a token is stored, and the record returned for note capture.
    pub async fn stop(&self) -> Result<Option<SessionRecord>, CoreError> {
        self.cancel_ticker().await;

        let finalized = {
            let mut engine = self.engine.lock().await;
            let user_id = read_user_id(self.db.as_ref());
            let record = SessionRecord::finalize(&engine, user_id);
            engine.reset();
            record
        };
        let Some(record) = finalized else {
            return Ok(None);
        };

        // Authoritative write: if this fails, the session is lost and the
        // error surfaces to the caller.
        journal::append_session(self.db.as_ref(), &record)?;

        if let Err(e) = counters::reset_all(self.db.as_ref()) {
            log::warn!("failed to reset persisted counters: {e}");
        }

        // Sync is sequenced here but its outcome only feeds a log line;
        // the user never sees a failure of this step.
        let token = read_token(self.db.as_ref());
        match self.sync.sync_session(&record, token.as_deref()).await {
            Ok(()) => log::info!("session synced"),
            Err(SyncError::Unavailable) => {
                log::info!("no auth token stored; session kept local only")
            }
            Err(e) => log::warn!("session sync failed: {e}"),
        }

        *self.pending.lock().await = Some(record.clone());
        Ok(Some(record))
    }

    /// Attach a note to the just-finalized session. On failure the
    /// session stays pending so the user can retry.
    pub async fn attach_note(&self, note: &str) -> Result<(), CoreError> {
        let record = {
            let pending = self.pending.lock().await;
            pending
                .clone()
                .ok_or_else(|| CoreError::Custom("no session awaiting a note".into()))?
        };
        journal::attach_note(self.db.as_ref(), &record, note)?;
        *self.pending.lock().await = None;
        Ok(())
    }

    /// Discard the pending note prompt. The session record itself is
    /// already persisted note-less.
    pub async fn cancel_note(&self) {
        *self.pending.lock().await = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn spawn_ticker(&self) {
        let mut guard = self.ticker.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let engine = Arc::clone(&self.engine);
        let db = Arc::clone(&self.db);
        let cues = Arc::clone(&self.cues);

        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                let effects = {
                    let mut engine = engine.lock().await;
                    if engine.mode().is_none() {
                        break;
                    }
                    engine.tick()
                };
                run_effects(&effects, db.as_ref(), cues.as_ref());
            }
        });

        *guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}

/// Counter persistence happens synchronously inside the tick handler, so
/// a write always lands before the next tick reads it. Failures degrade
/// durability silently: the in-memory counters keep running.
fn run_effects(effects: &[Effect], db: &Database, cues: &dyn CuePlayer) {
    for effect in effects {
        let persisted = match effect {
            Effect::PlayCue(cue) => {
                cues.play(*cue);
                Ok(())
            }
            Effect::PersistWorkSeconds(v) => counters::save_work_seconds(db, *v),
            Effect::PersistPauseSeconds(v) => counters::save_pause_seconds(db, *v),
            Effect::PersistWorkCycles(v) => counters::save_work_cycles(db, *v),
        };
        if let Err(e) = persisted {
            log::warn!("counter persistence failed: {e}");
        }
    }
}

fn read_user_id(store: &dyn KvStore) -> Option<String> {
    let raw = match store.kv_get(USER_KEY) {
        Ok(v) => v?,
        Err(e) => {
            log::warn!("failed to read stored user: {e}");
            return None;
        }
    };
    let user: serde_json::Value = serde_json::from_str(&raw).ok()?;
    match user.get("id") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn read_token(store: &dyn KvStore) -> Option<String> {
    match store.kv_get(TOKEN_KEY) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("failed to read stored token: {e}");
            None
        }
    }
}
