//! # Pausely Core Library
//!
//! Core business logic for the Pausely work/break timer. The library is
//! presentation-agnostic: a frontend (the bundled CLI, or a GUI shell)
//! invokes the controller's entry points and renders the snapshot it
//! exposes on every tick.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure state machine; each one-second tick
//!   returns the effects (audio cues, counter writes) for the caller to
//!   execute
//! - **Session Controller**: owns the engine and the single cancellable
//!   tick task, and drives the stop -> persist -> sync -> note flow
//! - **Storage**: SQLite key-value store for the session log and the
//!   in-progress counters, TOML configuration
//! - **Sync**: best-effort upload of finalized sessions; the local log
//!   stays authoritative
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`SessionController`]: session lifecycle driver
//! - [`Database`]: durable key-value store
//! - [`journal`]: session log and note attachment

pub mod audio;
pub mod controller;
pub mod error;
pub mod journal;
pub mod session;
pub mod storage;
pub mod sync;
pub mod timer;

pub use audio::{Cue, CuePlayer, NullCuePlayer};
pub use controller::SessionController;
pub use error::{ConfigError, CoreError, JournalError, StorageError, SyncError};
pub use session::SessionRecord;
pub use storage::{Config, Database, KvStore};
pub use sync::SyncClient;
pub use timer::{DurationPolicy, Effect, Phase, TimerEngine, TimerMode, TimerSnapshot};

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use crate::error::StorageError;
    use crate::storage::KvStore;

    /// In-memory store for tests, with switches to simulate a failing or
    /// silently write-dropping persistence layer.
    pub struct MemStore {
        entries: Mutex<HashMap<String, String>>,
        drop_writes: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl MemStore {
        pub fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                drop_writes: AtomicBool::new(false),
                fail_reads: AtomicBool::new(false),
            }
        }

        /// When set, writes report success but change nothing.
        pub fn drop_writes(&self, on: bool) {
            self.drop_writes.store(on, Ordering::SeqCst);
        }

        pub fn fail_reads(&self, on: bool) {
            self.fail_reads.store(on, Ordering::SeqCst);
        }
    }

    impl KvStore for MemStore {
        fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StorageError::ReadFailed {
                    key: key.to_string(),
                    message: "simulated read failure".into(),
                });
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.drop_writes.load(Ordering::SeqCst) {
                return Ok(());
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
