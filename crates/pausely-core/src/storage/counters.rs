//! Durable in-progress counters.
//!
//! Written at 1 Hz while a manual session runs (one key per tick) and on
//! every completed auto cycle; each write supersedes the previous value.
//! After `stop()` all three keys are reset to "0" - not deleted - so the
//! next session's `load_all` sees clean zeros instead of stale data.

use crate::error::StorageError;
use crate::storage::KvStore;

pub const MANUAL_WORK_SECONDS_KEY: &str = "manualWorkSeconds";
pub const MANUAL_PAUSE_SECONDS_KEY: &str = "manualPauseSeconds";
pub const AUTO_WORK_CYCLES_KEY: &str = "autoWorkCycles";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub manual_work_secs: u64,
    pub manual_pause_secs: u64,
    pub auto_work_cycles: u64,
}

pub fn save_work_seconds(store: &dyn KvStore, secs: u64) -> Result<(), StorageError> {
    store.kv_set(MANUAL_WORK_SECONDS_KEY, &secs.to_string())
}

pub fn save_pause_seconds(store: &dyn KvStore, secs: u64) -> Result<(), StorageError> {
    store.kv_set(MANUAL_PAUSE_SECONDS_KEY, &secs.to_string())
}

pub fn save_work_cycles(store: &dyn KvStore, cycles: u64) -> Result<(), StorageError> {
    store.kv_set(AUTO_WORK_CYCLES_KEY, &cycles.to_string())
}

/// Last-saved values, with 0 for any missing or unparsable key.
pub fn load_all(store: &dyn KvStore) -> Result<Counters, StorageError> {
    let read = |key: &str| -> Result<u64, StorageError> {
        Ok(store
            .kv_get(key)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    };
    Ok(Counters {
        manual_work_secs: read(MANUAL_WORK_SECONDS_KEY)?,
        manual_pause_secs: read(MANUAL_PAUSE_SECONDS_KEY)?,
        auto_work_cycles: read(AUTO_WORK_CYCLES_KEY)?,
    })
}

/// Reset all three keys to "0".
pub fn reset_all(store: &dyn KvStore) -> Result<(), StorageError> {
    for key in [
        MANUAL_WORK_SECONDS_KEY,
        MANUAL_PAUSE_SECONDS_KEY,
        AUTO_WORK_CYCLES_KEY,
    ] {
        store.kv_set(key, "0")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    #[test]
    fn missing_keys_read_as_zero() {
        let db = Database::open_memory().unwrap();
        assert_eq!(load_all(&db).unwrap(), Counters::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let db = Database::open_memory().unwrap();
        save_work_seconds(&db, 120).unwrap();
        save_pause_seconds(&db, 30).unwrap();
        save_work_cycles(&db, 4).unwrap();
        let c = load_all(&db).unwrap();
        assert_eq!(c.manual_work_secs, 120);
        assert_eq!(c.manual_pause_secs, 30);
        assert_eq!(c.auto_work_cycles, 4);
    }

    #[test]
    fn reset_writes_zero_not_delete() {
        let db = Database::open_memory().unwrap();
        save_work_seconds(&db, 99).unwrap();
        reset_all(&db).unwrap();
        assert_eq!(db.kv_get(MANUAL_WORK_SECONDS_KEY).unwrap().as_deref(), Some("0"));
        assert_eq!(db.kv_get(MANUAL_PAUSE_SECONDS_KEY).unwrap().as_deref(), Some("0"));
        assert_eq!(db.kv_get(AUTO_WORK_CYCLES_KEY).unwrap().as_deref(), Some("0"));
        assert_eq!(load_all(&db).unwrap(), Counters::default());
    }

    #[test]
    fn unparsable_value_reads_as_zero() {
        let db = Database::open_memory().unwrap();
        db.kv_set(MANUAL_WORK_SECONDS_KEY, "garbage").unwrap();
        assert_eq!(load_all(&db).unwrap().manual_work_secs, 0);
    }
}
