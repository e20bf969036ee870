//! Session log and note attachment.
//!
//! The log is an ordered sequence of [`SessionRecord`]s serialized as a
//! JSON array under the `sessions` key of the kv store, with
//! append-with-upsert-by-start-key semantics: `start` is the uniqueness
//! key, and any insert first removes entries sharing it.
//!
//! Note attachment is the correctness-critical path: after persisting, the
//! log is re-loaded and the entry checked for a matching start AND note.
//! A store that silently drops or truncates writes surfaces here as an
//! error, never as a false success.

use crate::error::{CoreError, JournalError, StorageError};
use crate::session::SessionRecord;
use crate::storage::KvStore;

pub const SESSIONS_KEY: &str = "sessions";

/// Load the full session log in storage order. A missing key is an empty
/// log.
pub fn load_log(store: &dyn KvStore) -> Result<Vec<SessionRecord>, CoreError> {
    match store.kv_get(SESSIONS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

fn persist_log(store: &dyn KvStore, log: &[SessionRecord]) -> Result<(), CoreError> {
    let raw = serde_json::to_string(log)?;
    store.kv_set(SESSIONS_KEY, &raw)?;
    Ok(())
}

/// Append a record, replacing any existing entry with the same `start`.
///
/// This is the authoritative write at stop time: it precedes any sync
/// attempt, and its failure means the session is lost.
pub fn append_session(store: &dyn KvStore, record: &SessionRecord) -> Result<(), CoreError> {
    let mut log = load_log(store)?;
    log.retain(|s| s.start != record.start);
    log.push(record.clone());
    persist_log(store, &log)
}

/// Merge `note` into `record`, upsert it into the log, and verify the
/// write by reading the log back.
pub fn attach_note(
    store: &dyn KvStore,
    record: &SessionRecord,
    note: &str,
) -> Result<(), CoreError> {
    let completed = SessionRecord {
        note: note.to_string(),
        ..record.clone()
    };

    let mut log = load_log(store)?;
    log.retain(|s| s.start != completed.start);
    log.push(completed.clone());
    persist_log(store, &log)?;

    let verified = load_log(store)?
        .iter()
        .any(|s| s.start == completed.start && s.note == completed.note);
    if verified {
        Ok(())
    } else {
        Err(StorageError::VerificationMismatch {
            start: completed.start,
        }
        .into())
    }
}

/// The journal view: reverse-chronological, filtered to records with a
/// non-empty note.
pub fn journal_view(store: &dyn KvStore) -> Result<Vec<SessionRecord>, CoreError> {
    let log = load_log(store)?;
    Ok(log
        .into_iter()
        .filter(|s| !s.note.trim().is_empty())
        .rev()
        .collect())
}

/// Map an index in the journal view back to the underlying storage order.
fn view_index_to_log_index(log: &[SessionRecord], view_index: usize) -> Option<usize> {
    log.iter()
        .enumerate()
        .filter(|(_, s)| !s.note.trim().is_empty())
        .map(|(i, _)| i)
        .rev()
        .nth(view_index)
}

fn view_len(log: &[SessionRecord]) -> usize {
    log.iter().filter(|s| !s.note.trim().is_empty()).count()
}

/// Replace the note of the view entry at `view_index`.
///
/// # Errors
/// `JournalError::IndexOutOfRange` if the index does not map to an
/// underlying entry; the log is left unchanged.
pub fn update_note_by_index(
    store: &dyn KvStore,
    view_index: usize,
    new_note: &str,
) -> Result<(), CoreError> {
    let mut log = load_log(store)?;
    let Some(idx) = view_index_to_log_index(&log, view_index) else {
        return Err(JournalError::IndexOutOfRange {
            index: view_index,
            len: view_len(&log),
        }
        .into());
    };
    log[idx].note = new_note.to_string();
    persist_log(store, &log)
}

/// Remove the view entry at `view_index`, returning the removed record.
///
/// # Errors
/// `JournalError::IndexOutOfRange` if the index does not map to an
/// underlying entry; the log is left unchanged.
pub fn delete_by_index(
    store: &dyn KvStore,
    view_index: usize,
) -> Result<SessionRecord, CoreError> {
    let mut log = load_log(store)?;
    let Some(idx) = view_index_to_log_index(&log, view_index) else {
        return Err(JournalError::IndexOutOfRange {
            index: view_index,
            len: view_len(&log),
        }
        .into());
    };
    let removed = log.remove(idx);
    persist_log(store, &log)?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemStore;
    use crate::timer::TimerMode;
    use chrono::{Duration, Utc};

    fn record(offset_secs: i64, note: &str) -> SessionRecord {
        let start = Utc::now() + Duration::seconds(offset_secs);
        SessionRecord {
            user_id: None,
            start,
            end: start + Duration::seconds(60),
            mode: TimerMode::Manual,
            work_seconds: 60,
            pause_seconds: 0,
            work_cycles: 0,
            note: note.to_string(),
        }
    }

    #[test]
    fn append_then_load() {
        let store = MemStore::new();
        let r = record(0, "");
        append_session(&store, &r).unwrap();
        let log = load_log(&store).unwrap();
        assert_eq!(log, vec![r]);
    }

    #[test]
    fn append_upserts_by_start() {
        let store = MemStore::new();
        let r = record(0, "");
        append_session(&store, &r).unwrap();
        append_session(&store, &r).unwrap();
        assert_eq!(load_log(&store).unwrap().len(), 1);
    }

    #[test]
    fn attach_note_roundtrip() {
        let store = MemStore::new();
        let r = record(0, "");
        append_session(&store, &r).unwrap();
        attach_note(&store, &r, "deep work on the parser").unwrap();

        let log = load_log(&store).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].start, r.start);
        assert_eq!(log[0].note, "deep work on the parser");
    }

    #[test]
    fn attach_note_dedups_by_start() {
        let store = MemStore::new();
        let r = record(0, "");
        // Two raw entries with the same start key.
        persist_log(&store, &[r.clone(), r.clone()]).unwrap();
        attach_note(&store, &r, "x").unwrap();
        let matching: Vec<_> = load_log(&store)
            .unwrap()
            .into_iter()
            .filter(|s| s.start == r.start)
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].note, "x");
    }

    #[test]
    fn load_log_propagates_read_failures() {
        let store = MemStore::new();
        store.fail_reads(true);
        assert!(matches!(
            load_log(&store).unwrap_err(),
            CoreError::Storage(StorageError::ReadFailed { .. })
        ));
    }

    #[test]
    fn attach_note_detects_dropped_writes() {
        let store = MemStore::new();
        let r = record(0, "");
        append_session(&store, &r).unwrap();

        store.drop_writes(true);
        let err = attach_note(&store, &r, "x").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::VerificationMismatch { .. })
        ));
    }

    #[test]
    fn view_is_reversed_and_filtered() {
        let store = MemStore::new();
        let oldest = record(0, "first");
        let unnoted = record(10, "   ");
        let newest = record(20, "last");
        persist_log(&store, &[oldest.clone(), unnoted, newest.clone()]).unwrap();

        let view = journal_view(&store).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].start, newest.start);
        assert_eq!(view[1].start, oldest.start);
    }

    #[test]
    fn update_note_translates_view_index() {
        let store = MemStore::new();
        let oldest = record(0, "first");
        let unnoted = record(10, "");
        let newest = record(20, "last");
        persist_log(&store, &[oldest.clone(), unnoted, newest]).unwrap();

        // View index 1 is the oldest noted entry, storage index 0.
        update_note_by_index(&store, 1, "revised").unwrap();
        let log = load_log(&store).unwrap();
        assert_eq!(log[0].note, "revised");
        assert_eq!(log[0].start, oldest.start);
        assert_eq!(log[1].note, "");
    }

    #[test]
    fn update_note_out_of_range_leaves_log_unchanged() {
        let store = MemStore::new();
        let r = record(0, "only");
        persist_log(&store, &[r.clone()]).unwrap();

        let err = update_note_by_index(&store, 5, "x").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Journal(JournalError::IndexOutOfRange { index: 5, len: 1 })
        ));
        assert_eq!(load_log(&store).unwrap(), vec![r]);
    }

    #[test]
    fn delete_translates_view_index() {
        let store = MemStore::new();
        let oldest = record(0, "first");
        let unnoted = record(10, "");
        let newest = record(20, "last");
        persist_log(&store, &[oldest, unnoted.clone(), newest.clone()]).unwrap();

        let removed = delete_by_index(&store, 0).unwrap();
        assert_eq!(removed.start, newest.start);
        // The unnoted entry survives: only the view entry is removed.
        let log = load_log(&store).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.iter().any(|s| s.start == unnoted.start));
    }

    #[test]
    fn delete_out_of_range_is_an_error() {
        let store = MemStore::new();
        assert!(matches!(
            delete_by_index(&store, 0).unwrap_err(),
            CoreError::Journal(JournalError::IndexOutOfRange { .. })
        ));
    }
}
