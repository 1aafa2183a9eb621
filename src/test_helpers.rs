//! Shared test utilities: builders, store setup, time helpers.
//!
//! Available only under `#[cfg(test)]`.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::event::{ArchiveRecord, EventRecord, UserId, UserInfo};
use crate::storage::{EventFilter, EventStore, SqliteStore};
use crate::{ArchiveError, ArchiveResult};

// ============================================================================
// EventBuilder
// ============================================================================

pub struct EventBuilder {
    event: EventRecord,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            event: EventRecord::new(
                "user-1",
                stored_precision(Utc::now()),
                UserInfo::registered_at(stored_precision(days_ago(365))),
            ),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.event.id = id.to_string();
        self
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.event.user_id = UserId::from(user_id);
        self
    }

    pub fn event_time(mut self, dt: DateTime<Utc>) -> Self {
        self.event.event_time = stored_precision(dt);
        self
    }

    pub fn registration_date(mut self, dt: DateTime<Utc>) -> Self {
        self.event.user_info.registration_date = stored_precision(dt);
        self
    }

    pub fn extra(mut self, key: &str, value: &str) -> Self {
        self.event
            .user_info
            .extra
            .insert(key.to_string(), serde_json::Value::String(value.to_string()));
        self
    }

    pub fn build(self) -> EventRecord {
        self.event
    }
}

// ============================================================================
// Time helpers
// ============================================================================

pub fn hours_ago(h: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(h)
}

pub fn days_ago(d: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(d)
}

/// Timestamps are persisted with microsecond precision; builders truncate so
/// records compare equal after a store round-trip.
pub fn stored_precision(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.trunc_subsecs(6)
}

// ============================================================================
// Id helpers
// ============================================================================

pub fn user_ids(raw: &[&str]) -> Vec<UserId> {
    raw.iter().map(|s| UserId::from(*s)).collect()
}

pub fn user_set(raw: &[&str]) -> HashSet<UserId> {
    raw.iter().map(|s| UserId::from(*s)).collect()
}

// ============================================================================
// Store setup helpers
// ============================================================================

use rusqlite::Connection;
use crate::storage::migrations;

/// In-memory events DB with all migrations applied.
pub fn setup_events_db() -> Connection {
    let conn = Connection::open(":memory:").unwrap();
    migrations::migrate_events_db(&conn).unwrap();
    conn
}

/// In-memory SQLite store.
pub fn setup_store() -> SqliteStore {
    SqliteStore::from_connection(Connection::open(":memory:").unwrap()).unwrap()
}

pub fn insert_all<S: EventStore + ?Sized>(store: &S, events: &[EventRecord]) {
    for event in events {
        store.insert_event(event).unwrap();
    }
}

// ============================================================================
// Log capture
// ============================================================================

/// Shared in-memory sink for a test subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return its output alongside
/// the formatted log lines.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, capture.contents())
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Vec-backed store that keeps insertion order, logs every call and can be
/// told to fail.
#[derive(Default)]
pub struct MemoryStore {
    events: RefCell<Vec<EventRecord>>,
    archived: RefCell<Vec<ArchiveRecord>>,
    calls: RefCell<Vec<&'static str>>,
    unreachable: Cell<bool>,
    fail_archive_insert: Cell<bool>,
    deletes_miss: Cell<bool>,
    /// Remaining successful deletes before failing; `None` = unlimited.
    delete_budget: Cell<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.events.borrow().clone()
    }

    pub fn archived(&self) -> Vec<ArchiveRecord> {
        self.archived.borrow().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn set_unreachable(&self, on: bool) {
        self.unreachable.set(on);
    }

    pub fn set_fail_archive_insert(&self, on: bool) {
        self.fail_archive_insert.set(on);
    }

    /// Deletes succeed but match nothing.
    pub fn set_deletes_miss(&self, on: bool) {
        self.deletes_miss.set(on);
    }

    pub fn fail_deletes_after(&self, n: usize) {
        self.delete_budget.set(Some(n));
    }

    fn record(&self, call: &'static str) -> ArchiveResult<()> {
        self.calls.borrow_mut().push(call);
        if self.unreachable.get() {
            return Err(ArchiveError::Query(format!("{}: store unreachable", call)));
        }
        Ok(())
    }
}

impl EventStore for MemoryStore {
    fn ping(&self) -> ArchiveResult<()> {
        if self.unreachable.get() {
            return Err(ArchiveError::Connection("store unreachable".into()));
        }
        Ok(())
    }

    fn find_events(&self, filter: &EventFilter) -> ArchiveResult<Vec<EventRecord>> {
        self.record("find_events")?;
        Ok(self
            .events
            .borrow()
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    fn find_user_ids(&self, filter: &EventFilter) -> ArchiveResult<HashSet<UserId>> {
        self.record("find_user_ids")?;
        Ok(self
            .events
            .borrow()
            .iter()
            .filter(|e| filter.matches(e))
            .map(|e| e.user_id.clone())
            .collect())
    }

    fn insert_event(&self, event: &EventRecord) -> ArchiveResult<String> {
        self.record("insert_event")?;
        let mut stored = event.clone();
        if stored.id.is_empty() {
            stored.id = uuid::Uuid::new_v4().to_string();
        }
        let id = stored.id.clone();
        self.events.borrow_mut().push(stored);
        Ok(id)
    }

    fn insert_archive(&self, record: &ArchiveRecord, _archived_at: &DateTime<Utc>) -> ArchiveResult<()> {
        self.record("insert_archive")?;
        if self.fail_archive_insert.get() {
            return Err(ArchiveError::Mutation("insert_archive rejected".into()));
        }
        self.archived.borrow_mut().push(record.clone());
        Ok(())
    }

    fn delete_event(&self, event: &EventRecord) -> ArchiveResult<bool> {
        self.record("delete_event")?;
        if let Some(left) = self.delete_budget.get() {
            if left == 0 {
                return Err(ArchiveError::Mutation("delete_event rejected".into()));
            }
            self.delete_budget.set(Some(left - 1));
        }
        if self.deletes_miss.get() {
            return Ok(false);
        }
        let mut events = self.events.borrow_mut();
        match events.iter().position(|e| e.id == event.id) {
            Some(pos) => {
                events.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn archive_contains(&self, user_id: &UserId) -> ArchiveResult<bool> {
        self.record("archive_contains")?;
        Ok(self.archived.borrow().iter().any(|r| &r.user_id == user_id))
    }

    fn count_events(&self) -> ArchiveResult<u64> {
        Ok(self.events.borrow().len() as u64)
    }

    fn count_archived(&self) -> ArchiveResult<u64> {
        Ok(self.archived.borrow().len() as u64)
    }
}
