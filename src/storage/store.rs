//! Store boundary consumed by the archival pass.
//!
//! `EventStore` is the only way the archival code reaches the data: the
//! handle is passed in explicitly, so tests swap in an in-memory double.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use super::database;
use super::events::{ArchiveStorage, EventStorage};
use super::filter::EventFilter;
use super::migrations;
use crate::event::{ArchiveRecord, EventRecord, UserId};
use crate::ArchiveResult;

pub trait EventStore {
    /// Fails when the store is unreachable.
    fn ping(&self) -> ArchiveResult<()>;

    /// `find(user_events, filter)`.
    fn find_events(&self, filter: &EventFilter) -> ArchiveResult<Vec<EventRecord>>;

    /// Distinct `user_id`s of the events matching `filter`.
    fn find_user_ids(&self, filter: &EventFilter) -> ArchiveResult<HashSet<UserId>> {
        Ok(self
            .find_events(filter)?
            .into_iter()
            .map(|e| e.user_id)
            .collect())
    }

    /// `insert_one(user_events, event)`. Returns the stored id.
    fn insert_event(&self, event: &EventRecord) -> ArchiveResult<String>;

    /// `insert_one(archived_users, record)`.
    fn insert_archive(&self, record: &ArchiveRecord, archived_at: &DateTime<Utc>) -> ArchiveResult<()>;

    /// `delete_one(user_events, event)`. Returns false when nothing matched.
    fn delete_event(&self, event: &EventRecord) -> ArchiveResult<bool>;

    /// Whether any archive record exists for `user_id`.
    fn archive_contains(&self, user_id: &UserId) -> ArchiveResult<bool>;

    fn count_events(&self) -> ArchiveResult<u64>;

    fn count_archived(&self) -> ArchiveResult<u64>;
}

/// SQLite-backed store: both collections live in one database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed), migrate and ping the database at `path`.
    pub fn connect(path: &Path) -> ArchiveResult<Self> {
        let conn = database::open_connection(path)?;
        Self::from_connection(conn)
    }

    /// Wrap an already opened connection (e.g. `:memory:`).
    pub fn from_connection(conn: Connection) -> ArchiveResult<Self> {
        database::ping(&conn)?;
        migrations::migrate_events_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn list_archived(&self) -> ArchiveResult<Vec<ArchiveRecord>> {
        ArchiveStorage::list(&self.conn)
    }
}

impl EventStore for SqliteStore {
    fn ping(&self) -> ArchiveResult<()> {
        database::ping(&self.conn)
    }

    fn find_events(&self, filter: &EventFilter) -> ArchiveResult<Vec<EventRecord>> {
        EventStorage::find(&self.conn, filter)
    }

    fn find_user_ids(&self, filter: &EventFilter) -> ArchiveResult<HashSet<UserId>> {
        EventStorage::distinct_user_ids(&self.conn, filter)
    }

    fn insert_event(&self, event: &EventRecord) -> ArchiveResult<String> {
        EventStorage::insert(&self.conn, event)
    }

    fn insert_archive(&self, record: &ArchiveRecord, archived_at: &DateTime<Utc>) -> ArchiveResult<()> {
        ArchiveStorage::insert(&self.conn, record, archived_at)
    }

    fn delete_event(&self, event: &EventRecord) -> ArchiveResult<bool> {
        EventStorage::delete(&self.conn, &event.id)
    }

    fn archive_contains(&self, user_id: &UserId) -> ArchiveResult<bool> {
        ArchiveStorage::contains(&self.conn, user_id)
    }

    fn count_events(&self) -> ArchiveResult<u64> {
        EventStorage::count(&self.conn)
    }

    fn count_archived(&self) -> ArchiveResult<u64> {
        ArchiveStorage::count(&self.conn)
    }
}
