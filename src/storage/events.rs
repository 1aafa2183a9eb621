use std::collections::HashSet;

use crate::event::{ArchiveRecord, EventRecord, UserId, UserInfo};
use crate::storage::filter::EventFilter;
use crate::time_utils;
use crate::{ArchiveError, ArchiveResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, Row};

pub struct EventStorage;

pub struct ArchiveStorage;

// ── Row mapping ──

fn conversion_error(
    col: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(e))
}

fn user_id_from_column(row: &Row, col: usize) -> rusqlite::Result<UserId> {
    let raw: String = row.get(col)?;
    serde_json::from_str::<UserId>(&raw).map_err(|e| conversion_error(col, e))
}

fn event_from_row(row: &Row) -> rusqlite::Result<EventRecord> {
    let event_time_str: String = row.get(2)?;
    let user_info_json: String = row.get(3)?;

    Ok(EventRecord {
        id: row.get(0)?,
        user_id: user_id_from_column(row, 1)?,
        event_time: time_utils::from_sqlite(&event_time_str).map_err(|e| conversion_error(2, e))?,
        user_info: serde_json::from_str::<UserInfo>(&user_info_json)
            .map_err(|e| conversion_error(3, e))?,
    })
}

fn archive_from_row(row: &Row) -> rusqlite::Result<ArchiveRecord> {
    let user_info_json: String = row.get(1)?;
    Ok(ArchiveRecord {
        user_id: user_id_from_column(row, 0)?,
        user_info: serde_json::from_str::<UserInfo>(&user_info_json)
            .map_err(|e| conversion_error(1, e))?,
    })
}

// ── user_events ──

impl EventStorage {
    /// Insert an event. An empty `id` gets a fresh UUID; the stored id is returned.
    pub fn insert(conn: &Connection, event: &EventRecord) -> ArchiveResult<String> {
        let id = if event.id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            event.id.clone()
        };

        conn.execute(
            "INSERT INTO user_events (id, user_id, event_time, user_info) VALUES (?1, ?2, ?3, ?4)",
            params![
                id,
                event.user_id.to_stored()?,
                time_utils::to_sqlite(&event.event_time),
                serde_json::to_string(&event.user_info)?,
            ],
        )
        .map_err(|e| ArchiveError::Mutation(format!("Insert event failed: {}", e)))?;
        tracing::debug!(event_id = %id, user_id = %event.user_id, "Event inserted");
        Ok(id)
    }

    pub fn find(conn: &Connection, filter: &EventFilter) -> ArchiveResult<Vec<EventRecord>> {
        let (where_sql, bounds) = filter.to_sql();
        let sql = format!(
            "SELECT id, user_id, event_time, user_info FROM user_events WHERE {}",
            where_sql
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ArchiveError::Query(e.to_string()))?;

        let events = stmt
            .query_map(params_from_iter(bounds.iter()), event_from_row)
            .map_err(|e| ArchiveError::Query(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ArchiveError::Query(format!("Unreadable event row: {}", e)))?;

        Ok(events)
    }

    /// Distinct `user_id` values of the events matching `filter`.
    pub fn distinct_user_ids(conn: &Connection, filter: &EventFilter) -> ArchiveResult<HashSet<UserId>> {
        let (where_sql, bounds) = filter.to_sql();
        let sql = format!("SELECT DISTINCT user_id FROM user_events WHERE {}", where_sql);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ArchiveError::Query(e.to_string()))?;

        let ids = stmt
            .query_map(params_from_iter(bounds.iter()), |r| user_id_from_column(r, 0))
            .map_err(|e| ArchiveError::Query(e.to_string()))?
            .collect::<rusqlite::Result<HashSet<_>>>()
            .map_err(|e| ArchiveError::Query(e.to_string()))?;

        Ok(ids)
    }

    /// Delete one event by id. Returns false when no row matched.
    pub fn delete(conn: &Connection, id: &str) -> ArchiveResult<bool> {
        let affected = conn
            .execute("DELETE FROM user_events WHERE id = ?1", params![id])
            .map_err(|e| ArchiveError::Mutation(format!("Delete event failed: {}", e)))?;
        Ok(affected > 0)
    }

    pub fn count(conn: &Connection) -> ArchiveResult<u64> {
        conn.query_row("SELECT COUNT(*) FROM user_events", [], |r| r.get(0))
            .map_err(|e| ArchiveError::Query(e.to_string()))
    }
}

// ── archived_users ──

impl ArchiveStorage {
    pub fn insert(conn: &Connection, record: &ArchiveRecord, archived_at: &DateTime<Utc>) -> ArchiveResult<()> {
        conn.execute(
            "INSERT INTO archived_users (user_id, user_info, archived_at) VALUES (?1, ?2, ?3)",
            params![
                record.user_id.to_stored()?,
                serde_json::to_string(&record.user_info)?,
                time_utils::to_sqlite(archived_at),
            ],
        )
        .map_err(|e| ArchiveError::Mutation(format!("Insert archive record failed: {}", e)))?;
        tracing::debug!(user_id = %record.user_id, "Archive record inserted");
        Ok(())
    }

    pub fn contains(conn: &Connection, user_id: &UserId) -> ArchiveResult<bool> {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM archived_users WHERE user_id = ?1",
            params![user_id.to_stored()?],
            |r| r.get(0),
        )
        .map_err(|e| ArchiveError::Query(e.to_string()))
    }

    pub fn list(conn: &Connection) -> ArchiveResult<Vec<ArchiveRecord>> {
        let mut stmt = conn
            .prepare("SELECT user_id, user_info FROM archived_users ORDER BY id")
            .map_err(|e| ArchiveError::Query(e.to_string()))?;

        let records = stmt
            .query_map([], archive_from_row)
            .map_err(|e| ArchiveError::Query(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ArchiveError::Query(format!("Unreadable archive row: {}", e)))?;

        Ok(records)
    }

    pub fn count(conn: &Connection) -> ArchiveResult<u64> {
        conn.query_row("SELECT COUNT(*) FROM archived_users", [], |r| r.get(0))
            .map_err(|e| ArchiveError::Query(e.to_string()))
    }
}
