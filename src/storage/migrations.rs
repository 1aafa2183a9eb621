use crate::{ArchiveError, ArchiveResult};
use rusqlite::Connection;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// Returns the applied schema version (0 when the table is missing).
pub fn get_schema_version(conn: &Connection) -> ArchiveResult<u32> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |r| r.get(0),
        )
        .map_err(|e| ArchiveError::Storage(e.to_string()))?;

    if !exists {
        return Ok(0);
    }

    let version: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .map_err(|e| ArchiveError::Storage(e.to_string()))?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: u32) -> ArchiveResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        rusqlite::params![version],
    )
    .map_err(|e| ArchiveError::Storage(e.to_string()))?;
    Ok(())
}

const EVENTS_DB_V1: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS user_events (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    event_time TEXT NOT NULL,
    user_info TEXT NOT NULL DEFAULT '{}'
);
CREATE INDEX IF NOT EXISTS idx_events_time ON user_events(event_time);
CREATE INDEX IF NOT EXISTS idx_events_user ON user_events(user_id);

CREATE TABLE IF NOT EXISTS archived_users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    user_info TEXT NOT NULL DEFAULT '{}',
    archived_at TEXT NOT NULL
);
";

/// Apply pending migrations to the events database.
pub fn migrate_events_db(conn: &Connection) -> ArchiveResult<()> {
    let version = get_schema_version(conn)?;

    if version < 1 {
        conn.execute_batch(EVENTS_DB_V1)
            .map_err(|e| ArchiveError::Storage(format!("Events DB V1 migration failed: {}", e)))?;
        set_schema_version(conn, 1)?;
    }

    // V2: membership lookups for the cross-run dedup check
    if version < 2 {
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_archived_user ON archived_users(user_id);"
        ).map_err(|e| ArchiveError::Storage(format!("Events DB V2 migration failed: {}", e)))?;
        set_schema_version(conn, 2)?;
    }

    // V3: user_id columns hold the JSON encoding of the id, so 42 and "42" stay distinct
    if version < 3 {
        conn.execute_batch(
            "UPDATE user_events SET user_id = json_quote(user_id);
             UPDATE archived_users SET user_id = json_quote(user_id);"
        ).map_err(|e| ArchiveError::Storage(format!("Events DB V3 migration failed: {}", e)))?;
        set_schema_version(conn, 3)?;
    }

    Ok(())
}
