use crate::constants::{SQLITE_BUSY_TIMEOUT_MS, WAL_AUTOCHECKPOINT};
use crate::{ArchiveError, ArchiveResult};
use rusqlite::Connection;

/// Open the events database with the archiver's pragmas.
pub fn open_connection(path: &std::path::Path) -> ArchiveResult<Connection> {
    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path).map_err(|e| {
        ArchiveError::Connection(format!("Failed to open {}: {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), "Database connection opened");

    configure(&conn)?;
    Ok(conn)
}

/// Pragmas:
/// - journal_mode = WAL
/// - busy_timeout = SQLITE_BUSY_TIMEOUT_MS (constants.rs)
/// - synchronous = NORMAL
/// - temp_store = MEMORY
/// - wal_autocheckpoint = WAL_AUTOCHECKPOINT
fn configure(conn: &Connection) -> ArchiveResult<()> {
    conn.execute_batch(&format!(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = {};
         PRAGMA synchronous = NORMAL;
         PRAGMA temp_store = MEMORY;
         PRAGMA wal_autocheckpoint = {};",
        SQLITE_BUSY_TIMEOUT_MS, WAL_AUTOCHECKPOINT,
    ))
    .map_err(|e| ArchiveError::Connection(format!("Failed to configure pragmas: {}", e)))?;
    Ok(())
}

/// Round-trip a trivial query; fails when the database is unusable.
pub fn ping(conn: &Connection) -> ArchiveResult<()> {
    let one: i64 = conn
        .query_row("SELECT 1", [], |r| r.get(0))
        .map_err(|e| ArchiveError::Connection(format!("Ping failed: {}", e)))?;
    if one != 1 {
        return Err(ArchiveError::Connection(format!("Ping returned {}", one)));
    }
    Ok(())
}
