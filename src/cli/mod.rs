pub mod config;
pub mod import;
pub mod run;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};
use user_archiver::config::ArchiverConfig;
use user_archiver::storage::SqliteStore;

/// Load the effective configuration and start logging.
///
/// Precedence for the database: `--database` → `USER_ARCHIVER_DATABASE` →
/// config file → default under the data directory.
pub fn setup(config_path: Option<&Path>, database: Option<&Path>) -> Result<ArchiverConfig> {
    let mut config = ArchiverConfig::load(config_path).context("Failed to load configuration")?;
    if let Some(db) = database {
        config.store.database_path = db.to_path_buf();
    }
    user_archiver::tracing_init::init_tracing(config.logging.file.as_deref())
        .context("Failed to initialize logging")?;
    Ok(config)
}

/// Connect to the store; an unreachable database aborts before any work.
pub fn open_store(config: &ArchiverConfig) -> Result<SqliteStore> {
    SqliteStore::connect(&config.store.database_path).with_context(|| {
        format!(
            "Failed to connect to event store at {}",
            config.store.database_path.display()
        )
    })
}
