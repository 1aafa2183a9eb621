//! Tracing initialization for the archiver binary.
//!
//! Filter comes from `RUST_LOG` (default `info`). Output goes to stderr, or is
//! appended to the configured log file.

use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::{ArchiveError, ArchiveResult};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(log_file: Option<&Path>) -> ArchiveResult<()> {
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            // Append: successive runs share one log.
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;

            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .with_target(true)
                .with_ansi(false)
                .try_init()
                .map_err(|e| ArchiveError::Logging(e.to_string()))?;
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init()
                .map_err(|e| ArchiveError::Logging(e.to_string()))?;
        }
    }
    Ok(())
}
