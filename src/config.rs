//! Archiver configuration: store location, archival windows, report output.
//!
//! Loaded from JSON (`--config <file>` or `{data_dir}/config.json`). Every
//! field has a default, so a partial file only overrides what it names.
//! `USER_ARCHIVER_DATABASE` overrides `store.database_path`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{ACTIVITY_WINDOW_DAYS, DATABASE_ENV_VAR, REGISTRATION_AGE_DAYS};
use crate::storage::path_utils;
use crate::{ArchiveError, ArchiveResult};

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file holding `user_events` and `archived_users`.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_database_path() -> PathBuf {
    path_utils::default_database_path()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

// ============================================================================
// ARCHIVAL POLICY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    /// A user with an event newer than this many days is active. Default: 14
    #[serde(default = "default_activity_window_days")]
    pub activity_window_days: i64,
    /// Only users registered longer ago than this are archived. Default: 30
    #[serde(default = "default_registration_age_days")]
    pub registration_age_days: i64,
    /// Check `archived_users` before inserting, so a user archived by an
    /// earlier run is not archived twice. Default: false
    #[serde(default)]
    pub skip_already_archived: bool,
}

fn default_activity_window_days() -> i64 { ACTIVITY_WINDOW_DAYS }
fn default_registration_age_days() -> i64 { REGISTRATION_AGE_DAYS }

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            activity_window_days: ACTIVITY_WINDOW_DAYS,
            registration_age_days: REGISTRATION_AGE_DAYS,
            skip_already_archived: false,
        }
    }
}

// ============================================================================
// REPORT / LOGGING
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory receiving `<YYYY-MM-DD>.json`. Default: current directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append logs to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// ============================================================================
// ROOT
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiverConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArchiverConfig {
    /// Load configuration.
    ///
    /// - `explicit`: a file the user asked for; it must exist and parse.
    /// - otherwise `{data_dir}/config.json` when present, else defaults.
    ///
    /// The database env override is applied afterwards, then `validate()`.
    pub fn load(explicit: Option<&Path>) -> ArchiveResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = path_utils::config_path();
                if implicit.exists() {
                    Self::from_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_override(std::env::var(DATABASE_ENV_VAR).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ArchiveResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ArchiveError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ArchiveError::Config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save to `path` (pretty JSON), creating parent directories.
    pub fn save(&self, path: &Path) -> ArchiveResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Non-empty value replaces `store.database_path` (`~` expanded).
    pub fn apply_env_override(&mut self, database: Option<String>) {
        if let Some(db) = database.filter(|s| !s.trim().is_empty()) {
            tracing::debug!(database = %db, "Database path overridden from environment");
            self.store.database_path = PathBuf::from(path_utils::expand_tilde(db.trim()));
        }
    }

    pub fn validate(&self) -> ArchiveResult<()> {
        if self.policy.activity_window_days <= 0 {
            return Err(ArchiveError::Config(format!(
                "policy.activity_window_days must be positive, got {}",
                self.policy.activity_window_days
            )));
        }
        if self.policy.registration_age_days <= 0 {
            return Err(ArchiveError::Config(format!(
                "policy.registration_age_days must be positive, got {}",
                self.policy.registration_age_days
            )));
        }
        if self.store.database_path.as_os_str().is_empty() {
            return Err(ArchiveError::Config("store.database_path is empty".into()));
        }
        Ok(())
    }
}
