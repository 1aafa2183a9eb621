use std::path::{Path, PathBuf};

use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DATABASE_FILE, REPORT_FILE_EXTENSION};

/// Cross-platform data directory.
/// Linux: ~/.config/user-archiver/
/// macOS: ~/Library/Application Support/user-archiver/
/// Windows: %APPDATA%/user-archiver/
pub fn data_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    base.join(APP_DIR_NAME)
}

/// {data_dir}/config.json
pub fn config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE_NAME)
}

/// {data_dir}/user_events.db
pub fn default_database_path() -> PathBuf {
    data_dir().join(DEFAULT_DATABASE_FILE)
}

/// {dir}/{YYYY-MM-DD}.json
pub fn report_path(dir: &Path, date: &str) -> PathBuf {
    dir.join(format!("{}.{}", date, REPORT_FILE_EXTENSION))
}

/// Expand ~ to home directory in paths.
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") || path == "~" {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path_uses_date_name() {
        let p = report_path(Path::new("/tmp/reports"), "2026-10-16");
        assert_eq!(p, PathBuf::from("/tmp/reports/2026-10-16.json"));
    }

    #[test]
    fn test_defaults_live_under_data_dir() {
        assert!(default_database_path().starts_with(data_dir()));
        assert!(config_path().ends_with("user-archiver/config.json"));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/var/lib/x.db"), "/var/lib/x.db");
        assert_eq!(expand_tilde("rel/~x"), "rel/~x");
    }
}
