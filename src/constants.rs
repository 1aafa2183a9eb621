// === Archival windows ===
pub const ACTIVITY_WINDOW_DAYS: i64 = 14;
pub const REGISTRATION_AGE_DAYS: i64 = 30;

// === SQLite Tuning ===
pub const SQLITE_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const WAL_AUTOCHECKPOINT: u32 = 1_000;

// === Report ===
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const REPORT_FILE_EXTENSION: &str = "json";

// === Files ===
pub const APP_DIR_NAME: &str = "user-archiver";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_DATABASE_FILE: &str = "user_events.db";

// === Environment ===
pub const DATABASE_ENV_VAR: &str = "USER_ARCHIVER_DATABASE";
