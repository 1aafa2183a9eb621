//! Records of the two collections: live `user_events` and `archived_users`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ArchiveError, ArchiveResult};

/// Opaque user identifier, compared by value and JSON type: `42` and `"42"`
/// are different users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Text(String),
}

impl UserId {
    /// JSON encoding used as the stored column value (`42` or `"u-1"`).
    pub fn to_stored(&self) -> ArchiveResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Int(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// Embedded user document. Only `registration_date` is interpreted; every
/// other field is carried through to the archive untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    #[serde(with = "crate::time_utils::rfc3339")]
    pub registration_date: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserInfo {
    pub fn registered_at(registration_date: DateTime<Utc>) -> Self {
        Self {
            registration_date,
            extra: serde_json::Map::new(),
        }
    }
}

/// One user activity event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    /// Store-assigned key used to match the record on delete.
    #[serde(default)]
    pub id: String,
    pub user_id: UserId,
    #[serde(with = "crate::time_utils::rfc3339")]
    pub event_time: DateTime<Utc>,
    pub user_info: UserInfo,
}

impl EventRecord {
    pub fn new(user_id: impl Into<UserId>, event_time: DateTime<Utc>, user_info: UserInfo) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            event_time,
            user_info,
        }
    }

    /// Reject records that could never be matched or archived.
    pub fn validate(&self) -> ArchiveResult<()> {
        if self.user_id.is_blank() {
            return Err(ArchiveError::InvalidInput(format!(
                "event {} has an empty user_id",
                if self.id.is_empty() { "<new>" } else { self.id.as_str() }
            )));
        }
        Ok(())
    }
}

/// Archived user: id plus the `user_info` of the event that triggered archival.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchiveRecord {
    pub user_id: UserId,
    pub user_info: UserInfo,
}

impl ArchiveRecord {
    pub fn from_event(event: &EventRecord) -> Self {
        Self {
            user_id: event.user_id.clone(),
            user_info: event.user_info.clone(),
        }
    }
}
