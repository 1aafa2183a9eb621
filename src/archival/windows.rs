use chrono::{DateTime, Duration, Utc};

use crate::config::PolicyConfig;
use crate::{ArchiveError, ArchiveResult};

/// Cutoffs of one run, all derived from a single `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveWindows {
    pub now: DateTime<Utc>,
    /// Events at or after this instant make their user active.
    pub activity_cutoff: DateTime<Utc>,
    /// Users registered before this instant are old enough to archive.
    pub registration_cutoff: DateTime<Utc>,
}

impl ArchiveWindows {
    pub fn at(now: DateTime<Utc>, policy: &PolicyConfig) -> ArchiveResult<Self> {
        Ok(Self {
            now,
            activity_cutoff: days_before(now, policy.activity_window_days)?,
            registration_cutoff: days_before(now, policy.registration_age_days)?,
        })
    }
}

fn days_before(now: DateTime<Utc>, days: i64) -> ArchiveResult<DateTime<Utc>> {
    if days <= 0 {
        return Err(ArchiveError::InvalidInput(format!("window must be positive, got {} days", days)));
    }
    Duration::try_days(days)
        .and_then(|d| now.checked_sub_signed(d))
        .ok_or_else(|| ArchiveError::InvalidInput(format!("window of {} days is out of range", days)))
}
