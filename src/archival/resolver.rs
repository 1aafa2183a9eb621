//! Active-user resolver -- who has activity inside the trailing window.

use std::collections::HashSet;

use super::windows::ArchiveWindows;
use crate::event::UserId;
use crate::storage::{EventField, EventFilter, EventStore};
use crate::ArchiveResult;

pub struct ActiveUserResolver;

impl ActiveUserResolver {
    /// `event_time >= now - activity window`
    pub fn filter(windows: &ArchiveWindows) -> EventFilter {
        EventFilter::new().gte(EventField::EventTime, windows.activity_cutoff)
    }

    /// Distinct ids of users with at least one event in the window.
    /// Reads the store on every call; nothing is cached.
    pub fn resolve_active_users<S: EventStore + ?Sized>(
        store: &S,
        windows: &ArchiveWindows,
    ) -> ArchiveResult<HashSet<UserId>> {
        let filter = Self::filter(windows);
        let ids = store.find_user_ids(&filter)?;
        tracing::debug!(filter = %filter, active_users = ids.len(), "Active users resolved");
        Ok(ids)
    }
}
