//! Candidate scanner -- stale events of long-registered users.

use super::windows::ArchiveWindows;
use crate::event::EventRecord;
use crate::storage::{EventField, EventFilter, EventStore};
use crate::ArchiveResult;

pub struct CandidateScanner;

impl CandidateScanner {
    /// `event_time < activity cutoff AND user_info.registration_date < registration cutoff`
    pub fn filter(windows: &ArchiveWindows) -> EventFilter {
        EventFilter::new()
            .lt(EventField::EventTime, windows.activity_cutoff)
            .lt(EventField::RegistrationDate, windows.registration_cutoff)
    }

    /// Full candidate records in store order, consumed once.
    pub fn scan_candidates<S: EventStore + ?Sized>(
        store: &S,
        windows: &ArchiveWindows,
    ) -> ArchiveResult<std::vec::IntoIter<EventRecord>> {
        let filter = Self::filter(windows);
        let candidates = store.find_events(&filter)?;
        tracing::debug!(filter = %filter, candidates = candidates.len(), "Candidates scanned");
        Ok(candidates.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::test_helpers::*;

    fn windows() -> ArchiveWindows {
        ArchiveWindows::at(chrono::Utc::now(), &PolicyConfig::default()).unwrap()
    }

    fn candidate_users<S: EventStore>(store: &S) -> Vec<String> {
        let mut users: Vec<String> = CandidateScanner::scan_candidates(store, &windows())
            .unwrap()
            .map(|e| e.user_id.to_string())
            .collect();
        users.sort();
        users
    }

    #[test]
    fn test_requires_both_conditions() {
        let store = setup_store();
        insert_all(&store, &[
            // stale + registered long ago: candidate
            EventBuilder::new().user("a").event_time(days_ago(40)).registration_date(days_ago(35)).build(),
            // stale but registered recently
            EventBuilder::new().user("b").event_time(days_ago(20)).registration_date(days_ago(25)).build(),
            // recent event, old registration
            EventBuilder::new().user("c").event_time(days_ago(10)).registration_date(days_ago(400)).build(),
        ]);
        assert_eq!(candidate_users(&store), vec!["a"]);
    }

    #[test]
    fn test_returns_full_records() {
        let store = setup_store();
        let event = EventBuilder::new()
            .user("full")
            .event_time(days_ago(50))
            .registration_date(days_ago(60))
            .extra("country", "NO")
            .build();
        insert_all(&store, &[event.clone()]);

        let found: Vec<EventRecord> = CandidateScanner::scan_candidates(&store, &windows()).unwrap().collect();
        assert_eq!(found, vec![event]);
    }

    #[test]
    fn test_one_record_per_stale_event() {
        let store = setup_store();
        insert_all(&store, &[
            EventBuilder::new().user("c").event_time(days_ago(50)).registration_date(days_ago(60)).build(),
            EventBuilder::new().user("c").event_time(days_ago(45)).registration_date(days_ago(60)).build(),
        ]);
        assert_eq!(candidate_users(&store), vec!["c", "c"]);
    }

    #[test]
    fn test_scan_has_no_side_effects() {
        let store = setup_store();
        insert_all(&store, &[EventBuilder::new().event_time(days_ago(50)).registration_date(days_ago(60)).build()]);
        let _ = CandidateScanner::scan_candidates(&store, &windows()).unwrap().count();
        assert_eq!(store.count_events().unwrap(), 1);
        assert_eq!(store.count_archived().unwrap(), 0);
    }
}
