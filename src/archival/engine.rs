//! Archival engine -- move inactive, long-registered users to `archived_users`.
//!
//! One pass: resolve active users, then walk the stale candidates. Every
//! candidate is deleted from `user_events`; at most one archive record is
//! created per user per run, and never for an active user. Inserts and
//! deletes are independent store calls with no rollback, so a failure mid-run
//! leaves earlier mutations applied and produces no report.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::report::Report;
use super::resolver::ActiveUserResolver;
use super::scanner::CandidateScanner;
use super::windows::ArchiveWindows;
use crate::config::PolicyConfig;
use crate::event::{ArchiveRecord, EventRecord, UserId};
use crate::storage::EventStore;
use crate::time_utils;
use crate::ArchiveResult;

/// What happens to one candidate. The event is deleted in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// User has recent activity.
    SkipActive,
    /// User was already archived earlier in this run.
    SkipDuplicate,
    /// An archive record from a previous run exists (`skip_already_archived`).
    SkipPreviouslyArchived,
    Archive,
}

/// Insertion-ordered set of user ids handled this run.
#[derive(Debug, Default)]
struct ArchivedIds {
    seen: HashSet<UserId>,
    order: Vec<UserId>,
}

impl ArchivedIds {
    fn contains(&self, id: &UserId) -> bool {
        self.seen.contains(id)
    }

    /// Record a user archived by this run.
    fn push(&mut self, id: &UserId) {
        if self.seen.insert(id.clone()) {
            self.order.push(id.clone());
        }
    }

    /// Remember a user without listing it in the report.
    fn mark_seen(&mut self, id: &UserId) {
        self.seen.insert(id.clone());
    }

    fn into_ordered(self) -> Vec<UserId> {
        self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub active_users: usize,
    pub candidates_seen: usize,
    pub archived: usize,
    pub active_skipped: usize,
    pub duplicate_skipped: usize,
    pub previously_archived_skipped: usize,
    pub events_deleted: usize,
    /// Candidates whose delete matched nothing (removed concurrently).
    pub events_already_gone: usize,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    pub stats: RunStats,
    pub dry_run: bool,
}

pub struct ArchivalEngine<'a, S: EventStore + ?Sized> {
    store: &'a S,
    policy: PolicyConfig,
    dry_run: bool,
}

impl<'a, S: EventStore + ?Sized> ArchivalEngine<'a, S> {
    pub fn new(store: &'a S, policy: PolicyConfig) -> Self {
        Self {
            store,
            policy,
            dry_run: false,
        }
    }

    /// Decide everything, mutate nothing.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Run once and return the report.
    pub fn archive_stale_users(&self) -> ArchiveResult<Report> {
        self.run().map(|outcome| outcome.report)
    }

    pub fn run(&self) -> ArchiveResult<RunOutcome> {
        self.run_at(time_utils::now())
    }

    /// Run with an explicit `now`; both windows and the report date use it.
    pub fn run_at(&self, now: DateTime<Utc>) -> ArchiveResult<RunOutcome> {
        let windows = ArchiveWindows::at(now, &self.policy)?;
        self.store.ping()?;

        // Resolve strictly before scanning: the scan deletes.
        let active_ids = ActiveUserResolver::resolve_active_users(self.store, &windows)?;
        let candidates = CandidateScanner::scan_candidates(self.store, &windows)?;

        tracing::info!(
            active_users = active_ids.len(),
            candidates = candidates.len(),
            dry_run = self.dry_run,
            "Archive run started"
        );

        let mut archived = ArchivedIds::default();
        let mut stats = RunStats {
            active_users: active_ids.len(),
            ..RunStats::default()
        };

        for event in candidates {
            stats.candidates_seen += 1;
            match self.decide(&event, &active_ids, &archived)? {
                Decision::SkipActive => {
                    stats.active_skipped += 1;
                    tracing::debug!(user_id = %event.user_id, event_id = %event.id, "User active, dropping stale event only");
                }
                Decision::SkipDuplicate => {
                    stats.duplicate_skipped += 1;
                    tracing::info!(user_id = %event.user_id, "user {} already archived", event.user_id);
                }
                Decision::SkipPreviouslyArchived => {
                    stats.previously_archived_skipped += 1;
                    archived.mark_seen(&event.user_id);
                    tracing::info!(user_id = %event.user_id, "user {} archived by an earlier run", event.user_id);
                }
                Decision::Archive => {
                    if !self.dry_run {
                        self.store.insert_archive(&ArchiveRecord::from_event(&event), &now)?;
                    }
                    archived.push(&event.user_id);
                    stats.archived += 1;
                    tracing::debug!(user_id = %event.user_id, "User archived");
                }
            }
            self.drop_event(&event, &mut stats)?;
        }

        let report = Report::new(time_utils::report_date(&now), archived.into_ordered());

        tracing::info!(
            archived = stats.archived,
            candidates = stats.candidates_seen,
            active_skipped = stats.active_skipped,
            duplicate_skipped = stats.duplicate_skipped,
            previously_archived_skipped = stats.previously_archived_skipped,
            events_deleted = stats.events_deleted,
            "Archive run complete"
        );

        Ok(RunOutcome {
            report,
            stats,
            dry_run: self.dry_run,
        })
    }

    fn decide(
        &self,
        event: &EventRecord,
        active_ids: &HashSet<UserId>,
        archived: &ArchivedIds,
    ) -> ArchiveResult<Decision> {
        if active_ids.contains(&event.user_id) {
            return Ok(Decision::SkipActive);
        }
        if archived.contains(&event.user_id) {
            return Ok(Decision::SkipDuplicate);
        }
        if self.policy.skip_already_archived && self.store.archive_contains(&event.user_id)? {
            return Ok(Decision::SkipPreviouslyArchived);
        }
        Ok(Decision::Archive)
    }

    fn drop_event(&self, event: &EventRecord, stats: &mut RunStats) -> ArchiveResult<()> {
        if self.dry_run {
            return Ok(());
        }
        if self.store.delete_event(event)? {
            stats.events_deleted += 1;
        } else {
            stats.events_already_gone += 1;
            tracing::warn!(event_id = %event.id, user_id = %event.user_id, "Candidate event vanished before delete");
        }
        Ok(())
    }
}
