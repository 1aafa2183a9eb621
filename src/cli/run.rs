use std::path::Path;

use anyhow::{Context, Result};
use user_archiver::archival::{ArchivalEngine, ReportWriter, RunOutcome};
use user_archiver::config::ArchiverConfig;

pub fn run(config: &ArchiverConfig, dry_run: bool, report_dir: Option<&Path>) -> Result<()> {
    let store = super::open_store(config)?;

    let outcome = ArchivalEngine::new(&store, config.policy.clone())
        .dry_run(dry_run)
        .run()
        .context("Archive run failed")?;

    if outcome.dry_run {
        println!("Dry run: nothing archived or deleted, no report written.");
    } else {
        let dir = report_dir.unwrap_or(config.report.output_dir.as_path());
        let path = ReportWriter::write(&outcome.report, dir).context("Failed to write report")?;
        println!("Report: {}", path.display());
    }

    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    let s = &outcome.stats;
    println!();
    println!("Archive run {}", outcome.report.date);
    println!("==========================");
    println!("Active users:        {:>6}", s.active_users);
    println!("Candidate events:    {:>6}", s.candidates_seen);
    println!("Users archived:      {:>6}", outcome.report.archived_users_count);
    println!("Skipped (active):    {:>6}", s.active_skipped);
    println!("Skipped (duplicate): {:>6}", s.duplicate_skipped);
    if s.previously_archived_skipped > 0 {
        println!("Skipped (archived):  {:>6}", s.previously_archived_skipped);
    }
    println!("Events deleted:      {:>6}", s.events_deleted);
    if s.events_already_gone > 0 {
        println!("Events already gone: {:>6}", s.events_already_gone);
    }
}
