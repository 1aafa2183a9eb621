use anyhow::{Context, Result};
use user_archiver::config::ArchiverConfig;
use user_archiver::storage::EventStore;

pub fn run(config: &ArchiverConfig) -> Result<()> {
    let store = super::open_store(config)?;

    let events = store.count_events().context("Failed to count events")?;
    let archived = store.count_archived().context("Failed to count archived users")?;

    println!("User Archiver Status");
    println!("====================");
    println!("Database: {}", config.store.database_path.display());
    println!();
    println!("Live events:     {:>8}", events);
    println!("Archived users:  {:>8}", archived);
    println!();
    println!(
        "Policy: active within {} days, archive if registered > {} days ago{}",
        config.policy.activity_window_days,
        config.policy.registration_age_days,
        if config.policy.skip_already_archived { ", skip already archived" } else { "" }
    );

    Ok(())
}
