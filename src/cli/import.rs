use std::path::Path;

use anyhow::{Context, Result};
use user_archiver::config::ArchiverConfig;
use user_archiver::event::EventRecord;
use user_archiver::storage::EventStore;

/// Load a JSON array of events into `user_events`.
///
/// Each element needs `user_id`, `event_time` and `user_info.registration_date`;
/// ids are assigned on insert.
pub fn run(config: &ArchiverConfig, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut events: Vec<EventRecord> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of events", file.display()))?;

    for (i, event) in events.iter_mut().enumerate() {
        event.validate().with_context(|| format!("Event #{} rejected", i))?;
        event.id.clear();
    }

    let store = super::open_store(config)?;
    for event in &events {
        store.insert_event(event).context("Failed to insert event")?;
    }

    tracing::info!(count = events.len(), file = %file.display(), "Events imported");
    println!("Imported {} event(s) into {}", events.len(), config.store.database_path.display());
    Ok(())
}
