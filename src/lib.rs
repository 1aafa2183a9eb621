//! User Archiver: move inactive users from the live event store to the archive.
//!
//! A user is archived when they have no event in the trailing activity window
//! (14 days by default) and registered before the registration cutoff
//! (30 days). Each run deletes the stale events it inspects and writes a
//! dated JSON report.

pub mod archival;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod storage;
pub mod time_utils;
pub mod tracing_init;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-exports for convenience
pub use error::{ArchiveError, ArchiveResult};
