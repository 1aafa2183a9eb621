use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::event::UserId;
use crate::storage::path_utils;
use crate::ArchiveResult;

/// Summary of one run, written as `<date>.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub date: String,
    pub archived_users_count: usize,
    /// First-archived order, no duplicates.
    pub archived_user_ids: Vec<UserId>,
}

impl Report {
    pub fn new(date: impl Into<String>, archived_user_ids: Vec<UserId>) -> Self {
        Self {
            date: date.into(),
            archived_users_count: archived_user_ids.len(),
            archived_user_ids,
        }
    }
}

pub struct ReportWriter;

impl ReportWriter {
    /// Write `report` to `{dir}/{date}.json`, replacing a same-day file.
    pub fn write(report: &Report, dir: &Path) -> ArchiveResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = path_utils::report_path(dir, &report.date);
        std::fs::write(&path, serde_json::to_string(report)?)?;
        tracing::info!(path = %path.display(), archived = report.archived_users_count, "Report written");
        Ok(path)
    }
}
