//! Append-only change history per tech lead.
//!
//! The log is a JSON array of `{action, data, timestamp}` entries. Like the
//! team document it is read and rewritten in full on every append.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::session::Session;
use crate::storage::{schema, write_json};

/// What kind of change an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryAction {
    /// A team was created.
    Created,
    /// Team-level progress was replaced.
    Updated,
    /// A member's progress was replaced.
    Edited,
    /// A team was deleted.
    Deleted,
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Updated => write!(f, "Updated"),
            Self::Edited => write!(f, "Edited"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}

/// One recorded change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// What happened.
    pub action: HistoryAction,
    /// Snapshot of the data involved.
    pub data: serde_json::Value,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(action: HistoryAction, data: serde_json::Value) -> Self {
        Self {
            action,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// History log of one tech lead.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    /// Open the log for a session inside `history_dir`.
    #[must_use]
    pub fn open(history_dir: impl AsRef<Path>, session: &Session) -> Self {
        let path = history_dir
            .as_ref()
            .join(schema::history_file_name(&session.file_stem()));
        Self { path }
    }

    /// Path to the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, oldest first. Empty if the log does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HistoryCorrupt`] if the log cannot be parsed.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&contents).map_err(|source| Error::HistoryCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// The `limit` newest entries, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`HistoryLog::entries`].
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.entries()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    /// Append an entry and rewrite the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing log is corrupt or cannot be written.
    pub fn append(&self, action: HistoryAction, data: serde_json::Value) -> Result<()> {
        let mut entries = self.entries()?;
        entries.push(HistoryEntry::new(action, data));
        write_json(&self.path, &entries)?;
        debug!("Recorded {} in {}", action, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn open_log() -> (TempDir, HistoryLog) {
        let dir = TempDir::new().unwrap();
        let session = Session::new("Jane Doe").unwrap();
        let log = HistoryLog::open(dir.path().join("history"), &session);
        (dir, log)
    }

    #[test]
    fn test_path_uses_history_suffix() {
        let (_dir, log) = open_log();
        assert!(log.path().ends_with("history/Jane_Doe_history.json"));
    }

    #[test]
    fn test_missing_log_is_empty() {
        let (_dir, log) = open_log();
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_read() {
        let (_dir, log) = open_log();
        log.append(HistoryAction::Created, json!({"team": "Alpha"}))
            .unwrap();
        log.append(HistoryAction::Deleted, json!({"team": "Alpha"}))
            .unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, HistoryAction::Created);
        assert_eq!(entries[1].data["team"], "Alpha");
    }

    #[test]
    fn test_recent_is_newest_first() {
        let (_dir, log) = open_log();
        for action in [
            HistoryAction::Created,
            HistoryAction::Updated,
            HistoryAction::Edited,
        ] {
            log.append(action, json!(null)).unwrap();
        }

        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].action, HistoryAction::Edited);
        assert_eq!(recent[1].action, HistoryAction::Updated);
    }

    #[test]
    fn test_on_disk_format() {
        let (_dir, log) = open_log();
        log.append(HistoryAction::Updated, json!({"team": "Beta"}))
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(log.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["action"], "Updated");
        assert!(raw[0]["timestamp"].is_string());
    }

    #[test]
    fn test_corrupt_log() {
        let (_dir, log) = open_log();
        fs::create_dir_all(log.path().parent().unwrap()).unwrap();
        fs::write(log.path(), "{}").unwrap();

        let err = log.append(HistoryAction::Created, json!(null)).unwrap_err();
        assert!(matches!(err, Error::HistoryCorrupt { .. }));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(HistoryAction::Deleted.to_string(), "Deleted");
    }
}
