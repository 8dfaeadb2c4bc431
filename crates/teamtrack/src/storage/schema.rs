//! On-disk document shapes.
//!
//! The current shape is a mapping from team name to
//! `{"team_progress": {...}, "members": {name: {...}}}`. Older documents
//! stored `members` as a plain list of names and may lack `team_progress`.
//! [`StoredTeam`] accepts both; `migrations` turns it into a [`Team`].
//!
//! [`Team`]: crate::team::Team

use std::collections::BTreeMap;

use serde::Deserialize;

/// File extension of team documents.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Suffix appended to the identity stem for history logs.
pub const HISTORY_SUFFIX: &str = "_history";

/// A milestone mapping as read from disk. Keys may be missing or unknown.
pub type StoredProgress = BTreeMap<String, String>;

/// A whole document as read from disk, before migration.
pub type StoredDocument = BTreeMap<String, StoredTeam>;

/// A team as read from disk, in either the legacy or the current shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredTeam {
    /// Absent in documents written before team-level progress existed.
    #[serde(default)]
    pub team_progress: Option<StoredProgress>,
    /// Member roster, list-shaped in legacy documents.
    #[serde(default)]
    pub members: StoredMembers,
}

/// The two shapes `members` has had.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StoredMembers {
    /// Current shape: member name to progress.
    Progress(BTreeMap<String, StoredProgress>),
    /// Legacy shape: bare member names.
    Names(Vec<String>),
}

impl Default for StoredMembers {
    fn default() -> Self {
        Self::Progress(BTreeMap::new())
    }
}

/// Document file name for an identity stem.
#[must_use]
pub fn document_file_name(stem: &str) -> String {
    format!("{stem}.{DOCUMENT_EXTENSION}")
}

/// History log file name for an identity stem.
#[must_use]
pub fn history_file_name(stem: &str) -> String {
    format!("{stem}{HISTORY_SUFFIX}.{DOCUMENT_EXTENSION}")
}
