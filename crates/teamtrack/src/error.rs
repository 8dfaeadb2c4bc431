//! Error types for teamtrack.
//!
//! This module defines all error types used throughout the teamtrack crate.
//! Validation errors leave the team document untouched; storage errors are
//! fatal for the operation that hit them.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for teamtrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A team with this name already exists.
    #[error("team '{0}' already exists")]
    TeamExists(String),

    /// A team was created with the wrong number of members.
    #[error("a team needs exactly {expected} members, got {actual}")]
    WrongMemberCount {
        /// Required team size.
        expected: usize,
        /// Number of members supplied.
        actual: usize,
    },

    /// The same member name was supplied more than once.
    #[error("member '{0}' was listed more than once")]
    DuplicateMember(String),

    /// The member is already on another team.
    #[error("'{member}' is already a member of team '{team}'")]
    MemberAlreadyAssigned {
        /// The member being assigned.
        member: String,
        /// The team the member already belongs to.
        team: String,
    },

    /// No team with this name exists.
    #[error("team '{0}' not found")]
    TeamNotFound(String),

    /// The team exists but has no such member.
    #[error("'{member}' is not a member of team '{team}'")]
    MemberNotFound {
        /// Team that was searched.
        team: String,
        /// Member that was not found.
        member: String,
    },

    /// The caller identity is unusable.
    #[error("invalid tech lead identity: {0:?}")]
    InvalidIdentity(String),

    /// The action requires an administrator session.
    #[error("'{action}' requires an administrator session")]
    PermissionDenied {
        /// The action that was refused.
        action: String,
    },

    // === Storage Errors ===
    /// The team document exists but could not be parsed.
    #[error("team document at {path} is corrupt: {source}")]
    DocumentCorrupt {
        /// Path to the document.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The history log exists but could not be parsed.
    #[error("history log at {path} is corrupt: {source}")]
    HistoryCorrupt {
        /// Path to the history log.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The roster file could not be parsed.
    #[error("roster {path} line {line}: {message}")]
    RosterParse {
        /// Path to the roster file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for teamtrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a permission denied error for the named action.
    #[must_use]
    pub fn permission_denied(action: impl Into<String>) -> Self {
        Self::PermissionDenied {
            action: action.into(),
        }
    }

    /// Create a member-not-found error.
    #[must_use]
    pub fn member_not_found(team: impl Into<String>, member: impl Into<String>) -> Self {
        Self::MemberNotFound {
            team: team.into(),
            member: member.into(),
        }
    }

    /// Check if this error was caused by invalid caller input.
    ///
    /// Validation errors never modify the stored document.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::TeamExists(_)
                | Self::WrongMemberCount { .. }
                | Self::DuplicateMember(_)
                | Self::MemberAlreadyAssigned { .. }
                | Self::TeamNotFound(_)
                | Self::MemberNotFound { .. }
                | Self::InvalidIdentity(_)
                | Self::PermissionDenied { .. }
        )
    }

    /// Check if this error means a team or member does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TeamNotFound(_) | Self::MemberNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TeamExists("Alpha".to_string());
        assert_eq!(err.to_string(), "team 'Alpha' already exists");

        let err = Error::TeamNotFound("Beta".to_string());
        assert_eq!(err.to_string(), "team 'Beta' not found");
    }

    #[test]
    fn test_wrong_member_count_display() {
        let err = Error::WrongMemberCount {
            expected: 5,
            actual: 3,
        };
        assert_eq!(err.to_string(), "a team needs exactly 5 members, got 3");
    }

    #[test]
    fn test_member_already_assigned_display() {
        let err = Error::MemberAlreadyAssigned {
            member: "Asha".to_string(),
            team: "Alpha".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Asha"));
        assert!(msg.contains("Alpha"));
    }

    #[test]
    fn test_member_not_found_display() {
        let err = Error::member_not_found("Alpha", "Zed");
        assert_eq!(err.to_string(), "'Zed' is not a member of team 'Alpha'");
    }

    #[test]
    fn test_validation_messages_are_distinct() {
        let errors = [
            Error::TeamExists("x".to_string()),
            Error::WrongMemberCount {
                expected: 5,
                actual: 4,
            },
            Error::DuplicateMember("x".to_string()),
            Error::MemberAlreadyAssigned {
                member: "x".to_string(),
                team: "y".to_string(),
            },
            Error::TeamNotFound("x".to_string()),
            Error::member_not_found("y", "x"),
        ];
        let messages: std::collections::HashSet<String> =
            errors.iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn test_is_validation_error() {
        assert!(Error::TeamExists("a".to_string()).is_validation_error());
        assert!(Error::DuplicateMember("a".to_string()).is_validation_error());
        assert!(Error::permission_denied("export --all").is_validation_error());
        assert!(!Error::internal("boom").is_validation_error());
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::TeamNotFound("a".to_string()).is_not_found());
        assert!(Error::member_not_found("a", "b").is_not_found());
        assert!(!Error::TeamExists("a".to_string()).is_not_found());
    }

    #[test]
    fn test_permission_denied_display() {
        let err = Error::permission_denied("export --all");
        assert!(err.to_string().contains("export --all"));
        assert!(err.to_string().contains("administrator"));
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_document_corrupt_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::DocumentCorrupt {
            path: PathBuf::from("/data/Jane_Doe.json"),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/Jane_Doe.json"));
        assert!(msg.contains("corrupt"));
    }

    #[test]
    fn test_roster_parse_display() {
        let err = Error::RosterParse {
            path: PathBuf::from("roster.csv"),
            line: 1,
            message: "missing Name column".to_string(),
        };
        assert_eq!(err.to_string(), "roster roster.csv line 1: missing Name column");
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "blank tech_lead".to_string(),
        };
        assert!(err.to_string().contains("blank tech_lead"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
