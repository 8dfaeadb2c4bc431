//! Caller identity passed explicitly into every store operation.

use crate::error::{Error, Result};

/// The tech lead on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    tech_lead: String,
    admin: bool,
}

impl Session {
    /// Create a regular session for a tech lead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if the name is blank after
    /// trimming, starts with `.`, or contains a path separator or control
    /// character. The name becomes a file name, so it must stay inside the
    /// data directory.
    pub fn new(tech_lead: impl Into<String>) -> Result<Self> {
        let raw = tech_lead.into();
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('.')
            || trimmed.contains(['/', '\\'])
            || trimmed.chars().any(|c| c.is_control() && !c.is_whitespace())
        {
            return Err(Error::InvalidIdentity(raw));
        }
        Ok(Self {
            tech_lead: trimmed.to_string(),
            admin: false,
        })
    }

    /// Create an administrator session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if the name is blank after trimming.
    pub fn admin(tech_lead: impl Into<String>) -> Result<Self> {
        Ok(Self::new(tech_lead)?.with_admin(true))
    }

    /// Set the administrator flag.
    #[must_use]
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    /// The tech lead's display name.
    #[must_use]
    pub fn tech_lead(&self) -> &str {
        &self.tech_lead
    }

    /// Whether this session may run administrator actions.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// File name stem for this identity: whitespace becomes `_`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.tech_lead
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect()
    }

    /// Fail unless this is an administrator session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] naming `action`.
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.admin {
            Ok(())
        } else {
            Err(Error::permission_denied(action))
        }
    }
}
