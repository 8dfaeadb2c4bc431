//! Storage layer for teamtrack.
//!
//! Each tech lead owns one JSON document under the data directory. The whole
//! document is read at the start of every operation, mutated in memory and
//! written back in full. There is no locking: two sessions for the same tech
//! lead racing through load-mutate-save lose updates, last writer wins.

pub mod migrations;
pub mod schema;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::milestone::MilestoneProgress;
use crate::session::Session;
use crate::team::{NewTeam, Team, TeamDocument};

use self::schema::{StoredDocument, DOCUMENT_EXTENSION};

/// File-backed store of team documents, one per tech lead.
#[derive(Debug, Clone)]
pub struct TeamStore {
    /// Directory holding one document per tech lead.
    data_dir: PathBuf,
}

impl TeamStore {
    /// Create a store rooted at `data_dir`.
    ///
    /// Nothing is created on disk until the first save.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The directory documents live in.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the document belonging to a session's tech lead.
    #[must_use]
    pub fn document_path(&self, session: &Session) -> PathBuf {
        self.data_dir
            .join(schema::document_file_name(&session.file_stem()))
    }

    /// Load a tech lead's document, migrating legacy shapes.
    ///
    /// Returns an empty document if none exists yet. If any team had to be
    /// upgraded the corrected document is saved before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentCorrupt`] if the file is not a valid document,
    /// or an I/O error if it cannot be read or the migration cannot be saved.
    pub fn load(&self, session: &Session) -> Result<TeamDocument> {
        let path = self.document_path(session);
        let Some(stored) = read_document(&path)? else {
            debug!("No document at {}, starting empty", path.display());
            return Ok(TeamDocument::new());
        };

        let (document, report) = migrations::migrate(stored);
        if !report.is_empty() {
            info!(
                "Migrated {} team(s) in {} to the current shape",
                report.teams_migrated(),
                path.display()
            );
            self.save(session, &document)?;
        }

        debug!("Loaded {} team(s) from {}", document.len(), path.display());
        Ok(document)
    }

    /// Overwrite a tech lead's document.
    ///
    /// The document is written to a sibling temporary file and renamed into
    /// place.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written.
    pub fn save(&self, session: &Session, document: &TeamDocument) -> Result<()> {
        let path = self.document_path(session);
        write_json(&path, document)?;
        debug!("Saved {} team(s) to {}", document.len(), path.display());
        Ok(())
    }

    /// Load, create a team, save.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`TeamDocument::create_team`] or any
    /// storage error. Nothing is written on a validation error.
    pub fn create_team(&self, session: &Session, request: NewTeam) -> Result<Team> {
        let mut document = self.load(session)?;
        let name = request.name.clone();
        let team = document.create_team(request)?.clone();
        self.save(session, &document)?;
        info!("Created team '{}' for {}", name, session.tech_lead());
        Ok(team)
    }

    /// Load, replace team-level progress, save.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`TeamDocument::update_team_progress`]
    /// or any storage error.
    pub fn update_team_progress(
        &self,
        session: &Session,
        team_name: &str,
        progress: MilestoneProgress,
        mirror_to: Option<&str>,
    ) -> Result<Team> {
        let mut document = self.load(session)?;
        let team = document
            .update_team_progress(team_name, progress, mirror_to)?
            .clone();
        self.save(session, &document)?;
        info!("Updated team progress of '{}'", team_name);
        Ok(team)
    }

    /// Load, replace one member's progress, save.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of
    /// [`TeamDocument::update_member_progress`] or any storage error.
    pub fn update_member_progress(
        &self,
        session: &Session,
        team_name: &str,
        member: &str,
        progress: MilestoneProgress,
    ) -> Result<Team> {
        let mut document = self.load(session)?;
        let team = document
            .update_member_progress(team_name, member, progress)?
            .clone();
        self.save(session, &document)?;
        info!("Updated progress of '{}' in team '{}'", member, team_name);
        Ok(team)
    }

    /// Load, delete a team, save. Returns the removed team.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`] or any storage error.
    pub fn delete_team(&self, session: &Session, team_name: &str) -> Result<Team> {
        let mut document = self.load(session)?;
        let removed = document.delete_team(team_name)?;
        self.save(session, &document)?;
        info!("Deleted team '{}'", team_name);
        Ok(removed)
    }

    /// Tech lead file stems that have a document, sorted.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the data directory exists but cannot be read.
    pub fn identities(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut stems = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            stems.push(stem.to_string());
        }
        stems.sort();
        Ok(stems)
    }

    /// Load every tech lead's document for an aggregated view, labelled by
    /// file stem.
    ///
    /// Documents that fail to load are skipped with a warning so one bad
    /// file does not hide everyone else's data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] unless `session` is an administrator.
    pub fn load_all(&self, session: &Session) -> Result<Vec<(String, TeamDocument)>> {
        session.require_admin("aggregate all tech leads")?;

        let mut documents = Vec::new();
        for stem in self.identities()? {
            let path = self.data_dir.join(schema::document_file_name(&stem));
            match read_document(&path) {
                Ok(Some(stored)) => {
                    let (document, _) = migrations::migrate(stored);
                    documents.push((stem, document));
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(documents)
    }
}

/// Read and parse a stored document. `None` if the file does not exist.
fn read_document(path: &Path) -> Result<Option<StoredDocument>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let stored = serde_json::from_str(&contents).map_err(|source| Error::DocumentCorrupt {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(stored))
}

/// Serialize `value` as pretty JSON and replace `path` with it.
pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::internal(format!("no file name in {}", path.display())))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(json.as_bytes())?;
    tmp_file.write_all(b"\n")?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
