//! Core team types for teamtrack.
//!
//! A [`TeamDocument`] is everything one tech lead tracks: a mapping from team
//! name to [`Team`]. All validation of team mutations lives here so that it
//! holds no matter which front end drives the store.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::{self, ExportRow};
use crate::milestone::MilestoneProgress;

/// Number of members a team must have when it is created.
pub const TEAM_SIZE: usize = 5;

/// A team with team-level and per-member progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Progress reported for the team as a whole.
    pub team_progress: MilestoneProgress,
    /// Progress reported by each member, keyed by member name.
    pub members: BTreeMap<String, MilestoneProgress>,
}

impl Team {
    /// Whether the named member belongs to this team.
    #[must_use]
    pub fn has_member(&self, member: &str) -> bool {
        self.members.contains_key(member)
    }

    /// Member names in sorted order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

/// Request to create a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    /// Unique team name.
    pub name: String,
    /// Exactly [`TEAM_SIZE`] member names.
    pub members: Vec<String>,
    /// Initial team-level progress.
    pub progress: MilestoneProgress,
}

impl NewTeam {
    /// A new team with blank team-level progress.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
            progress: MilestoneProgress::default(),
        }
    }

    /// Set the initial team-level progress.
    #[must_use]
    pub fn with_progress(mut self, progress: MilestoneProgress) -> Self {
        self.progress = progress;
        self
    }
}

/// Every team owned by one tech lead, keyed by team name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamDocument {
    teams: BTreeMap<String, Team>,
}

impl TeamDocument {
    /// An empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// True when there are no teams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Look up a team by name.
    #[must_use]
    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.get(name)
    }

    /// Team names in sorted order.
    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    /// Iterate `(name, team)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Team)> {
        self.teams.iter().map(|(name, team)| (name.as_str(), team))
    }

    /// The team a member currently belongs to, if any.
    #[must_use]
    pub fn assigned_team(&self, member: &str) -> Option<&str> {
        self.iter()
            .find(|(_, team)| team.has_member(member))
            .map(|(name, _)| name)
    }

    /// Every member name that is on some team.
    #[must_use]
    pub fn assigned_members(&self) -> BTreeSet<&str> {
        self.teams
            .values()
            .flat_map(Team::member_names)
            .collect()
    }

    /// Add a team.
    ///
    /// # Errors
    ///
    /// Returns, in order of checking, [`Error::TeamExists`],
    /// [`Error::WrongMemberCount`], [`Error::DuplicateMember`] or
    /// [`Error::MemberAlreadyAssigned`]. The document is unchanged on error.
    pub fn create_team(&mut self, request: NewTeam) -> Result<&Team> {
        if self.teams.contains_key(&request.name) {
            return Err(Error::TeamExists(request.name));
        }
        if request.members.len() != TEAM_SIZE {
            return Err(Error::WrongMemberCount {
                expected: TEAM_SIZE,
                actual: request.members.len(),
            });
        }

        let mut members = BTreeMap::new();
        for member in &request.members {
            if members
                .insert(member.clone(), MilestoneProgress::default())
                .is_some()
            {
                return Err(Error::DuplicateMember(member.clone()));
            }
        }
        for member in &request.members {
            if let Some(team) = self.assigned_team(member) {
                return Err(Error::MemberAlreadyAssigned {
                    member: member.clone(),
                    team: team.to_string(),
                });
            }
        }

        let team = Team {
            team_progress: request.progress,
            members,
        };
        Ok(self.teams.entry(request.name).or_insert(team))
    }

    /// Replace a team's team-level progress.
    ///
    /// When `mirror_to` names a member, that member's progress is replaced
    /// with the same values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`], or [`Error::MemberNotFound`] if
    /// `mirror_to` is not on the team. The document is unchanged on error.
    pub fn update_team_progress(
        &mut self,
        team_name: &str,
        progress: MilestoneProgress,
        mirror_to: Option<&str>,
    ) -> Result<&Team> {
        let team = self
            .teams
            .get_mut(team_name)
            .ok_or_else(|| Error::TeamNotFound(team_name.to_string()))?;

        if let Some(member) = mirror_to {
            let slot = team
                .members
                .get_mut(member)
                .ok_or_else(|| Error::member_not_found(team_name, member))?;
            slot.clone_from(&progress);
        }
        team.team_progress = progress;
        Ok(team)
    }

    /// Replace one member's progress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`] or [`Error::MemberNotFound`].
    pub fn update_member_progress(
        &mut self,
        team_name: &str,
        member: &str,
        progress: MilestoneProgress,
    ) -> Result<&Team> {
        let team = self
            .teams
            .get_mut(team_name)
            .ok_or_else(|| Error::TeamNotFound(team_name.to_string()))?;
        let slot = team
            .members
            .get_mut(member)
            .ok_or_else(|| Error::member_not_found(team_name, member))?;
        *slot = progress;
        Ok(team)
    }

    /// Remove a team, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`] if there is no such team.
    pub fn delete_team(&mut self, team_name: &str) -> Result<Team> {
        self.teams
            .remove(team_name)
            .ok_or_else(|| Error::TeamNotFound(team_name.to_string()))
    }

    /// Flatten into one export row per (team, member) pair.
    ///
    /// The iterator borrows the document and is recomputed on every call.
    pub fn export_rows(&self) -> impl Iterator<Item = ExportRow<'_>> {
        export::rows(self)
    }

    pub(crate) fn from_teams(teams: BTreeMap<String, Team>) -> Self {
        Self { teams }
    }
}
