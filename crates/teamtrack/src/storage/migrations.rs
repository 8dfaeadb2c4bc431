//! Load-time migration of team documents.
//!
//! Documents are upgraded to the current shape team by team as they are
//! read. Two legacy forms are recognised:
//!
//! 1. `members` stored as a list of names: each name gets blank progress.
//! 2. `team_progress` missing: blank team progress is synthesized.
//!
//! Milestone mappings that lack a label or carry an unknown one are also
//! reshaped to exactly the five labels.
//!
//! The caller persists the result whenever the report is non-empty.

use std::collections::BTreeMap;

use tracing::debug;

use crate::milestone::{Milestone, MilestoneProgress};
use crate::team::{Team, TeamDocument};

use super::schema::{StoredDocument, StoredMembers, StoredProgress, StoredTeam};

/// What a migration changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Teams whose `members` list was converted to a progress map.
    pub converted_members: Vec<String>,
    /// Teams that were given blank team-level progress.
    pub synthesized_progress: Vec<String>,
    /// Teams with a milestone mapping that did not have exactly the five labels.
    pub reshaped_progress: Vec<String>,
}

impl MigrationReport {
    /// True when the document was already in the current shape.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converted_members.is_empty()
            && self.synthesized_progress.is_empty()
            && self.reshaped_progress.is_empty()
    }

    /// Number of distinct teams touched.
    #[must_use]
    pub fn teams_migrated(&self) -> usize {
        let mut names: Vec<&String> = self
            .converted_members
            .iter()
            .chain(&self.synthesized_progress)
            .chain(&self.reshaped_progress)
            .collect();
        names.sort();
        names.dedup();
        names.len()
    }
}

/// Upgrade a stored document to the current shape.
#[must_use]
pub fn migrate(stored: StoredDocument) -> (TeamDocument, MigrationReport) {
    let mut report = MigrationReport::default();
    let teams = stored
        .into_iter()
        .map(|(name, team)| {
            let team = migrate_team(&name, team, &mut report);
            (name, team)
        })
        .collect();
    (TeamDocument::from_teams(teams), report)
}

fn migrate_team(name: &str, stored: StoredTeam, report: &mut MigrationReport) -> Team {
    let mut reshaped = false;

    let members = match stored.members {
        StoredMembers::Progress(members) => members
            .into_iter()
            .map(|(member, progress)| {
                let (progress, complete) = to_progress(progress);
                reshaped |= !complete;
                (member, progress)
            })
            .collect::<BTreeMap<_, _>>(),
        StoredMembers::Names(names) => {
            debug!("Converting member list of team '{}'", name);
            report.converted_members.push(name.to_string());
            names
                .into_iter()
                .map(|member| (member, MilestoneProgress::default()))
                .collect::<BTreeMap<_, _>>()
        }
    };

    let team_progress = match stored.team_progress {
        Some(progress) => {
            let (progress, complete) = to_progress(progress);
            reshaped |= !complete;
            progress
        }
        None => {
            debug!("Synthesizing team progress for team '{}'", name);
            report.synthesized_progress.push(name.to_string());
            MilestoneProgress::default()
        }
    };

    if reshaped {
        debug!("Reshaping milestone mappings of team '{}'", name);
        report.reshaped_progress.push(name.to_string());
    }

    Team {
        team_progress,
        members,
    }
}

/// Convert a stored mapping; the flag is false unless it had exactly the
/// five labels.
fn to_progress(stored: StoredProgress) -> (MilestoneProgress, bool) {
    let mut progress = MilestoneProgress::default();
    let mut found = 0;
    for milestone in Milestone::ALL {
        if let Some(value) = stored.get(milestone.label()) {
            progress.set(milestone, value.clone());
            found += 1;
        }
    }
    (progress, found == stored.len() && found == Milestone::ALL.len())
}
