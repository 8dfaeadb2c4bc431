//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::milestone::MilestoneProgress;

/// Team management commands.
#[derive(Debug, Subcommand)]
pub enum TeamCommand {
    /// List teams
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one team's progress
    Show {
        /// Team name
        name: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a team of five interns
    Create(CreateTeamCommand),

    /// Replace a team's team-level progress
    Update(UpdateTeamCommand),

    /// Delete a team
    Delete {
        /// Team name
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Member progress commands.
#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// Replace one member's progress
    Update(UpdateMemberCommand),
}

/// Progress text for each milestone. Omitted milestones become empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct MilestoneArgs {
    /// Phase 0: Ideation & Mission
    #[arg(long, value_name = "TEXT")]
    pub ideation: Option<String>,

    /// Week 1: MVP Build
    #[arg(long, value_name = "TEXT")]
    pub mvp: Option<String>,

    /// Week 2: Testing & Iteration
    #[arg(long, value_name = "TEXT")]
    pub testing: Option<String>,

    /// Weeks 3-4: User Acquisition
    #[arg(long, value_name = "TEXT")]
    pub acquisition: Option<String>,

    /// Post-Internship Vision
    #[arg(long, value_name = "TEXT")]
    pub vision: Option<String>,
}

impl From<MilestoneArgs> for MilestoneProgress {
    fn from(args: MilestoneArgs) -> Self {
        Self::from_values([
            args.ideation.unwrap_or_default(),
            args.mvp.unwrap_or_default(),
            args.testing.unwrap_or_default(),
            args.acquisition.unwrap_or_default(),
            args.vision.unwrap_or_default(),
        ])
    }
}

/// Team creation arguments.
#[derive(Debug, Args)]
pub struct CreateTeamCommand {
    /// Team name
    pub name: String,

    /// Member name (repeat five times)
    #[arg(short, long = "member", value_name = "NAME")]
    pub members: Vec<String>,

    /// Initial team-level progress
    #[command(flatten)]
    pub progress: MilestoneArgs,
}

/// Team-level progress update arguments.
#[derive(Debug, Args)]
pub struct UpdateTeamCommand {
    /// Team name
    pub name: String,

    /// Also write the same progress into this member's record
    #[arg(long, value_name = "MEMBER")]
    pub mirror_to: Option<String>,

    /// New team-level progress
    #[command(flatten)]
    pub progress: MilestoneArgs,
}

/// Member progress update arguments.
#[derive(Debug, Args)]
pub struct UpdateMemberCommand {
    /// Team name
    pub team: String,

    /// Member name
    pub member: String,

    /// New member progress
    #[command(flatten)]
    pub progress: MilestoneArgs,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write to this file instead of the configured export directory
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print CSV to stdout
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Aggregate every tech lead's teams (administrators only)
    #[arg(long)]
    pub all: bool,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Maximum number of entries, newest first
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestone_args_default_to_empty() {
        let progress = MilestoneProgress::from(MilestoneArgs::default());
        assert!(progress.is_blank());
    }

    #[test]
    fn test_milestone_args_conversion() {
        let args = MilestoneArgs {
            ideation: Some("idea".to_string()),
            vision: Some("vision".to_string()),
            ..MilestoneArgs::default()
        };
        let progress = MilestoneProgress::from(args);

        assert_eq!(progress.ideation, "idea");
        assert_eq!(progress.mvp_build, "");
        assert_eq!(progress.vision, "vision");
    }

    #[test]
    fn test_team_command_debug() {
        let cmd = TeamCommand::Delete {
            name: "Alpha".to_string(),
            yes: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Delete"));
        assert!(debug_str.contains("Alpha"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
