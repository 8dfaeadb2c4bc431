//! Command-line interface for teamtrack.
//!
//! This module provides the CLI structure for the `teamtrack` binary. It is
//! the form surface of the tracker: it collects field values and hands them
//! to the store.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;

pub use commands::{
    ConfigCommand, CreateTeamCommand, ExportCommand, HistoryCommand, MemberCommand,
    MilestoneArgs, TeamCommand, UpdateMemberCommand, UpdateTeamCommand,
};

/// teamtrack - Track internship team progress
///
/// Tech leads create teams of five interns and record progress against five
/// milestones, per team and per member. Administrators export everything.
#[derive(Debug, Parser)]
#[command(name = "teamtrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Tech lead whose teams to work on
    #[arg(short = 't', long, global = true, value_name = "NAME")]
    pub tech_lead: Option<String>,

    /// Run as administrator
    #[arg(long, global = true)]
    pub admin: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage teams
    #[command(subcommand)]
    Team(TeamCommand),

    /// Update member progress
    #[command(subcommand)]
    Member(MemberCommand),

    /// List roster interns not yet on a team
    Candidates,

    /// Export progress as CSV
    Export(ExportCommand),

    /// Show the change history
    History(HistoryCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Build the caller's session from flags, falling back to configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if no tech lead is given anywhere.
    pub fn session(&self, config: &Config) -> Result<Session> {
        let tech_lead = self
            .tech_lead
            .clone()
            .or_else(|| config.session.tech_lead.clone())
            .ok_or_else(|| Error::InvalidIdentity(String::new()))?;
        Ok(Session::new(tech_lead)?.with_admin(self.admin || config.session.admin))
    }
}
