//! `teamtrack` - Internship team progress tracking
//!
//! This library provides the record store behind the tracker: one JSON
//! document of teams per tech lead, migrated to the current shape on load,
//! plus export, history and roster support for the command-line front end.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod logging;
pub mod milestone;
pub mod roster;
pub mod session;
pub mod storage;
pub mod team;

pub use config::Config;
pub use error::{Error, Result};
pub use export::ExportRow;
pub use history::{HistoryAction, HistoryEntry, HistoryLog};
pub use logging::init_logging;
pub use milestone::{Milestone, MilestoneProgress};
pub use roster::Roster;
pub use session::Session;
pub use storage::TeamStore;
pub use team::{NewTeam, Team, TeamDocument, TEAM_SIZE};
