//! `teamtrack` - CLI for the internship team tracker
//!
//! This binary is the form surface of the tracker: it turns command-line
//! arguments into store operations and records each change in the history
//! log.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use serde_json::json;

use teamtrack::cli::{
    Cli, Command, ConfigCommand, CreateTeamCommand, ExportCommand, HistoryCommand,
    MemberCommand, TeamCommand, UpdateMemberCommand, UpdateTeamCommand,
};
use teamtrack::{
    export, init_logging, Config, HistoryAction, HistoryLog, MilestoneProgress, NewTeam,
    Roster, Session, Team, TeamStore,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    if let Command::Config(config_cmd) = &cli.command {
        return handle_config(&config, config_cmd);
    }

    let session = cli
        .session(&config)
        .context("no tech lead selected; pass --tech-lead or set session.tech_lead")?;
    let app = App::new(&config, session)?;

    match &cli.command {
        Command::Team(team_cmd) => app.handle_team(team_cmd),
        Command::Member(MemberCommand::Update(cmd)) => app.update_member(cmd),
        Command::Candidates => app.candidates(),
        Command::Export(cmd) => app.export(&config, cmd),
        Command::History(cmd) => app.history(cmd),
        Command::Config(_) => Ok(()),
    }
}

/// Everything a command needs for one session.
#[derive(Debug)]
struct App {
    session: Session,
    store: TeamStore,
    history: Option<HistoryLog>,
    roster: Option<Roster>,
}

impl App {
    fn new(config: &Config, session: Session) -> Result<Self> {
        let store = TeamStore::new(config.data_dir());
        let history = config
            .storage
            .history_enabled
            .then(|| HistoryLog::open(config.history_dir(), &session));
        let roster = config
            .roster
            .path
            .as_ref()
            .map(|path| {
                Roster::load(path).with_context(|| format!("loading roster {}", path.display()))
            })
            .transpose()?;
        Ok(Self {
            session,
            store,
            history,
            roster,
        })
    }

    fn record(&self, action: HistoryAction, data: serde_json::Value) -> Result<()> {
        if let Some(history) = &self.history {
            history
                .append(action, data)
                .context("recording change history")?;
        }
        Ok(())
    }

    fn display_name(&self, name: &str) -> String {
        match &self.roster {
            Some(roster) => roster.display_name(name),
            None => name.to_string(),
        }
    }

    fn handle_team(&self, cmd: &TeamCommand) -> Result<()> {
        match cmd {
            TeamCommand::List { json } => self.list_teams(*json),
            TeamCommand::Show { name, json } => self.show_team(name, *json),
            TeamCommand::Create(cmd) => self.create_team(cmd),
            TeamCommand::Update(cmd) => self.update_team(cmd),
            TeamCommand::Delete { name, yes } => self.delete_team(name, *yes),
        }
    }

    fn list_teams(&self, json: bool) -> Result<()> {
        let document = self.store.load(&self.session)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&document)?);
            return Ok(());
        }
        if document.is_empty() {
            println!("No teams yet for {}.", self.session.tech_lead());
            return Ok(());
        }
        for (name, team) in document.iter() {
            let members: Vec<String> = team.member_names().map(|m| self.display_name(m)).collect();
            println!("{name} ({} members): {}", team.members.len(), members.join(", "));
        }
        Ok(())
    }

    fn show_team(&self, name: &str, json: bool) -> Result<()> {
        let document = self.store.load(&self.session)?;
        let team = document
            .team(name)
            .ok_or_else(|| teamtrack::Error::TeamNotFound(name.to_string()))?;
        if json {
            println!("{}", serde_json::to_string_pretty(team)?);
            return Ok(());
        }

        println!("Team: {name}");
        println!();
        println!("[Team progress]");
        print_progress(&team.team_progress);
        for (member, progress) in &team.members {
            println!();
            println!("[{}]", self.display_name(member));
            print_progress(progress);
        }
        Ok(())
    }

    fn create_team(&self, cmd: &CreateTeamCommand) -> Result<()> {
        let request = NewTeam::new(cmd.name.clone(), cmd.members.clone())
            .with_progress(MilestoneProgress::from(cmd.progress.clone()));
        let team = self.store.create_team(&self.session, request)?;
        self.record(HistoryAction::Created, team_snapshot(&cmd.name, &team))?;
        println!("Team '{}' created.", cmd.name);
        Ok(())
    }

    fn update_team(&self, cmd: &UpdateTeamCommand) -> Result<()> {
        let progress = MilestoneProgress::from(cmd.progress.clone());
        let team = self.store.update_team_progress(
            &self.session,
            &cmd.name,
            progress,
            cmd.mirror_to.as_deref(),
        )?;
        self.record(
            HistoryAction::Updated,
            json!({
                "team": cmd.name,
                "team_progress": team.team_progress,
                "mirror_to": cmd.mirror_to,
            }),
        )?;
        println!("Team progress for '{}' saved.", cmd.name);
        Ok(())
    }

    fn update_member(&self, cmd: &UpdateMemberCommand) -> Result<()> {
        let progress = MilestoneProgress::from(cmd.progress.clone());
        self.store
            .update_member_progress(&self.session, &cmd.team, &cmd.member, progress.clone())?;
        self.record(
            HistoryAction::Edited,
            json!({
                "team": cmd.team,
                "member": cmd.member,
                "progress": progress,
            }),
        )?;
        println!("Progress for '{}' in '{}' saved.", cmd.member, cmd.team);
        Ok(())
    }

    fn delete_team(&self, name: &str, yes: bool) -> Result<()> {
        if !yes {
            println!("This will delete team '{name}' and all of its progress.");
            println!("Use --yes to confirm.");
            return Ok(());
        }
        let team = self.store.delete_team(&self.session, name)?;
        self.record(HistoryAction::Deleted, team_snapshot(name, &team))?;
        println!("Team '{name}' deleted.");
        Ok(())
    }

    fn candidates(&self) -> Result<()> {
        let Some(roster) = &self.roster else {
            println!("No roster configured. Set roster.path in your configuration.");
            return Ok(());
        };
        let document = self.store.load(&self.session)?;
        let candidates = roster.candidates(&document);
        if candidates.is_empty() {
            println!("Every intern on the roster is already on a team.");
        }
        for name in candidates {
            println!("{name}");
        }
        Ok(())
    }

    fn export(&self, config: &Config, cmd: &ExportCommand) -> Result<()> {
        let (csv, rows, stem) = if cmd.all {
            let documents = self.store.load_all(&self.session)?;
            let rows: usize = documents
                .iter()
                .map(|(_, document)| document.export_rows().count())
                .sum();
            (
                export::to_csv_aggregated(&documents),
                rows,
                export::AGGREGATE_STEM.to_string(),
            )
        } else {
            let document = self.store.load(&self.session)?;
            (
                export::to_csv(&document),
                document.export_rows().count(),
                self.session.file_stem(),
            )
        };

        if cmd.stdout {
            print!("{csv}");
            return Ok(());
        }

        let path = cmd.output.clone().unwrap_or_else(|| {
            let at = config.export.timestamped_names.then(Local::now);
            config.export_dir().join(export::file_name(&stem, at))
        });
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&path, csv).with_context(|| format!("writing {}", path.display()))?;
        println!("Exported {rows} row(s) to {}", path.display());
        Ok(())
    }

    fn history(&self, cmd: &HistoryCommand) -> Result<()> {
        let Some(history) = &self.history else {
            println!("History is disabled (storage.history_enabled = false).");
            return Ok(());
        };
        let entries = history.recent(cmd.limit)?;
        if cmd.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }
        if entries.is_empty() {
            println!("No history found.");
        }
        for entry in entries {
            println!(
                "{} - {}: {}",
                entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                entry.action,
                entry.data
            );
        }
        Ok(())
    }
}

fn team_snapshot(name: &str, team: &Team) -> serde_json::Value {
    json!({
        "team": name,
        "members": team.member_names().collect::<Vec<_>>(),
        "team_progress": team.team_progress,
    })
}

fn print_progress(progress: &MilestoneProgress) {
    for (milestone, text) in progress.iter() {
        let text = if text.is_empty() { "-" } else { text };
        println!("  {:<30} {}", format!("{milestone}:"), text);
    }
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  History directory:  {}", config.history_dir().display());
                println!("  History enabled:    {}", config.storage.history_enabled);
                println!();
                println!("[Roster]");
                match &config.roster.path {
                    Some(path) => println!("  Path:               {}", path.display()),
                    None => println!("  Path:               (none)"),
                }
                println!();
                println!("[Export]");
                println!("  Output directory:   {}", config.export_dir().display());
                println!("  Timestamped names:  {}", config.export.timestamped_names);
                println!();
                println!("[Session]");
                println!(
                    "  Tech lead:          {}",
                    config.session.tech_lead.as_deref().unwrap_or("(none)")
                );
                println!("  Admin:              {}", config.session.admin);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::validate_file(&path)
                .with_context(|| format!("invalid configuration {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
