//! matchday CLI
//!
//! Roster sheet import/export and scripted match replay.

mod replay;
mod roster_io;
mod settings;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use matchday_csv::ExportOptions;

use crate::roster_io::{load_roster, load_training_records, read_text, sessions_from_records};
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Team roster sheets and live match replay", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./matchday.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV sheet and print its rows as JSON
    #[command(subcommand)]
    Import(ImportSheet),

    /// Re-export a sheet with normalized dates and statuses
    #[command(subcommand)]
    Normalize(NormalizeSheet),

    /// Build a report sheet
    #[command(subcommand)]
    Export(ExportSheet),

    /// Run a match script and print the final report as JSON
    Replay {
        /// Match script JSON
        #[arg(long)]
        script: PathBuf,

        /// Players CSV the script's license numbers refer to
        #[arg(long)]
        players: PathBuf,

        /// Use the long activity feed
        #[arg(long, default_value = "false")]
        full: bool,
    },
}

#[derive(Subcommand)]
enum ImportSheet {
    Groups {
        #[arg(long)]
        file: PathBuf,
    },
    Players {
        #[arg(long)]
        file: PathBuf,
    },
    Users {
        #[arg(long)]
        file: PathBuf,

        /// Groups CSV the users' `Gruppo` column refers to
        #[arg(long)]
        groups: PathBuf,
    },
}

#[derive(Subcommand)]
enum NormalizeSheet {
    Players {
        /// Input players CSV
        #[arg(long)]
        file: PathBuf,

        /// Output CSV file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ExportSheet {
    /// Training attendance per player
    Attendance {
        /// Players CSV
        #[arg(long)]
        players: PathBuf,

        /// Training records JSON
        #[arg(long)]
        trainings: PathBuf,

        /// Output CSV file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings::load(cli.config.as_deref()).context("failed to load settings")?;
    matchday_observability::init_with(&settings.log.level, settings.log.format);

    let export_options = ExportOptions {
        bom: settings.csv.write_bom,
    };

    match cli.command {
        Commands::Import(sheet) => import(sheet),
        Commands::Normalize(NormalizeSheet::Players { file, out }) => {
            let roster = load_roster(&file)?;
            let csv = matchday_csv::export_players(roster.players(), export_options)?;
            emit(out.as_deref(), &csv)
        }
        Commands::Export(ExportSheet::Attendance {
            players,
            trainings,
            out,
        }) => {
            let roster = load_roster(&players)?;
            let records = load_training_records(&trainings)?;
            let sessions = sessions_from_records(&records, &roster)?;
            let csv = matchday_csv::export_attendance(roster.players(), &sessions, export_options)?;
            emit(out.as_deref(), &csv)
        }
        Commands::Replay {
            script,
            players,
            full,
        } => run_replay(&settings, &script, &players, full),
    }
}

fn import(sheet: ImportSheet) -> Result<()> {
    match sheet {
        ImportSheet::Groups { file } => {
            let groups = matchday_csv::import_groups(&read_text(&file)?)
                .with_context(|| format!("failed to import groups from {}", file.display()))?;
            print_json(&groups)
        }
        ImportSheet::Players { file } => {
            let roster = load_roster(&file)?;
            print_json(&roster.players().collect::<Vec<_>>())
        }
        ImportSheet::Users {
            file,
            groups: groups_file,
        } => {
            let groups = matchday_csv::import_groups(&read_text(&groups_file)?).with_context(|| {
                format!("failed to import groups from {}", groups_file.display())
            })?;
            let users = matchday_csv::import_users(&read_text(&file)?, groups.as_slice())
                .with_context(|| format!("failed to import users from {}", file.display()))?;
            print_json(&users)
        }
    }
}

fn run_replay(settings: &Settings, script_path: &Path, players: &Path, full: bool) -> Result<()> {
    let roster = load_roster(players)?;
    let script: replay::Script = serde_json::from_str(&read_text(script_path)?)
        .with_context(|| format!("failed to parse match script {}", script_path.display()))?;
    let outcome = replay::run(script, &roster, &settings.matches, full)?;
    print_json(&outcome)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    emit(None, &json)
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = text.len(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}
