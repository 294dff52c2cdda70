//! sessionkey - stable project keys for Claude Code session sync.
//!
//! This binary prints canonical keys and project keys for filesystem paths,
//! reports which paths collide, and looks up the matching Claude Code
//! project directories.
//!
//! # Commands
//!
//! - `sessionkey normalize <PATH>...`: Print the canonical key of each path
//! - `sessionkey key <PATH>...`: Print the project key of each path
//! - `sessionkey collisions <PATH>...`: Print groups of paths sharing a key
//! - `sessionkey sessions <PATH>`: List session transcripts for a path
//! - `sessionkey projects`: List project keys under the Claude directory
//!
//! # Environment Variables
//!
//! See the [`config`](sessionkey::config) module for available configuration options.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sessionkey::config::{Config, ConfigOverrides};
use sessionkey::projects::{self, SessionEntry};
use sessionkey::report::PathOutcome;
use sessionkey::{NormalizationReport, ProjectKeyBuilder};

/// sessionkey - stable project keys for Claude Code session sync.
///
/// Maps filesystem paths to the keys session sync uses to match a project
/// across machines and naming variants.
#[derive(Parser, Debug)]
#[command(name = "sessionkey")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    SESSIONKEY_MACHINE_ID   Machine identifier (default: hostname)
    SESSIONKEY_HOME         Directory '~' expands to (default: user home)
    SESSIONKEY_CLAUDE_DIR   Claude directory (default: ~/.claude)
    RUST_LOG                Log filter (default: warn)

EXAMPLES:
    # Check that naming variants collide
    sessionkey collisions ~/Documents/test_temp_01 ~/Documents/test.temp.01

    # Project key for the current machine
    sessionkey key ~/Projects/my_app

    # Sessions Claude Code recorded for a directory
    sessionkey sessions ~/Projects/my_app
")]
struct Cli {
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Directory '~' expands to.
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Machine identifier for project keys.
    #[arg(long, global = true, value_name = "ID")]
    machine_id: Option<String>,

    /// Claude Code directory.
    #[arg(long, global = true, value_name = "DIR")]
    claude_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical key of each path.
    Normalize {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the project key (machine-id:canonical-key) of each path.
    Key {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print groups of paths that share a canonical key.
    Collisions {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List the Claude Code session transcripts recorded for a path.
    Sessions { path: String },

    /// List project keys under the Claude Code projects directory.
    Projects,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let overrides = ConfigOverrides {
        machine_id: cli.machine_id,
        home_dir: cli.home,
        claude_dir: cli.claude_dir,
    };
    let config = Config::from_env_with(&overrides).context("Failed to load configuration")?;

    debug!(
        machine_id = %config.machine_id,
        home_dir = %config.home_dir.display(),
        claude_dir = %config.claude_dir.display(),
        "Configuration loaded"
    );

    let normalizer = config.normalizer();

    match cli.command {
        Command::Normalize { paths } => {
            let report = NormalizationReport::run(&normalizer, &paths);
            print_report(&report, cli.json, |o| {
                o.canonical_key.as_ref().map(ToString::to_string)
            })?;
            Ok(exit_code(&report))
        }

        Command::Key { paths } => {
            let builder = ProjectKeyBuilder::new(&config.machine_id, normalizer)
                .context("Invalid machine id")?;
            let report = NormalizationReport::run_with_project_keys(&builder, &paths);
            print_report(&report, cli.json, |o| {
                o.project_key.as_ref().map(ToString::to_string)
            })?;
            Ok(exit_code(&report))
        }

        Command::Collisions { paths } => {
            let report = NormalizationReport::run(&normalizer, &paths);
            let groups = report.collisions();
            if cli.json {
                print_json(&groups)?;
            } else if groups.is_empty() {
                println!("No collisions.");
            } else {
                for group in &groups {
                    println!("{}", group.canonical_key);
                    for raw in &group.raw_paths {
                        println!("    {raw}");
                    }
                }
            }
            for failed in report.outcomes.iter().filter(|o| !o.is_ok()) {
                eprintln!("Error: {}", failed.error.as_deref().unwrap_or_default());
            }
            Ok(exit_code(&report))
        }

        Command::Sessions { path } => {
            let (key, sessions) =
                projects::sessions_for_path(&config.claude_dir, &normalizer, &path)
                    .with_context(|| format!("Failed to look up sessions for {path}"))?;
            let dir = projects::project_dir(&config.claude_dir, &key);
            info!(project_dir = %dir.display(), count = sessions.len(), "Sessions found");

            if cli.json {
                print_json(&SessionsOutput {
                    canonical_key: key.as_str(),
                    project_dir: &dir,
                    sessions: &sessions,
                })?;
            } else {
                println!("{}", dir.display());
                if sessions.is_empty() {
                    println!("    (no sessions)");
                }
                for session in &sessions {
                    let status = if session.is_active { "active" } else { "completed" };
                    println!("    {}  {status}", session.session_id);
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Projects => {
            let keys = projects::list_projects(&config.claude_dir).with_context(|| {
                format!("Failed to list projects in {}", config.claude_dir.display())
            })?;
            if cli.json {
                print_json(&keys)?;
            } else {
                for key in &keys {
                    println!("{key}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionsOutput<'a> {
    canonical_key: &'a str,
    project_dir: &'a Path,
    sessions: &'a [SessionEntry],
}

/// Prints one line per outcome: `path -> value` or the error on stderr.
fn print_report<F>(report: &NormalizationReport, json: bool, value: F) -> Result<()>
where
    F: Fn(&PathOutcome) -> Option<String>,
{
    if json {
        return print_json(report);
    }
    for outcome in &report.outcomes {
        match (value(outcome), &outcome.error) {
            (Some(v), _) => println!("{} -> {v}", outcome.raw_path),
            (None, Some(e)) => eprintln!("Error: {e}"),
            (None, None) => {}
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn exit_code(report: &NormalizationReport) -> ExitCode {
    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Initializes the logging subsystem. Logs go to stderr.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}
