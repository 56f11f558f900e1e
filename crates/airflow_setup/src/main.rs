//! airflow-setup
//!
//! Interactive provisioning for an Apache Airflow host:
//! - **Prompts**: ten questions, answers taken verbatim
//! - **Host setup**: apt packages, metadata database and user, virtualenv
//! - **Configs**: supervisor.conf and airflow.conf for supervisord
//!
//! The first failing step ends the run with exit code 1.

use airflow_setup::SetupSettings;
use airflow_setup_logging::{init_logging, LogConfig, FILE_ONLY_TARGET};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

mod cli;

#[derive(Parser, Debug)]
#[command(name = "airflow-setup", about = "Provision Apache Airflow under supervisord", version)]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Settings file (TOML). Defaults to ~/.airflow_setup/settings.toml if present
    #[arg(long, global = true, env = "AIRFLOW_SETUP_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive provisioning (default)
    Install(cli::install::InstallArgs),

    /// Show the resolved settings
    Settings(cli::settings::SettingsArgs),
}

fn run_command(cli: Cli) -> Result<()> {
    let (settings, source) = SetupSettings::resolve(cli.settings.as_deref())?;
    if let Some(path) = &source {
        info!(path = %path.display(), "Loaded settings");
    }

    match cli.command.unwrap_or_else(|| Commands::Install(Default::default())) {
        Commands::Install(args) => cli::install::run(args, &settings),
        Commands::Settings(args) => cli::settings::run(args, &settings, source.as_deref()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_guard = init_logging(LogConfig {
        app_name: "airflow-setup",
        verbose: cli.verbose,
        log_dir: None,
    });
    if let Some(dir) = log_guard.log_dir() {
        debug!(dir = %dir.display(), "File logging enabled");
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // stderr gets the report below; the file keeps the full chain
            error!(target: FILE_ONLY_TARGET, "{:#}", err);
            cli::error::print_error(&err);
            ExitCode::from(1)
        }
    }
}
