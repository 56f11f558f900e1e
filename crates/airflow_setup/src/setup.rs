//! The provisioning pipeline.
//!
//! Prompt, install packages, provision the database, build the environment,
//! render configs. Strictly in that order; the first error ends the run.

use crate::database::{self, DbOutcome};
use crate::error::{Result, SetupError};
use crate::packages;
use crate::prompt::{self, PromptSession};
use crate::render;
use crate::runner::CommandRunner;
use crate::venv;
use airflow_setup_config::{DbEngine, SetupConfig, SetupSettings};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SUCCESS_MESSAGE: &str = "Setup completed successfully!";

/// What a completed run did.
#[derive(Debug)]
pub struct SetupReport {
    pub config: SetupConfig,
    pub database: DbOutcome,
    pub rendered: Vec<PathBuf>,
}

impl SetupReport {
    /// Lines for the end-of-run summary.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.database {
            DbOutcome::Provisioned(engine) => {
                lines.push(format!("Database: {} ({})", database::engine_label(*engine), engine))
            }
            DbOutcome::Skipped { engine } => lines.push(format!(
                "Database: SKIPPED, unsupported type '{}' (expected mysql or postgresql)",
                engine
            )),
        }
        lines.push(format!("Virtualenv: {}", self.config.airflow_env));
        for path in &self.rendered {
            lines.push(format!("Wrote: {}", path.display()));
        }
        lines
    }
}

/// Run the whole pipeline.
///
/// Prompts and progress messages go to `output`; subprocesses go through
/// `runner`; rendered configs land in `output_dir`.
pub fn run<R: BufRead, W: Write>(
    input: R,
    output: W,
    runner: &mut dyn CommandRunner,
    settings: &SetupSettings,
    output_dir: &Path,
) -> Result<SetupReport> {
    let mut session = PromptSession::new(input, output);
    let config = prompt::collect(&mut session, settings);
    let mut out = session.into_writer();
    info!(?config, "Collected configuration");

    say(&mut out, "Installing system packages...")?;
    packages::install(runner, settings)?;

    let banner = match DbEngine::parse(&config.db_type) {
        Some(engine) => format!("Setting up {} DB and user...", database::engine_label(engine)),
        None => format!("Unsupported DB type: {}", config.db_type),
    };
    say(&mut out, &banner)?;
    let database = database::provision(runner, &config, settings)?;

    say(
        &mut out,
        "Setting up Python virtual environment and installing Airflow...",
    )?;
    venv::build(runner, &config, settings)?;

    say(&mut out, "Generating supervisor configs...")?;
    let rendered = render::write_configs(&config, settings, output_dir)?;

    if let DbOutcome::Skipped { engine } = &database {
        warn!(%engine, "Run finished without database provisioning");
    }
    info!("Provisioning finished");

    Ok(SetupReport {
        config,
        database,
        rendered,
    })
}

fn say<W: Write>(out: &mut W, message: &str) -> Result<()> {
    writeln!(out, "{}", message)
        .and_then(|_| out.flush())
        .map_err(SetupError::Terminal)
}
