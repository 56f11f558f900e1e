//! `install` - the interactive provisioning run.

use airflow_setup::setup::{self, SUCCESS_MESSAGE};
use airflow_setup::{SetupSettings, SystemRunner};
use std::io::{self, Write};
use std::path::PathBuf;

/// Arguments for the install command
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Directory the rendered supervisor.conf and airflow.conf are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Default for InstallArgs {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Run the install command against the real host.
pub fn run(args: InstallArgs, settings: &SetupSettings) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut runner = SystemRunner::new();

    let report = setup::run(
        stdin.lock(),
        stdout.lock(),
        &mut runner,
        settings,
        &args.output_dir,
    )?;

    let mut out = stdout.lock();
    writeln!(out)?;
    for line in report.summary_lines() {
        writeln!(out, "  {}", line)?;
    }
    writeln!(out, "{}", SUCCESS_MESSAGE)?;
    Ok(())
}
