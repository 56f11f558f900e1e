//! OS package installation through apt.

use crate::error::{Result, SetupError, Step};
use crate::runner::{CommandRunner, CommandSpec};
use airflow_setup_config::SetupSettings;
use tracing::info;

/// `sudo apt update`, then `sudo apt install -y <packages>`.
pub fn commands(settings: &SetupSettings) -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("sudo").args(["apt", "update"]),
        CommandSpec::new("sudo")
            .args(["apt", "install", "-y"])
            .args(settings.packages.iter().cloned()),
    ]
}

/// Refresh the package index and install the fixed package list.
///
/// Stops at the first failing command.
pub fn install(runner: &mut dyn CommandRunner, settings: &SetupSettings) -> Result<()> {
    info!(packages = ?settings.packages, "Installing system packages");
    for spec in commands(settings) {
        runner
            .run(&spec)
            .map_err(|e| SetupError::command(Step::Packages, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RecordingRunner;

    #[test]
    fn test_commands_update_then_install() {
        let specs = commands(&SetupSettings::default());

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].display_line(), "sudo apt update");
        assert_eq!(
            specs[1].display_line(),
            "sudo apt install -y python3-venv python3-dev libmariadb-dev build-essential mariadb-client-compat supervisor"
        );
    }

    #[test]
    fn test_install_stops_after_failed_update() {
        let mut runner = RecordingRunner::failing_at(0, 100);

        let err = install(&mut runner, &SetupSettings::default()).unwrap_err();

        assert_eq!(err.step(), Some(Step::Packages));
        assert_eq!(runner.commands.len(), 1);
    }
}
