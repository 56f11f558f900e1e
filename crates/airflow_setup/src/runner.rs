//! External command execution.
//!
//! Every step describes its subprocesses as `CommandSpec` values and hands them
//! to a `CommandRunner`:
//! - `SystemRunner`: spawns real processes, blocking until each exits
//! - `RecordingRunner`: records specs without running anything (tests)

use crate::error::CommandError;
use std::collections::BTreeMap;
use std::fmt;
use std::process::{Command, Stdio};
use tracing::debug;

const REDACTED: &str = "***";

/// A single external command: program, arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Added on top of the inherited environment of this child only
    pub env: BTreeMap<String, String>,
    secrets: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Mark a value that must not appear in logs or error messages.
    ///
    /// The value is masked where it stands alone: a whole argument, a short
    /// flag with an attached value (`-p<secret>`) or a single-quoted literal
    /// inside an argument (`'<secret>'`). Empty values are ignored.
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.push(value);
        }
        self
    }

    /// Argument vector with secrets masked.
    pub fn redacted_args(&self) -> Vec<String> {
        self.args.iter().map(|arg| self.redact(arg)).collect()
    }

    /// Shell-like command line with secrets masked, for logs and errors.
    pub fn display_line(&self) -> String {
        std::iter::once(quote(&self.program))
            .chain(self.redacted_args().iter().map(|arg| quote(arg)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn redact(&self, arg: &str) -> String {
        self.secrets
            .iter()
            .fold(arg.to_string(), |acc, secret| redact_secret(&acc, secret))
    }
}

fn redact_secret(arg: &str, secret: &str) -> String {
    if arg == secret {
        return REDACTED.to_string();
    }
    // -p<secret>
    if arg.len() == secret.len() + 2 && arg.starts_with('-') && arg.ends_with(secret) {
        return format!("{}{}", &arg[..2], REDACTED);
    }
    arg.replace(&format!("'{}'", secret), &format!("'{}'", REDACTED))
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Runs external commands on behalf of the pipeline steps.
pub trait CommandRunner {
    /// Run a command to completion. Non-zero exit is an error.
    fn run(&mut self, spec: &CommandSpec) -> Result<(), CommandError>;
}

/// Runs commands on the host, sharing this process's stdout/stderr.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, spec: &CommandSpec) -> Result<(), CommandError> {
        // Bare names are resolved up front so a missing tool gets a clear message
        if !spec.program.contains('/') && which::which(&spec.program).is_err() {
            return Err(CommandError::NotFound {
                program: spec.program.clone(),
            });
        }

        debug!(command = %spec, "Running command");

        let status = Command::new(&spec.program)
            .args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    CommandError::NotFound {
                        program: spec.program.clone(),
                    }
                } else {
                    CommandError::Spawn {
                        program: spec.program.clone(),
                        source,
                    }
                }
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                command: spec.display_line(),
                code: status.code(),
            })
        }
    }
}

/// Records every command instead of running it.
///
/// Optionally fails the Nth command (0-based) with a given exit code, to
/// simulate a broken host.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub commands: Vec<CommandSpec>,
    fail_at: Option<(usize, i32)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the command at `index` (0-based) with exit code `code`.
    pub fn failing_at(index: usize, code: i32) -> Self {
        Self {
            commands: Vec::new(),
            fail_at: Some((index, code)),
        }
    }

    /// Programs of the recorded commands, in order.
    pub fn programs(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.program.as_str()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, spec: &CommandSpec) -> Result<(), CommandError> {
        let index = self.commands.len();
        self.commands.push(spec.clone());
        match self.fail_at {
            Some((fail_index, code)) if fail_index == index => Err(CommandError::Failed {
                command: spec.display_line(),
                code: Some(code),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_args_and_env() {
        let spec = CommandSpec::new("sudo")
            .arg("apt")
            .args(["install", "-y"])
            .env("DEBIAN_FRONTEND", "noninteractive");

        assert_eq!(spec.program, "sudo");
        assert_eq!(spec.args, vec!["apt", "install", "-y"]);
        assert_eq!(spec.env.get("DEBIAN_FRONTEND").map(String::as_str), Some("noninteractive"));
    }

    #[test]
    fn test_display_line_redacts_secrets() {
        let spec = CommandSpec::new("mysql")
            .args(["-u", "root", "-ppw123", "-e", "CREATE USER 'af'@'%' IDENTIFIED BY 'pw123';"])
            .secret("pw123");

        let line = spec.display_line();
        assert!(!line.contains("pw123"), "secret leaked: {}", line);
        assert!(line.contains("-p***"));
        assert!(line.contains("IDENTIFIED BY"));
        // The real arguments are untouched
        assert_eq!(spec.args[2], "-ppw123");
    }

    #[test]
    fn test_short_secret_does_not_mask_other_args() {
        let spec = CommandSpec::new("mysql")
            .args([
                "-h",
                "127.0.0.1",
                "-P",
                "3306",
                "-u",
                "root",
                "-p1",
                "-e",
                "CREATE USER IF NOT EXISTS 'af1'@'%' IDENTIFIED BY '1';",
            ])
            .secret("1");

        let args = spec.redacted_args();
        assert_eq!(args[1], "127.0.0.1");
        assert_eq!(args[3], "3306");
        assert_eq!(args[6], "-p***");
        assert_eq!(args[8], "CREATE USER IF NOT EXISTS 'af1'@'%' IDENTIFIED BY '***';");
    }

    #[test]
    fn test_secret_as_whole_argument_is_masked() {
        let spec = CommandSpec::new("tool").args(["--password", "hunter2"]).secret("hunter2");
        assert_eq!(spec.redacted_args(), vec!["--password", "***"]);
    }

    #[test]
    fn test_empty_secret_is_ignored() {
        let spec = CommandSpec::new("psql").arg("-c").arg("SELECT 1;").secret("");
        assert_eq!(spec.display_line(), "psql -c 'SELECT 1;'");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain-arg"), "plain-arg");
        assert_eq!(quote("two words"), "'two words'");
        assert_eq!(quote("it's"), r"'it'\''s'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_recording_runner_fails_at_index() {
        let mut runner = RecordingRunner::failing_at(1, 2);
        let spec = CommandSpec::new("true");

        assert!(runner.run(&spec).is_ok());
        let err = runner.run(&spec).unwrap_err();
        assert!(matches!(err, CommandError::Failed { code: Some(2), .. }));
        assert!(runner.run(&spec).is_ok());
        assert_eq!(runner.commands.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let mut runner = SystemRunner::new();
        let spec = CommandSpec::new("sh").args(["-c", "exit 3"]);

        let err = runner.run(&spec).unwrap_err();
        assert!(matches!(err, CommandError::Failed { code: Some(3), .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_passes_env_to_child_only() {
        let mut runner = SystemRunner::new();
        let spec = CommandSpec::new("sh")
            .args(["-c", "test \"$AIRFLOW_SETUP_PROBE\" = yes"])
            .env("AIRFLOW_SETUP_PROBE", "yes");

        runner.run(&spec).unwrap();
        assert!(std::env::var("AIRFLOW_SETUP_PROBE").is_err());
    }

    #[test]
    fn test_system_runner_missing_program() {
        let mut runner = SystemRunner::new();
        let spec = CommandSpec::new("airflow-setup-definitely-missing-binary");

        let err = runner.run(&spec).unwrap_err();
        assert!(matches!(err, CommandError::NotFound { .. }));
    }
}
