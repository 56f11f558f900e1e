//! Error types for the provisioning pipeline.

use airflow_setup_config::SettingsError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline result type.
pub type Result<T> = std::result::Result<T, SetupError>;

/// Pipeline stage that issued a failing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Packages,
    Database,
    Environment,
    Render,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Packages => "package installation",
            Step::Database => "database provisioning",
            Step::Environment => "virtual environment setup",
            Step::Render => "config rendering",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single external command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Program is not on PATH (or the given path does not exist)
    #[error("Command not found: {program}")]
    NotFound { program: String },

    /// Process could not be spawned or waited on
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Process ran and exited unsuccessfully
    #[error("Command `{command}` {}", describe_exit(.code))]
    Failed {
        /// Redacted command line
        command: String,
        /// Exit code; `None` when terminated by a signal
        code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Errors that abort a provisioning run.
#[derive(Error, Debug)]
pub enum SetupError {
    /// An external command failed during a step
    #[error("{step} failed: {source}")]
    Command {
        step: Step,
        #[source]
        source: CommandError,
    },

    /// A config template is malformed
    #[error("Template '{template}' is invalid: {message}")]
    Template { template: String, message: String },

    /// A rendered file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Progress output could not be written
    #[error("Failed to write to terminal: {0}")]
    Terminal(#[source] std::io::Error),

    /// Settings file could not be loaded
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl SetupError {
    /// Wrap a command failure with the step that issued it.
    pub fn command(step: Step, source: CommandError) -> Self {
        Self::Command { step, source }
    }

    /// Create a template error.
    pub fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Pipeline step the error belongs to, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            SetupError::Command { step, .. } => Some(*step),
            SetupError::Template { .. } | SetupError::Io { .. } => Some(Step::Render),
            SetupError::Terminal(_) | SetupError::Settings(_) => None,
        }
    }
}
