//! Operator-facing error reports
//!
//! Every report includes:
//! - What went wrong
//! - Which step it happened in
//! - Suggestions for how to fix it

use airflow_setup::{CommandError, SetupError, Step};
use airflow_setup_config::SettingsError;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    /// Build the report for a pipeline error.
    pub fn from_setup(err: &SetupError) -> Self {
        match err {
            SetupError::Command { step, source } => Self::command(*step, source),
            SetupError::Template { .. } => Self::new(err.to_string())
                .with_context("A built-in config template could not be rendered"),
            SetupError::Io { path, source } => Self::cannot_write(path, &source.to_string()),
            SetupError::Terminal(_) => Self::new(err.to_string())
                .with_context("Standard output was closed during the run"),
            SetupError::Settings(settings) => Self::invalid_settings(settings),
        }
    }

    fn command(step: Step, source: &CommandError) -> Self {
        let base = Self::new(source.to_string()).with_context(format!("During {}", step));
        match source {
            CommandError::NotFound { program } => base.with_suggestions([
                format!("TRY: Check that `{}` is installed and on PATH: which {}", program, program),
                "TRY: Set python_bin in settings.toml if Python lives elsewhere".to_string(),
            ]),
            CommandError::Spawn { .. } => base
                .with_suggestion("TRY: Check permissions on the program and the working directory"),
            CommandError::Failed { .. } => base.with_suggestions(step_hints(step)),
        }
    }

    /// A rendered config could not be written
    pub fn cannot_write(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot write config: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!(
                    "TRY: Check the directory exists and is writable: ls -ld {}",
                    path.parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| ".".to_string())
                ),
                "TRY: Pick another location with --output-dir".to_string(),
            ])
    }

    /// Settings file missing or malformed
    pub fn invalid_settings(err: &SettingsError) -> Self {
        Self::new(err.to_string()).with_suggestions([
            format!("TRY: Inspect the file: cat {}", err.path().display()),
            "TRY: Print the defaults: airflow-setup settings".to_string(),
        ])
    }
}

fn step_hints(step: Step) -> Vec<String> {
    match step {
        Step::Packages => vec![
            "TRY: Run `sudo apt update` by hand to see the package manager error".to_string(),
            "TRY: Check network access to the package mirrors".to_string(),
        ],
        Step::Database => vec![
            "TRY: Check the database server is running and reachable on the configured host/port"
                .to_string(),
            "TRY: PostgreSQL statements are not idempotent; drop airflow_db and the user before rerunning"
                .to_string(),
        ],
        Step::Environment => vec![
            "TRY: Check network access to PyPI and raw.githubusercontent.com".to_string(),
            "TRY: Remove the partially created virtualenv and rerun".to_string(),
        ],
        Step::Render => Vec::new(),
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print an error report to stderr, using the helpful form when possible.
pub fn print_error(err: &anyhow::Error) {
    if let Some(setup) = err.downcast_ref::<SetupError>() {
        eprint!("{}", HelpfulError::from_setup(setup));
    } else if let Some(settings) = err.downcast_ref::<SettingsError>() {
        eprint!("{}", HelpfulError::invalid_settings(settings));
    } else {
        eprintln!("{:?}", err);
    }
}
