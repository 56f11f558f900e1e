//! Error types for settings loading.

use std::path::PathBuf;
use thiserror::Error;

/// Settings operation result type.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Settings errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("Failed to read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for `SetupSettings`
    #[error("Invalid settings file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl SettingsError {
    /// Path of the offending settings file.
    pub fn path(&self) -> &PathBuf {
        match self {
            SettingsError::Read { path, .. } | SettingsError::Parse { path, .. } => path,
        }
    }
}
