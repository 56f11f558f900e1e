use std::path::PathBuf;

use crate::defaults::SETTINGS_FILE_NAME;

/// Environment variable overriding the tool home directory.
pub const HOME_ENV_VAR: &str = "AIRFLOW_SETUP_HOME";

/// Resolve the tool home directory.
///
/// Priority:
/// 1) AIRFLOW_SETUP_HOME
/// 2) ~/.airflow_setup
/// 3) ./.airflow_setup
pub fn setup_home() -> PathBuf {
    if let Ok(override_path) = std::env::var(HOME_ENV_VAR) {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".airflow_setup")
}

/// Default logs directory: ~/.airflow_setup/logs
pub fn default_logs_dir() -> PathBuf {
    setup_home().join("logs")
}

/// Default settings file: ~/.airflow_setup/settings.toml
pub fn default_settings_path() -> PathBuf {
    setup_home().join(SETTINGS_FILE_NAME)
}
