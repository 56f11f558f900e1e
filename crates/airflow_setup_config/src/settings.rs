//! Non-interactive settings for a provisioning run.
//!
//! Everything here has a built-in default, so a settings file only needs the
//! keys it wants to change. The ten operator answers are never read from here.

use crate::defaults::*;
use crate::error::{Result, SettingsError};
use crate::paths::default_settings_path;
use crate::types::DbEngine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Connection details for an administrative database client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbServerSettings {
    pub host: String,
    pub port: u16,
    pub admin_user: String,
}

/// Settings for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupSettings {
    /// Pinned apache-airflow version
    pub airflow_version: String,

    /// Pinned Python version, used to select the constraints file
    pub python_version: String,

    /// Interpreter used to create the virtual environment
    pub python_bin: PathBuf,

    /// Directory name of the virtual environment under the Airflow home
    pub env_dir_name: String,

    /// Database created for Airflow's metadata
    pub database_name: String,

    /// Base URL of the published constraints files
    pub constraints_url_base: String,

    /// OS packages installed with apt
    pub packages: Vec<String>,

    pub mysql: DbServerSettings,

    pub postgresql: DbServerSettings,

    /// File name of the rendered supervisord config
    pub supervisor_conf_name: String,

    /// File name of the rendered Airflow programs config
    pub airflow_conf_name: String,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self {
            airflow_version: DEFAULT_AIRFLOW_VERSION.to_string(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            python_bin: PathBuf::from(DEFAULT_PYTHON_BIN),
            env_dir_name: DEFAULT_ENV_DIR_NAME.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            constraints_url_base: DEFAULT_CONSTRAINTS_URL_BASE.to_string(),
            packages: DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect(),
            mysql: DbServerSettings {
                host: DEFAULT_MYSQL_HOST.to_string(),
                port: DEFAULT_MYSQL_PORT,
                admin_user: DEFAULT_MYSQL_ADMIN_USER.to_string(),
            },
            postgresql: DbServerSettings {
                host: DEFAULT_POSTGRES_HOST.to_string(),
                port: DEFAULT_POSTGRES_PORT,
                admin_user: DEFAULT_POSTGRES_ADMIN_USER.to_string(),
            },
            supervisor_conf_name: DEFAULT_SUPERVISOR_CONF_NAME.to_string(),
            airflow_conf_name: DEFAULT_AIRFLOW_CONF_NAME.to_string(),
        }
    }
}

impl SetupSettings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| SettingsError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Resolve the settings for this run.
    ///
    /// Priority:
    /// 1. An explicit path (must exist)
    /// 2. ~/.airflow_setup/settings.toml, if present
    /// 3. Built-in defaults
    ///
    /// Returns the settings and the file they came from, if any.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let fallback = default_settings_path();
        if fallback.is_file() {
            return Ok((Self::load(&fallback)?, Some(fallback)));
        }

        debug!("No settings file found, using built-in defaults");
        Ok((Self::default(), None))
    }

    /// Server settings for the given engine.
    pub fn db_server(&self, engine: DbEngine) -> &DbServerSettings {
        match engine {
            DbEngine::Mysql => &self.mysql,
            DbEngine::Postgresql => &self.postgresql,
        }
    }

    /// Render as pretty JSON for the `settings --json` command.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
