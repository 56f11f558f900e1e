//! The configuration record for a provisioning run.

use std::fmt;

/// Operator-supplied and derived parameters shared by every step.
///
/// Built once by the prompt collector and never mutated afterward. All values
/// are kept verbatim apart from trailing CR/LF removal.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SetupConfig {
    pub supervisor_sock_path: String,
    pub supervisor_log_path: String,
    pub supervisor_dir: String,
    pub airflow_home: String,
    /// `airflow_home` + "/" + env dir name, no normalization
    pub airflow_env: String,
    pub airflow_user: String,
    pub airflow_port: String,
    pub log_dir: String,
    /// Engine answer as typed; see `DbEngine::parse`
    pub db_type: String,
    pub db_user: String,
    pub db_password: String,
    pub airflow_version: String,
    pub python_version: String,
}

impl SetupConfig {
    /// Environment path for a given home: plain string concatenation.
    pub fn env_path(airflow_home: &str, env_dir_name: &str) -> String {
        format!("{}/{}", airflow_home, env_dir_name)
    }

    /// Look up a field by its template placeholder name (e.g. `AIRFLOW_HOME`).
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "SUPERVISOR_SOCK_PATH" => &self.supervisor_sock_path,
            "SUPERVISOR_LOG_PATH" => &self.supervisor_log_path,
            "SUPERVISOR_DIR" => &self.supervisor_dir,
            "AIRFLOW_HOME" => &self.airflow_home,
            "AIRFLOW_ENV" => &self.airflow_env,
            "AIRFLOW_USER" => &self.airflow_user,
            "AIRFLOW_PORT" => &self.airflow_port,
            "LOG_DIR" => &self.log_dir,
            "DB_TYPE" => &self.db_type,
            "DB_USER" => &self.db_user,
            "DB_PASSWORD" => &self.db_password,
            "AIRFLOW_VERSION" => &self.airflow_version,
            "PYTHON_VERSION" => &self.python_version,
            _ => return None,
        };
        Some(value.as_str())
    }
}

// Hand-written so the password never reaches logs via `{:?}`.
impl fmt::Debug for SetupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupConfig")
            .field("supervisor_sock_path", &self.supervisor_sock_path)
            .field("supervisor_log_path", &self.supervisor_log_path)
            .field("supervisor_dir", &self.supervisor_dir)
            .field("airflow_home", &self.airflow_home)
            .field("airflow_env", &self.airflow_env)
            .field("airflow_user", &self.airflow_user)
            .field("airflow_port", &self.airflow_port)
            .field("log_dir", &self.log_dir)
            .field("db_type", &self.db_type)
            .field("db_user", &self.db_user)
            .field("db_password", &"***")
            .field("airflow_version", &self.airflow_version)
            .field("python_version", &self.python_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_path_is_plain_concatenation() {
        assert_eq!(
            SetupConfig::env_path("/opt/airflow", "airflow_env"),
            "/opt/airflow/airflow_env"
        );
        assert_eq!(
            SetupConfig::env_path("/opt/airflow/", "airflow_env"),
            "/opt/airflow//airflow_env"
        );
        assert_eq!(SetupConfig::env_path("", "airflow_env"), "/airflow_env");
    }

    #[test]
    fn test_field_lookup() {
        let config = SetupConfig {
            airflow_port: "8080".to_string(),
            db_password: "secret".to_string(),
            ..Default::default()
        };
        assert_eq!(config.field("AIRFLOW_PORT"), Some("8080"));
        assert_eq!(config.field("DB_PASSWORD"), Some("secret"));
        assert_eq!(config.field("airflow_port"), None);
        assert_eq!(config.field("UNKNOWN"), None);
    }

    #[test]
    fn test_debug_hides_password() {
        let config = SetupConfig {
            db_password: "hunter2".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }
}
