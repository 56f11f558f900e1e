//! Canonical default values for settings and derived fields.

pub const DEFAULT_AIRFLOW_VERSION: &str = "3.0.3";
pub const DEFAULT_PYTHON_VERSION: &str = "3.12";
pub const DEFAULT_PYTHON_BIN: &str = "/usr/local/bin/python3.12";
pub const DEFAULT_ENV_DIR_NAME: &str = "airflow_env";
pub const DEFAULT_DATABASE_NAME: &str = "airflow_db";
pub const DEFAULT_CONSTRAINTS_URL_BASE: &str = "https://raw.githubusercontent.com/apache/airflow";

pub const DEFAULT_PACKAGES: &[&str] = &[
    "python3-venv",
    "python3-dev",
    "libmariadb-dev",
    "build-essential",
    "mariadb-client-compat",
    "supervisor",
];

pub const DEFAULT_MYSQL_HOST: &str = "127.0.0.1";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_ADMIN_USER: &str = "root";

pub const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
pub const DEFAULT_POSTGRES_ADMIN_USER: &str = "postgres";

pub const DEFAULT_SUPERVISOR_CONF_NAME: &str = "supervisor.conf";
pub const DEFAULT_AIRFLOW_CONF_NAME: &str = "airflow.conf";

/// File name looked up under the tool home when `--settings` is not given.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";
