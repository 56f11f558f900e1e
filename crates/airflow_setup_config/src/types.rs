//! Canonical enums shared by the provisioning steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend database engine for the Airflow metadata store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    /// MySQL / MariaDB, provisioned through the `mysql` client
    Mysql,
    /// PostgreSQL, provisioned through the `psql` client
    Postgresql,
}

impl DbEngine {
    /// Exact, case-sensitive match against the operator's answer.
    ///
    /// Anything other than `mysql` or `postgresql` is unsupported.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mysql" => Some(DbEngine::Mysql),
            "postgresql" => Some(DbEngine::Postgresql),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DbEngine::Mysql => "mysql",
            DbEngine::Postgresql => "postgresql",
        }
    }

    /// Name of the `apache-airflow` extra that pulls in this engine's driver.
    pub fn airflow_extra(&self) -> &'static str {
        match self {
            DbEngine::Mysql => "mysql",
            DbEngine::Postgresql => "postgres",
        }
    }

    /// Name of the command-line client used for administrative SQL.
    pub fn client_program(&self) -> &'static str {
        match self {
            DbEngine::Mysql => "mysql",
            DbEngine::Postgresql => "psql",
        }
    }
}

impl fmt::Display for DbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
