//! Database and user creation for the Airflow metadata store.
//!
//! Three administrative statements per engine, always in this order:
//! create database, create user, grant privileges. MySQL statements carry
//! `IF NOT EXISTS` guards; PostgreSQL ones do not, so a rerun against an
//! existing database fails on the first statement.

use crate::error::{Result, SetupError, Step};
use crate::runner::{CommandRunner, CommandSpec};
use airflow_setup_config::{DbEngine, SetupConfig, SetupSettings};
use tracing::{info, warn};

/// What the provisioner did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbOutcome {
    /// All three statements ran for this engine
    Provisioned(DbEngine),
    /// The engine answer was not recognized; nothing ran
    Skipped { engine: String },
}

/// SQL text for the three statements, in execution order.
pub fn statements(engine: DbEngine, database: &str, user: &str, password: &str) -> [String; 3] {
    match engine {
        DbEngine::Mysql => [
            format!("CREATE DATABASE IF NOT EXISTS {};", database),
            format!(
                "CREATE USER IF NOT EXISTS '{}'@'%' IDENTIFIED BY '{}';",
                user, password
            ),
            format!(
                "GRANT ALL PRIVILEGES ON {}.* TO '{}'@'%'; FLUSH PRIVILEGES;",
                database, user
            ),
        ],
        DbEngine::Postgresql => [
            format!("CREATE DATABASE {};", database),
            format!("CREATE USER {} WITH ENCRYPTED PASSWORD '{}';", user, password),
            format!("GRANT ALL PRIVILEGES ON DATABASE {} TO {};", database, user),
        ],
    }
}

/// Client invocations for an engine, one per statement.
pub fn commands(engine: DbEngine, config: &SetupConfig, settings: &SetupSettings) -> Vec<CommandSpec> {
    let server = settings.db_server(engine);
    let port = server.port.to_string();

    statements(
        engine,
        &settings.database_name,
        &config.db_user,
        &config.db_password,
    )
    .into_iter()
    .map(|sql| {
        let spec = match engine {
            // mysql admin login reuses the operator's DB password
            DbEngine::Mysql => CommandSpec::new(engine.client_program()).args([
                "-h".to_string(),
                server.host.clone(),
                "-P".to_string(),
                port.clone(),
                "-u".to_string(),
                server.admin_user.clone(),
                format!("-p{}", config.db_password),
                "-e".to_string(),
                sql,
            ]),
            DbEngine::Postgresql => CommandSpec::new(engine.client_program()).args([
                "-h".to_string(),
                server.host.clone(),
                "-p".to_string(),
                port.clone(),
                "-U".to_string(),
                server.admin_user.clone(),
                "-c".to_string(),
                sql,
            ]),
        };
        spec.secret(config.db_password.clone())
    })
    .collect()
}

/// Create the Airflow database and user for the configured engine.
///
/// An unrecognized engine issues no commands and is reported as
/// `DbOutcome::Skipped` rather than an error.
pub fn provision(
    runner: &mut dyn CommandRunner,
    config: &SetupConfig,
    settings: &SetupSettings,
) -> Result<DbOutcome> {
    let Some(engine) = DbEngine::parse(&config.db_type) else {
        warn!(engine = %config.db_type, "Unsupported DB type, skipping database setup");
        return Ok(DbOutcome::Skipped {
            engine: config.db_type.clone(),
        });
    };

    info!(%engine, database = %settings.database_name, user = %config.db_user, "Provisioning database");
    for spec in commands(engine, config, settings) {
        runner
            .run(&spec)
            .map_err(|e| SetupError::command(Step::Database, e))?;
    }
    Ok(DbOutcome::Provisioned(engine))
}

/// Human-readable engine label for progress messages.
pub fn engine_label(engine: DbEngine) -> &'static str {
    match engine {
        DbEngine::Mysql => "MySQL",
        DbEngine::Postgresql => "PostgreSQL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RecordingRunner;

    fn config(db_type: &str) -> SetupConfig {
        SetupConfig {
            db_type: db_type.to_string(),
            db_user: "af".to_string(),
            db_password: "pw123".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mysql_statements() {
        let sql = statements(DbEngine::Mysql, "airflow_db", "af", "pw123");
        assert_eq!(sql[0], "CREATE DATABASE IF NOT EXISTS airflow_db;");
        assert_eq!(sql[1], "CREATE USER IF NOT EXISTS 'af'@'%' IDENTIFIED BY 'pw123';");
        assert_eq!(
            sql[2],
            "GRANT ALL PRIVILEGES ON airflow_db.* TO 'af'@'%'; FLUSH PRIVILEGES;"
        );
    }

    #[test]
    fn test_mysql_command_shape() {
        let specs = commands(DbEngine::Mysql, &config("mysql"), &SetupSettings::default());

        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].program, "mysql");
        assert_eq!(
            specs[0].args,
            vec![
                "-h",
                "127.0.0.1",
                "-P",
                "3306",
                "-u",
                "root",
                "-ppw123",
                "-e",
                "CREATE DATABASE IF NOT EXISTS airflow_db;",
            ]
        );
        assert!(specs.iter().all(|s| !s.display_line().contains("pw123")));
    }

    #[test]
    fn test_postgres_command_shape() {
        let specs = commands(
            DbEngine::Postgresql,
            &config("postgresql"),
            &SetupSettings::default(),
        );

        assert_eq!(
            specs[1].args,
            vec![
                "-h",
                "127.0.0.1",
                "-p",
                "5432",
                "-U",
                "postgres",
                "-c",
                "CREATE USER af WITH ENCRYPTED PASSWORD 'pw123';",
            ]
        );
    }

    #[test]
    fn test_short_password_only_masks_password() {
        let config = SetupConfig {
            db_password: "1".to_string(),
            ..config("mysql")
        };
        let mut runner = RecordingRunner::failing_at(1, 1);

        let err = provision(&mut runner, &config, &SetupSettings::default()).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("-h 127.0.0.1 -P 3306 -u root '-p***'"), "{}", message);
        assert!(message.contains("IDENTIFIED BY '\\''***'\\''"), "{}", message);
    }

    #[test]
    fn test_unsupported_engine_runs_nothing() {
        let mut runner = RecordingRunner::new();

        let outcome = provision(&mut runner, &config("sqlite"), &SetupSettings::default()).unwrap();

        assert_eq!(
            outcome,
            DbOutcome::Skipped {
                engine: "sqlite".to_string()
            }
        );
        assert!(runner.commands.is_empty());
    }

    #[test]
    fn test_engine_match_is_case_sensitive() {
        let mut runner = RecordingRunner::new();
        let outcome = provision(&mut runner, &config("MySQL"), &SetupSettings::default()).unwrap();
        assert!(matches!(outcome, DbOutcome::Skipped { .. }));
        assert!(runner.commands.is_empty());
    }

    #[test]
    fn test_failure_stops_remaining_statements() {
        let mut runner = RecordingRunner::failing_at(1, 1);

        let err = provision(&mut runner, &config("postgresql"), &SetupSettings::default())
            .unwrap_err();

        assert_eq!(err.step(), Some(Step::Database));
        assert_eq!(runner.commands.len(), 2);
        assert!(!err.to_string().contains("pw123"));
    }
}
