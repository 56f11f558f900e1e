use std::fs;
use std::io::Cursor;

use airflow_setup::{run, DbEngine, DbOutcome, RecordingRunner, SetupSettings, Step};
use tempfile::TempDir;

fn answers(db_type: &str) -> Cursor<Vec<u8>> {
    let lines = [
        "/var/run/supervisor.sock",
        "/var/log/supervisor/supervisord.log",
        "/etc/supervisor/conf.d",
        "/opt/airflow",
        "root",
        "8080",
        "/opt/airflow/logs",
        db_type,
        "af",
        "pw123",
    ];
    Cursor::new(format!("{}\n", lines.join("\n")).into_bytes())
}

/// End-to-end: postgresql answers produce exactly the expected psql calls.
#[test]
fn test_postgresql_run_issues_expected_commands() {
    let out_dir = TempDir::new().expect("create output dir");
    let mut runner = RecordingRunner::new();
    let mut output = Vec::new();

    let report = run(
        answers("postgresql"),
        &mut output,
        &mut runner,
        &SetupSettings::default(),
        out_dir.path(),
    )
    .expect("pipeline succeeds");

    assert_eq!(report.database, DbOutcome::Provisioned(DbEngine::Postgresql));
    assert_eq!(report.config.airflow_env, "/opt/airflow/airflow_env");

    let psql: Vec<_> = runner
        .commands
        .iter()
        .filter(|c| c.program == "psql")
        .collect();
    assert_eq!(psql.len(), 3, "expected exactly three psql invocations");
    let sql: Vec<&str> = psql
        .iter()
        .map(|c| c.args.last().expect("sql argument").as_str())
        .collect();
    assert_eq!(
        sql,
        vec![
            "CREATE DATABASE airflow_db;",
            "CREATE USER af WITH ENCRYPTED PASSWORD 'pw123';",
            "GRANT ALL PRIVILEGES ON DATABASE airflow_db TO af;",
        ]
    );

    assert_eq!(
        runner.programs(),
        vec![
            "sudo",
            "sudo",
            "psql",
            "psql",
            "psql",
            "/usr/local/bin/python3.12",
            "/opt/airflow/airflow_env/bin/python",
            "/opt/airflow/airflow_env/bin/python",
        ]
    );

    let printed = String::from_utf8(output).expect("utf8 output");
    assert!(printed.contains("Installing system packages..."));
    assert!(printed.contains("Setting up PostgreSQL DB and user..."));
    assert!(printed.contains("Setting up Python virtual environment and installing Airflow..."));

    assert!(out_dir.path().join("supervisor.conf").is_file());
    assert!(out_dir.path().join("airflow.conf").is_file());
}

#[test]
fn test_mysql_run_uses_mysql_client() {
    let out_dir = TempDir::new().expect("create output dir");
    let mut runner = RecordingRunner::new();

    let report = run(
        answers("mysql"),
        Vec::<u8>::new(),
        &mut runner,
        &SetupSettings::default(),
        out_dir.path(),
    )
    .expect("pipeline succeeds");

    assert_eq!(report.database, DbOutcome::Provisioned(DbEngine::Mysql));
    let mysql: Vec<_> = runner
        .commands
        .iter()
        .filter(|c| c.program == "mysql")
        .collect();
    assert_eq!(mysql.len(), 3);
    assert!(mysql[0].args.last().unwrap().starts_with("CREATE DATABASE"));
    assert!(mysql[1].args.last().unwrap().starts_with("CREATE USER"));
    assert!(mysql[2].args.last().unwrap().starts_with("GRANT ALL PRIVILEGES"));

    let install = runner.commands.last().expect("pip install command");
    assert!(install.args.contains(&"apache-airflow[mysql]==3.0.3".to_string()));
}

/// Unsupported engine: no database commands, the run still finishes.
#[test]
fn test_unsupported_engine_skips_database_and_continues() {
    let out_dir = TempDir::new().expect("create output dir");
    let mut runner = RecordingRunner::new();
    let mut output = Vec::new();

    let report = run(
        answers("oracle"),
        &mut output,
        &mut runner,
        &SetupSettings::default(),
        out_dir.path(),
    )
    .expect("pipeline continues past unsupported engine");

    assert_eq!(
        report.database,
        DbOutcome::Skipped {
            engine: "oracle".to_string()
        }
    );
    assert!(runner
        .commands
        .iter()
        .all(|c| c.program != "psql" && c.program != "mysql"));
    assert_eq!(runner.commands.len(), 5, "2 apt + 3 environment commands");

    let printed = String::from_utf8(output).expect("utf8 output");
    assert!(printed.contains("Unsupported DB type: oracle"));
    assert!(report
        .summary_lines()
        .iter()
        .any(|line| line.contains("SKIPPED") && line.contains("oracle")));
    assert!(out_dir.path().join("airflow.conf").is_file());
}

/// A failing package manager stops the run before database or environment work.
#[test]
fn test_failing_package_install_aborts_run() {
    let out_dir = TempDir::new().expect("create output dir");
    let mut runner = RecordingRunner::failing_at(1, 100);

    let err = run(
        answers("postgresql"),
        Vec::<u8>::new(),
        &mut runner,
        &SetupSettings::default(),
        out_dir.path(),
    )
    .expect_err("apt failure must abort");

    assert_eq!(err.step(), Some(Step::Packages));
    assert_eq!(runner.programs(), vec!["sudo", "sudo"]);
    assert!(!out_dir.path().join("supervisor.conf").exists());
    assert!(!out_dir.path().join("airflow.conf").exists());
}

#[test]
fn test_failing_grant_aborts_before_environment() {
    let out_dir = TempDir::new().expect("create output dir");
    // 2 apt commands, then create db, create user, grant (index 4)
    let mut runner = RecordingRunner::failing_at(4, 1);

    let err = run(
        answers("postgresql"),
        Vec::<u8>::new(),
        &mut runner,
        &SetupSettings::default(),
        out_dir.path(),
    )
    .expect_err("grant failure must abort");

    assert_eq!(err.step(), Some(Step::Database));
    assert_eq!(runner.commands.len(), 5);
    assert!(!err.to_string().contains("pw123"));
}

#[test]
fn test_unwritable_output_dir_is_reported() {
    let tmp = TempDir::new().expect("create temp dir");
    let missing = tmp.path().join("missing");
    let mut runner = RecordingRunner::new();

    let err = run(
        answers("mysql"),
        Vec::<u8>::new(),
        &mut runner,
        &SetupSettings::default(),
        &missing,
    )
    .expect_err("render into missing dir must fail");

    assert_eq!(err.step(), Some(Step::Render));
    assert!(!missing.exists());
    assert!(fs::read_dir(tmp.path()).expect("list temp dir").next().is_none());
}
