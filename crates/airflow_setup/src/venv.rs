//! Virtual environment creation and Airflow installation.
//!
//! - Synchronous, one subprocess at a time
//! - Environment variables go to each child explicitly; this process's own
//!   environment is never modified

use crate::error::{Result, SetupError, Step};
use crate::runner::{CommandRunner, CommandSpec};
use airflow_setup_config::{DbEngine, SetupConfig, SetupSettings};
use std::collections::BTreeMap;
use tracing::info;

/// Constraints file URL for an Airflow/Python version pair.
pub fn constraints_url(base: &str, airflow_version: &str, python_version: &str) -> String {
    format!(
        "{}/constraints-{}/constraints-{}.txt",
        base.trim_end_matches('/'),
        airflow_version,
        python_version
    )
}

/// Requirement specifier, e.g. `apache-airflow[postgres]==3.0.3`.
///
/// Unknown engines install Airflow without a database extra.
pub fn airflow_requirement(config: &SetupConfig) -> String {
    match DbEngine::parse(&config.db_type) {
        Some(engine) => format!(
            "apache-airflow[{}]=={}",
            engine.airflow_extra(),
            config.airflow_version
        ),
        None => format!("apache-airflow=={}", config.airflow_version),
    }
}

/// Interpreter inside the environment.
pub fn env_python(config: &SetupConfig) -> String {
    format!("{}/bin/python", config.airflow_env)
}

/// Variables passed to the pip invocations.
pub fn pip_env(config: &SetupConfig) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("AIRFLOW_HOME".to_string(), config.airflow_home.clone()),
        ("AIRFLOW_VERSION".to_string(), config.airflow_version.clone()),
        ("PYTHON_VERSION".to_string(), config.python_version.clone()),
        ("VIRTUAL_ENV".to_string(), config.airflow_env.clone()),
    ])
}

/// The three environment commands: create, upgrade pip, install Airflow.
pub fn commands(config: &SetupConfig, settings: &SetupSettings) -> Vec<CommandSpec> {
    let python = env_python(config);
    let env = pip_env(config);
    let url = constraints_url(
        &settings.constraints_url_base,
        &config.airflow_version,
        &config.python_version,
    );

    let upgrade_pip = CommandSpec::new(python.clone())
        .args(["-m", "pip", "install", "--upgrade", "pip"])
        .envs(env.clone());

    let install_airflow = CommandSpec::new(python)
        .args(["-m", "pip", "install"])
        .arg(airflow_requirement(config))
        .args(["--constraint".to_string(), url])
        .envs(env);

    vec![
        CommandSpec::new(settings.python_bin.to_string_lossy())
            .args(["-m", "venv"])
            .arg(config.airflow_env.clone()),
        upgrade_pip,
        install_airflow,
    ]
}

/// Create the virtual environment and install the pinned Airflow into it.
pub fn build(
    runner: &mut dyn CommandRunner,
    config: &SetupConfig,
    settings: &SetupSettings,
) -> Result<()> {
    info!(
        env = %config.airflow_env,
        airflow_version = %config.airflow_version,
        python_version = %config.python_version,
        "Building Airflow virtual environment"
    );
    for spec in commands(config, settings) {
        runner
            .run(&spec)
            .map_err(|e| SetupError::command(Step::Environment, e))?;
    }
    Ok(())
}
