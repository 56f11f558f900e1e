//! Airflow Setup - Core Library
//!
//! Interactive provisioning of an Apache Airflow host: OS packages, metadata
//! database, virtualenv, and supervisord configs.

pub mod database;
pub mod error;
pub mod packages;
pub mod prompt;
pub mod render;
pub mod runner;
pub mod setup;
pub mod venv;

pub use airflow_setup_config::{DbEngine, SetupConfig, SetupSettings};
pub use database::DbOutcome;
pub use error::{CommandError, SetupError, Step};
pub use runner::{CommandRunner, CommandSpec, RecordingRunner, SystemRunner};
pub use setup::{run, SetupReport};
