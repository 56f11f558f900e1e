//! CLI module for airflow-setup

pub mod error;
pub mod install;
pub mod settings;
