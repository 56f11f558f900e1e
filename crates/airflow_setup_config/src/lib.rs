//! Configuration types for the Airflow provisioning tool.
//!
//! - `SetupConfig`: the record collected from the operator, read-only once built
//! - `SetupSettings`: non-interactive knobs (versions, hosts, package list) from TOML
//! - `DbEngine`: the two supported backend databases

pub mod config;
pub mod defaults;
pub mod error;
pub mod paths;
pub mod settings;
pub mod types;

pub use config::SetupConfig;
pub use error::{Result, SettingsError};
pub use settings::{DbServerSettings, SetupSettings};
pub use types::DbEngine;
