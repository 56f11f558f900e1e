//! `settings` - show the resolved settings.

use airflow_setup::SetupSettings;
use std::path::Path;

/// Arguments for the settings command
#[derive(Debug, Clone, clap::Args)]
pub struct SettingsArgs {
    /// Show resolved settings in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the settings command
pub fn run(args: SettingsArgs, settings: &SetupSettings, source: Option<&Path>) -> anyhow::Result<()> {
    if args.json {
        println!("{}", settings.to_json_pretty()?);
        return Ok(());
    }

    println!("AIRFLOW SETUP SETTINGS");
    println!("======================");
    println!();
    match source {
        Some(path) => println!("Source:      {}", path.display()),
        None => println!("Source:      built-in defaults"),
    }
    println!();
    println!("Airflow:     {}", settings.airflow_version);
    println!("Python:      {} ({})", settings.python_version, settings.python_bin.display());
    println!("Env dir:     <airflow home>/{}", settings.env_dir_name);
    println!("Constraints: {}", settings.constraints_url_base);
    println!("Database:    {}", settings.database_name);
    println!(
        "MySQL:       {}@{}:{}",
        settings.mysql.admin_user, settings.mysql.host, settings.mysql.port
    );
    println!(
        "PostgreSQL:  {}@{}:{}",
        settings.postgresql.admin_user, settings.postgresql.host, settings.postgresql.port
    );
    println!("Packages:    {}", settings.packages.join(" "));
    println!(
        "Outputs:     {}, {}",
        settings.supervisor_conf_name, settings.airflow_conf_name
    );
    Ok(())
}
