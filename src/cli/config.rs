//! Configuration CLI commands

use clap::Subcommand;

use crate::config::settings::SETTING_KEYS;
use crate::config::{SchoolPaths, Settings};
use crate::error::SchoolResult;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Change one setting
    Set {
        /// Setting key (e.g. school_name, lock.enabled)
        key: String,
        value: String,
    },
    /// List the setting keys
    Keys,
}

/// Show paths and settings, or change a setting
pub fn handle_config_command(
    paths: &SchoolPaths,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> SchoolResult<()> {
    match cmd {
        None => {
            println!("SchoolBook Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  school_name:        {}", settings.school_name);
            println!("  school_address:     {}", settings.school_address);
            println!("  currency_symbol:    {}", settings.currency_symbol);
            println!("  date_format:        {}", settings.date_format);
            println!("  lock.enabled:       {}", settings.lock.enabled);
            println!(
                "  lock.admin_pin:     {}",
                if settings.lock.admin_pin.is_some() { "set" } else { "not set" }
            );
            println!("  lock.max_attempts:  {}", settings.lock.max_attempts);
        }
        Some(ConfigCommands::Set { key, value }) => {
            settings.set(&key, &value)?;
            settings.save(paths)?;
            tracing::info!(key = %key, "setting changed");
            if key == "lock.admin_pin" {
                println!("Updated lock.admin_pin");
            } else {
                println!("Updated {} = {}", key, value.trim());
            }
        }
        Some(ConfigCommands::Keys) => {
            for key in SETTING_KEYS {
                println!("{}", key);
            }
        }
    }
    Ok(())
}
