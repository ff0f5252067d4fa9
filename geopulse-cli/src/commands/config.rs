//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, `config path`, and
//! `config init` commands for viewing and modifying configuration settings
//! from the command line.

use std::path::Path;

use clap::Subcommand;
use geopulse::config::{ConfigFile, ConfigKey};

use crate::error::CliError;
use crate::runner::GlobalOptions;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., server.report_url)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., server.report_url)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,

    /// Create the configuration file with default values
    Init,
}

/// Run a config subcommand.
pub fn run(options: &GlobalOptions, command: ConfigCommands) -> Result<(), CliError> {
    let path = options.config_path();
    match command {
        ConfigCommands::Get { key } => run_get(&path, &key),
        ConfigCommands::Set { key, value } => run_set(&path, &key, &value),
        ConfigCommands::List => run_list(&path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Init => run_init(&path),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'geopulse config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(path: &Path, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load_from(path)?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load_from(path)?;
    config_key
        .set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save_to(path)?;

    tracing::info!(key = config_key.name(), value, "Configuration updated");
    println!("Set {} = {}", config_key.name(), value);

    Ok(())
}

/// List all configuration settings.
fn run_list(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    Ok(())
}

/// Write a default config file unless one exists.
fn run_init(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        println!("Configuration file already exists: {}", path.display());
        return Ok(());
    }

    ConfigFile::ensure_exists(path)?;
    println!("Created configuration file: {}", path.display());
    println!();
    println!("Point GeoPulse at your collector:");
    println!("  geopulse config set server.report_url https://example.org/send-location");
    println!("  geopulse config set server.socket_url wss://example.org");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopulse::config::{LocationSourceKind, PermissionMode};
    use tempfile::TempDir;

    #[test]
    fn test_set_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        run_set(&path, "location.source", "static").unwrap();
        run_set(&path, "location.latitude", "48.8566").unwrap();
        run_set(&path, "location.permission", "granted").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.location.source, LocationSourceKind::Static);
        assert_eq!(config.location.latitude, Some(48.8566));
        assert_eq!(config.location.permission, PermissionMode::Granted);
    }

    #[test]
    fn test_set_rejects_invalid_value_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        let result = run_set(&path, "acquisition.max_attempts", "many");

        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_unknown_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        let result = run_get(&path, "server.nope");

        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("server.nope")));
    }

    #[test]
    fn test_init_creates_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        run_init(&path).unwrap();
        assert!(path.exists());

        run_set(&path, "server.request_timeout", "5").unwrap();
        run_init(&path).unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.server.request_timeout, 5);
    }
}
