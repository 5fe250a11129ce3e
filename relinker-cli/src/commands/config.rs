//! `relinker config` - inspect and edit `~/.relinker/config.ini`.
//!
//! Values are validated before they are saved: enum and numeric keys by
//! [`ConfigKey::set`], and `search.default_root` additionally has to name
//! an existing directory so a later `repair` without `--root` can start.

use std::path::Path;

use clap::Subcommand;
use console::style;
use relinker::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective value of one key
    Get {
        /// Key as section.key (e.g., search.default_root)
        key: String,
    },

    /// Validate and store a value
    Set {
        /// Key as section.key (e.g., search.cache_strategy)
        key: String,

        /// New value (empty clears optional keys)
        value: String,
    },

    /// Restore a key to its built-in default
    Reset {
        /// Key as section.key
        key: String,
    },

    /// Show every key, its value and whether it differs from the default
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against the user's config file.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    let path = config_file_path();
    match command {
        ConfigCommands::Get { key } => {
            let config = ConfigFile::load_from(&path)?;
            println!("{}", display_value(parse_key(&key)?, &config));
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let key = parse_key(&key)?;
            let stored = set_value(&path, key, &value)?;
            println!("{} {} = {}", style("set").green(), key.name(), stored);
            Ok(())
        }
        ConfigCommands::Reset { key } => {
            let key = parse_key(&key)?;
            let restored = reset_value(&path, key)?;
            println!("{} {} = {}", style("reset").green(), key.name(), restored);
            Ok(())
        }
        ConfigCommands::List => {
            let config = ConfigFile::load_from(&path)?;
            print_listing(&path, &config);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        let known: Vec<String> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!(
            "Unknown configuration key '{}'. Known keys: {}",
            key,
            known.join(", ")
        ))
    })
}

fn display_value(key: ConfigKey, config: &ConfigFile) -> String {
    let value = key.get(config);
    if value.is_empty() {
        "(not set)".to_string()
    } else {
        value
    }
}

/// Validate `value` for `key`, save it to `path`, and return the stored form.
fn set_value(path: &Path, key: ConfigKey, value: &str) -> Result<String, CliError> {
    if key == ConfigKey::SearchDefaultRoot {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !Path::new(trimmed).is_dir() {
            return Err(CliError::Config(format!(
                "search.default_root '{}' is not an existing directory",
                trimmed
            )));
        }
    }

    let mut config = ConfigFile::load_from(path)?;
    key.set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save_to(path)?;

    tracing::debug!(key = %key.name(), path = %path.display(), "Saved config value");
    Ok(display_value(key, &config))
}

/// Restore the default for `key` in the file at `path`.
fn reset_value(path: &Path, key: ConfigKey) -> Result<String, CliError> {
    let mut config = ConfigFile::load_from(path)?;
    key.reset(&mut config);
    config.save_to(path)?;
    Ok(display_value(key, &config))
}

fn print_listing(path: &Path, config: &ConfigFile) {
    let source = if path.exists() {
        style(path.display().to_string()).dim()
    } else {
        style(format!("{} (not created yet)", path.display())).dim()
    };
    println!("{} {}", style("Config file:").bold(), source);

    let mut current_section = "";
    for key in ConfigKey::all() {
        if key.section() != current_section {
            current_section = key.section();
            println!();
            println!("{}", style(format!("[{}]", current_section)).bold());
        }

        let origin = if key.is_default(config) {
            style("default").dim()
        } else {
            style("changed").yellow()
        };
        println!(
            "  {:<16} {:<32} {:<8} {}",
            key.key_name(),
            display_value(*key, config),
            origin,
            style(key.description()).dim()
        );
    }
}
