//! Typed access to individual configuration keys.

use std::path::PathBuf;
use std::str::FromStr;

use super::error::{ConfigError, ConfigResult};
use super::file::ConfigFile;
use crate::search::CacheStrategy;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A `section.key` configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SearchDefaultRoot,
    SearchSortEntries,
    SearchCacheStrategy,
    SearchSkipHidden,
    SearchMaxDepth,
    LoggingLevel,
    LoggingDirectory,
}

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::SearchDefaultRoot,
            ConfigKey::SearchSortEntries,
            ConfigKey::SearchCacheStrategy,
            ConfigKey::SearchSkipHidden,
            ConfigKey::SearchMaxDepth,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// INI section of the key.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::SearchDefaultRoot
            | ConfigKey::SearchSortEntries
            | ConfigKey::SearchCacheStrategy
            | ConfigKey::SearchSkipHidden
            | ConfigKey::SearchMaxDepth => "search",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::SearchDefaultRoot => "default_root",
            ConfigKey::SearchSortEntries => "sort_entries",
            ConfigKey::SearchCacheStrategy => "cache_strategy",
            ConfigKey::SearchSkipHidden => "skip_hidden",
            ConfigKey::SearchMaxDepth => "max_depth",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string. Unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::SearchDefaultRoot => config
                .search
                .default_root
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ConfigKey::SearchSortEntries => config.search.sort_entries.to_string(),
            ConfigKey::SearchCacheStrategy => config.search.cache_strategy.to_string(),
            ConfigKey::SearchSkipHidden => config.search.skip_hidden.to_string(),
            ConfigKey::SearchMaxDepth => config
                .search
                .max_depth
                .map(|d| d.to_string())
                .unwrap_or_default(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config.logging.directory.to_string_lossy().into_owned(),
        }
    }

    /// Parse and store a value. Empty values reset optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> ConfigResult<()> {
        let value = value.trim();
        match self {
            ConfigKey::SearchDefaultRoot => {
                config.search.default_root = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            ConfigKey::SearchSortEntries => {
                config.search.sort_entries = self.parse_bool(value)?;
            }
            ConfigKey::SearchCacheStrategy => {
                config.search.cache_strategy = value
                    .parse::<CacheStrategy>()
                    .map_err(|reason| self.invalid(value, &reason))?;
            }
            ConfigKey::SearchSkipHidden => {
                config.search.skip_hidden = self.parse_bool(value)?;
            }
            ConfigKey::SearchMaxDepth => {
                config.search.max_depth = if value.is_empty() {
                    None
                } else {
                    Some(
                        value
                            .parse::<usize>()
                            .map_err(|e| self.invalid(value, &e.to_string()))?,
                    )
                };
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(self.invalid(value, "expected trace, debug, info, warn or error"));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingDirectory => {
                if value.is_empty() {
                    return Err(self.invalid(value, "directory must not be empty"));
                }
                config.logging.directory = PathBuf::from(value);
            }
        }
        Ok(())
    }

    /// One-line description shown by `config list`.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigKey::SearchDefaultRoot => "search root used when --root is omitted",
            ConfigKey::SearchSortEntries => "sort directory entries for reproducible matches",
            ConfigKey::SearchCacheStrategy => "exact or predicate lookups in remembered directories",
            ConfigKey::SearchSkipHidden => "do not descend into directories starting with '.'",
            ConfigKey::SearchMaxDepth => "maximum walk depth below the root (empty = unbounded)",
            ConfigKey::LoggingLevel => "log level when RUST_LOG is unset",
            ConfigKey::LoggingDirectory => "directory for rolling log files",
        }
    }

    /// Whether the key holds its built-in default in `config`.
    pub fn is_default(&self, config: &ConfigFile) -> bool {
        self.get(config) == self.get(&ConfigFile::default())
    }

    /// Restore the built-in default for this key.
    pub fn reset(&self, config: &mut ConfigFile) {
        let defaults = ConfigFile::default();
        match self {
            ConfigKey::SearchDefaultRoot => config.search.default_root = defaults.search.default_root,
            ConfigKey::SearchSortEntries => config.search.sort_entries = defaults.search.sort_entries,
            ConfigKey::SearchCacheStrategy => {
                config.search.cache_strategy = defaults.search.cache_strategy
            }
            ConfigKey::SearchSkipHidden => config.search.skip_hidden = defaults.search.skip_hidden,
            ConfigKey::SearchMaxDepth => config.search.max_depth = defaults.search.max_depth,
            ConfigKey::LoggingLevel => config.logging.level = defaults.logging.level,
            ConfigKey::LoggingDirectory => config.logging.directory = defaults.logging.directory,
        }
    }

    fn parse_bool(&self, value: &str) -> ConfigResult<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "search.sort_entries".parse::<ConfigKey>().unwrap(),
            ConfigKey::SearchSortEntries
        );
        assert_eq!(
            "logging.level".parse::<ConfigKey>().unwrap(),
            ConfigKey::LoggingLevel
        );
        assert!(matches!(
            "search.colour".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_every_key_round_trips_its_default() {
        let defaults = ConfigFile::default();
        for key in ConfigKey::all() {
            let mut config = ConfigFile::default();
            key.set(&mut config, &key.get(&defaults)).unwrap();
            assert_eq!(config, defaults, "key {}", key.name());
        }
    }

    #[test]
    fn test_reset_restores_default() {
        let mut config = ConfigFile::default();
        ConfigKey::SearchMaxDepth.set(&mut config, "4").unwrap();
        ConfigKey::SearchSkipHidden.set(&mut config, "true").unwrap();
        assert!(!ConfigKey::SearchMaxDepth.is_default(&config));

        ConfigKey::SearchMaxDepth.reset(&mut config);
        assert!(ConfigKey::SearchMaxDepth.is_default(&config));
        assert_eq!(config.search.max_depth, None);
        assert!(!ConfigKey::SearchSkipHidden.is_default(&config));
    }

    #[test]
    fn test_set_bool_variants() {
        let mut config = ConfigFile::default();
        ConfigKey::SearchSortEntries.set(&mut config, "yes").unwrap();
        assert!(config.search.sort_entries);
        ConfigKey::SearchSortEntries.set(&mut config, "OFF").unwrap();
        assert!(!config.search.sort_entries);
        assert!(ConfigKey::SearchSortEntries.set(&mut config, "maybe").is_err());
    }

    #[test]
    fn test_set_max_depth() {
        let mut config = ConfigFile::default();
        ConfigKey::SearchMaxDepth.set(&mut config, "4").unwrap();
        assert_eq!(config.search.max_depth, Some(4));
        ConfigKey::SearchMaxDepth.set(&mut config, "").unwrap();
        assert_eq!(config.search.max_depth, None);
        assert!(ConfigKey::SearchMaxDepth.set(&mut config, "-1").is_err());
    }

    #[test]
    fn test_set_log_level() {
        let mut config = ConfigFile::default();
        ConfigKey::LoggingLevel.set(&mut config, "DEBUG").unwrap();
        assert_eq!(config.logging.level, "debug");

        let err = ConfigKey::LoggingLevel.set(&mut config, "loud").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_unset_root_reads_empty() {
        let config = ConfigFile::default();
        assert_eq!(ConfigKey::SearchDefaultRoot.get(&config), "");
    }
}
