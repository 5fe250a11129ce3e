//! Shared setup for commands that touch documents.

use relinker::config::ConfigFile;
use relinker::logging::{init_logging, LoggingGuard, LoggingOptions};

use crate::error::CliError;

/// Loads configuration and installs logging for the lifetime of a command.
pub struct CliRunner {
    config: ConfigFile,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load the config file and start logging.
    ///
    /// `verbose` raises the level to `debug` regardless of configuration.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let mut options = LoggingOptions::from_settings(&config.logging);
        if verbose {
            options = options.with_level("debug");
        }
        let logging = init_logging(&options)?;

        Ok(Self {
            config,
            _logging: logging,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log the command and version at startup.
    pub fn log_startup(&self, command: &str) {
        tracing::info!(
            command,
            version = relinker::VERSION,
            log_dir = %self.config.logging.directory.display(),
            "Relinker starting"
        );
    }
}
