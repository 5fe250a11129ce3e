//! CLI error type.

use std::fmt;

use relinker::config::ConfigError;
use relinker::document::DocumentError;
use relinker::logging::LoggingError;
use relinker::repair::RepairError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or missing settings.
    Config(String),

    /// Configuration file could not be read or written.
    ConfigFile(ConfigError),

    /// Manifest could not be loaded or saved.
    Document(DocumentError),

    /// The pass could not start.
    Repair(RepairError),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// The Ctrl-C handler could not be installed.
    Signal(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::ConfigFile(_) => 2,
            CliError::Repair(_) => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Document(e) => write!(f, "Manifest error: {}", e),
            CliError::Repair(e) => write!(f, "Repair failed: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Signal(msg) => write!(f, "Failed to install Ctrl-C handler: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Document(e) => Some(e),
            CliError::Repair(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Config(_) | CliError::Signal(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<DocumentError> for CliError {
    fn from(e: DocumentError) -> Self {
        CliError::Document(e)
    }
}

impl From<RepairError> for CliError {
    fn from(e: RepairError) -> Self {
        CliError::Repair(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
