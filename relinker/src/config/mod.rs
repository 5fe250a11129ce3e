//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.relinker/config.ini`:
//!
//! ```ini
//! [search]
//! default_root = /mnt/projects/assets
//! sort_entries = false
//! cache_strategy = exact
//! skip_hidden = false
//! max_depth =
//!
//! [logging]
//! level = info
//! directory = /home/user/.relinker/logs
//! ```
//!
//! Missing files and missing keys fall back to defaults. [`ConfigKey`]
//! gives typed, validated access to every key for the `config` command.

mod error;
mod file;
mod keys;

pub use error::{ConfigError, ConfigResult};
pub use file::{
    config_directory, config_file_path, ConfigFile, LoggingSettings, SearchSettings,
    DEFAULT_LOG_LEVEL,
};
pub use keys::ConfigKey;
