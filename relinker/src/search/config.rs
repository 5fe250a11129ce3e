//! Search engine configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::ConfigFile;

/// How the location cache is consulted before a full walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStrategy {
    /// Check `dir/desired_name` exactly. Pattern names carry their token
    /// literally, so UDIM and sequence lookups always miss the cache and
    /// fall through to the walk.
    #[default]
    ExactName,
    /// List each cached directory and apply the full predicate.
    Predicate,
}

impl CacheStrategy {
    /// Name used in configuration files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            CacheStrategy::ExactName => "exact",
            CacheStrategy::Predicate => "predicate",
        }
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(CacheStrategy::ExactName),
            "predicate" => Ok(CacheStrategy::Predicate),
            other => Err(format!(
                "unknown cache strategy '{}', expected 'exact' or 'predicate'",
                other
            )),
        }
    }
}

/// Explicit state of one repair pass's search.
///
/// Passed by value into [`SearchEngine::new`](super::SearchEngine::new);
/// there is no global engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Directory tree to search.
    pub search_root: PathBuf,

    /// Sort directory entries by name before matching.
    ///
    /// Off by default: entries are matched in file system order, so the
    /// winner among several valid matches depends on the platform.
    pub sort_entries: bool,

    /// How the location cache is consulted.
    pub cache_strategy: CacheStrategy,

    /// Skip directories whose name starts with `.` during the walk.
    ///
    /// Off by default so the walk covers the whole root.
    pub skip_hidden: bool,

    /// Maximum depth below the root to descend. `None` is unbounded.
    pub max_depth: Option<usize>,
}

impl SearchConfig {
    /// Create a configuration with defaults for the given root.
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
            sort_entries: false,
            cache_strategy: CacheStrategy::default(),
            skip_hidden: false,
            max_depth: None,
        }
    }

    /// Build a configuration from the `[search]` section of a config file.
    pub fn from_config_file(config: &ConfigFile, search_root: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
            sort_entries: config.search.sort_entries,
            cache_strategy: config.search.cache_strategy,
            skip_hidden: config.search.skip_hidden,
            max_depth: config.search.max_depth,
        }
    }

    /// Set whether entries are sorted before matching.
    pub fn with_sorted_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Set the cache strategy.
    pub fn with_cache_strategy(mut self, strategy: CacheStrategy) -> Self {
        self.cache_strategy = strategy;
        self
    }

    /// Set whether hidden directories are skipped.
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Set the maximum walk depth.
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }
}
