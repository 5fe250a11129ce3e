//! Error types for directory search.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for search operations.
///
/// Lookups return `SearchResult<Option<PathBuf>>`: the `Option` is the
/// resolved path, and `None` means no match under the root.
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that stop a search.
///
/// Not finding a match is not an error; it is reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search root does not exist or is not a directory.
    #[error("search root is not an existing directory: {}", .0.display())]
    InvalidSearchRoot(PathBuf),

    /// The observer requested cancellation.
    #[error("search cancelled")]
    Cancelled,

    /// The search root could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
