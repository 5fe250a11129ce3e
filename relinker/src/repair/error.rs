//! Errors that abort a whole pass.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for pass operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Fatal pass errors. Raised before any entry is touched.
///
/// Per-entry problems are never errors; they are recorded in the report.
#[derive(Debug, Error)]
pub enum RepairError {
    /// The search root does not exist or is not a directory.
    #[error("search root is not an existing directory: {}", .0.display())]
    InvalidSearchRoot(PathBuf),

    /// Search-and-replace was given nothing to search for.
    #[error("search text must not be empty")]
    EmptyPattern,
}
