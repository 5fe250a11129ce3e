//! Error types for host document access.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::node::NodeId;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised by a host document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// No node with this id exists.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The node exists but is not a reference.
    #[error("node is not a reference: {0}")]
    NotAReference(NodeId),

    /// The node cannot be modified.
    #[error("node {node} is locked")]
    Locked { node: NodeId },

    /// Failed to read the document file.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the document file.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document file is not a valid manifest.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document has no backing file to save to.
    #[error("document has no file path")]
    NoPath,
}
