//! Kind-specific write-back of repaired paths.
//!
//! Every write touches exactly one node. A failed write leaves the node's
//! previous attributes in place; there is no batch transaction.
//!
//! | Kind | Strategy |
//! |------|----------|
//! | `PlainFile`, `PlainDirectory` | Set the path attribute verbatim |
//! | `CacheFile` | Split into directory and base name, require a `.xml` descriptor, set both |
//! | `Reference` | Require a usable reference and an existing file, then reload |

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::document::{DocumentError, HostDocument};
use crate::node::{
    NodeId, NodeKind, PathEntry, CACHE_DESCRIPTOR_EXTENSION, CACHE_DIRECTORY_ATTRIBUTE,
    CACHE_NAME_ATTRIBUTE,
};

/// Errors raised while writing a path back to a node.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The new path failed a kind-specific check.
    #[error("validation failed for {path}: {reason}")]
    ValidationFailed { path: String, reason: String },

    /// The new reference target does not exist.
    #[error("reference target is not accessible: {0}")]
    TargetInaccessible(String),

    /// The reference node itself cannot be used.
    #[error("reference {0} is unavailable")]
    ReferenceUnavailable(NodeId),

    /// The document rejected the write.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Applies repaired paths to host document nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteBackApplier;

impl WriteBackApplier {
    /// Create an applier.
    pub fn new() -> Self {
        Self
    }

    /// Write `new_path` to an entry's node.
    pub fn apply_entry<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        entry: &PathEntry,
        new_path: &str,
    ) -> Result<(), WriteError> {
        self.apply(doc, &entry.id, entry.kind, &entry.attribute, new_path)
    }

    /// Write `new_path` to a node using the strategy for its kind.
    pub fn apply<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        id: &NodeId,
        kind: NodeKind,
        attribute: &str,
        new_path: &str,
    ) -> Result<(), WriteError> {
        match kind {
            NodeKind::PlainFile | NodeKind::PlainDirectory => {
                doc.set_attribute(id, attribute, new_path)?;
            }
            NodeKind::CacheFile => apply_cache(doc, id, new_path)?,
            NodeKind::Reference => apply_reference(doc, id, new_path)?,
        }

        debug!(node = %id, kind = %kind, path = new_path, "Wrote path");
        Ok(())
    }
}

fn apply_cache<D: HostDocument + ?Sized>(
    doc: &mut D,
    id: &NodeId,
    new_path: &str,
) -> Result<(), WriteError> {
    let path = Path::new(new_path);
    let invalid = |reason: &str| WriteError::ValidationFailed {
        path: new_path.to_string(),
        reason: reason.to_string(),
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| invalid("no directory component"))?;
    let base = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| invalid("no base name"))?;
    let dir_str = dir.to_str().ok_or_else(|| invalid("directory is not valid UTF-8"))?;

    let descriptor = dir.join(format!("{}.{}", base, CACHE_DESCRIPTOR_EXTENSION));
    if !descriptor.is_file() {
        return Err(invalid(&format!(
            "missing cache descriptor {}",
            descriptor.display()
        )));
    }

    doc.set_attributes(
        id,
        &[
            (CACHE_DIRECTORY_ATTRIBUTE, dir_str),
            (CACHE_NAME_ATTRIBUTE, base),
        ],
    )?;
    Ok(())
}

fn apply_reference<D: HostDocument + ?Sized>(
    doc: &mut D,
    id: &NodeId,
    new_path: &str,
) -> Result<(), WriteError> {
    if !doc.is_reference_loadable(id) {
        return Err(WriteError::ReferenceUnavailable(id.clone()));
    }
    if !Path::new(new_path).is_file() {
        return Err(WriteError::TargetInaccessible(new_path.to_string()));
    }
    doc.reload_reference(id, new_path)?;
    Ok(())
}
