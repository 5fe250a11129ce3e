//! Path entries extracted from a host document.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::kind::NodeKind;

/// Identifier of a node in the host document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The node name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Pattern switches read from the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    /// UDIM tiling is enabled on the node.
    pub udim: bool,
    /// Frame sequences are enabled on the node.
    pub sequence: bool,
}

/// A single path-bearing reference extracted from a host document.
///
/// Entries are rebuilt at the start of every pass and thrown away at the
/// end; they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Node the path belongs to.
    pub id: NodeId,
    /// Host type name of the node.
    pub type_name: String,
    /// Attribute the path is written to. Empty for references.
    pub attribute: String,
    /// Path as stored in the document, tokens included.
    pub raw_path: String,
    /// Kind of the node.
    pub kind: NodeKind,
    /// Pattern switches of the node.
    pub flags: PatternFlags,
    /// Whether the path currently resolves on disk.
    pub is_valid: bool,
}
