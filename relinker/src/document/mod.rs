//! Host document access.
//!
//! The live scene graph is an external collaborator. The engine reads and
//! writes it only through the [`HostDocument`] trait, and builds its list
//! of [`PathEntry`](crate::node::PathEntry) records with [`build_catalog`].
//!
//! [`ManifestDocument`] is a JSON-backed implementation used by the
//! command line tool and by tests.

mod catalog;
mod error;
mod manifest;

pub use catalog::{build_catalog, is_valid_path, read_entry};
pub use error::{DocumentError, DocumentResult};
pub use manifest::{Manifest, ManifestDocument, ManifestNode, ManifestReference};

use crate::node::NodeId;

/// Read/write access to a host document's path-bearing nodes.
pub trait HostDocument {
    /// Every node with its host type name, in document order.
    ///
    /// Reference nodes are not expected here; see
    /// [`list_references`](Self::list_references).
    fn nodes(&self) -> Vec<(NodeId, String)>;

    /// Read a string attribute.
    fn get_attribute(&self, id: &NodeId, name: &str) -> Option<String>;

    /// Read a switch attribute. Missing attributes read as off.
    fn get_flag(&self, id: &NodeId, name: &str) -> bool;

    /// Set a single string attribute.
    fn set_attribute(&mut self, id: &NodeId, name: &str, value: &str) -> DocumentResult<()>;

    /// Set several string attributes on one node. Either all are applied
    /// or none are.
    fn set_attributes(&mut self, id: &NodeId, values: &[(&str, &str)]) -> DocumentResult<()>;

    /// Reference nodes with their target paths, enumerated from the
    /// dependency graph.
    ///
    /// Implementations must not look references up by name: a reference
    /// whose file is missing cannot be queried that way.
    fn list_references(&self) -> Vec<(NodeId, String)>;

    /// Whether the reference node itself is usable.
    fn is_reference_loadable(&self, id: &NodeId) -> bool;

    /// Point a reference at a new file and reload it.
    fn reload_reference(&mut self, id: &NodeId, path: &str) -> DocumentResult<()>;
}
