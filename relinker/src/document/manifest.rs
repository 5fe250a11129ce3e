//! JSON scene manifest.
//!
//! A manifest is a flat export of the path-bearing parts of a scene:
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "name": "skin_file",
//!       "type": "file",
//!       "attributes": { "fileTextureName": "/old/tex/skin.<UDIM>.exr" },
//!       "flags": { "uvTilingMode": true }
//!     }
//!   ],
//!   "references": [
//!     { "name": "charRN", "path": "/old/assets/char.ma", "loadable": true }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{DocumentError, DocumentResult};
use super::HostDocument;
use crate::node::NodeId;

/// A node with string attributes and switch flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Unique node name.
    pub name: NodeId,

    /// Host type name.
    #[serde(rename = "type")]
    pub type_name: String,

    /// String attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Switch attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, bool>,

    /// Locked nodes reject every write.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
}

impl ManifestNode {
    /// Set a string attribute.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> &mut Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set a switch attribute.
    pub fn set_flag(&mut self, name: &str, on: bool) -> &mut Self {
        self.flags.insert(name.to_string(), on);
        self
    }

    /// Lock or unlock the node.
    pub fn set_locked(&mut self, locked: bool) -> &mut Self {
        self.locked = locked;
        self
    }
}

fn default_true() -> bool {
    true
}

/// A document reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestReference {
    /// Reference node name.
    pub name: NodeId,

    /// Referenced file.
    pub path: String,

    /// Whether the reference node itself is usable.
    #[serde(default = "default_true")]
    pub loadable: bool,

    /// Whether the referenced file is currently loaded.
    #[serde(default)]
    pub loaded: bool,
}

/// Serialized manifest contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Path-bearing nodes in document order.
    #[serde(default)]
    pub nodes: Vec<ManifestNode>,

    /// References in dependency graph order.
    #[serde(default)]
    pub references: Vec<ManifestReference>,
}

impl Manifest {
    /// Append a node and return it for further setup.
    pub fn add_node(&mut self, name: &str, type_name: &str) -> &mut ManifestNode {
        self.nodes.push(ManifestNode {
            name: NodeId::new(name),
            type_name: type_name.to_string(),
            ..Default::default()
        });
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Append a loadable, unloaded reference and return it.
    pub fn add_reference(&mut self, name: &str, path: &str) -> &mut ManifestReference {
        self.references.push(ManifestReference {
            name: NodeId::new(name),
            path: path.to_string(),
            loadable: true,
            loaded: false,
        });
        let last = self.references.len() - 1;
        &mut self.references[last]
    }

    /// Find a node by name.
    pub fn node(&self, id: &NodeId) -> Option<&ManifestNode> {
        self.nodes.iter().find(|n| &n.name == id)
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut ManifestNode> {
        self.nodes.iter_mut().find(|n| &n.name == id)
    }

    /// Find a reference by name.
    pub fn reference(&self, id: &NodeId) -> Option<&ManifestReference> {
        self.references.iter().find(|r| &r.name == id)
    }

    fn reference_mut(&mut self, id: &NodeId) -> Option<&mut ManifestReference> {
        self.references.iter_mut().find(|r| &r.name == id)
    }
}

/// A manifest, optionally backed by a file.
#[derive(Debug, Clone, Default)]
pub struct ManifestDocument {
    path: Option<PathBuf>,
    manifest: Manifest,
}

impl ManifestDocument {
    /// Wrap an in-memory manifest.
    pub fn new(manifest: Manifest) -> Self {
        Self {
            path: None,
            manifest,
        }
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DocumentError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                DocumentError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        debug!(
            path = %path.display(),
            nodes = manifest.nodes.len(),
            references = manifest.references.len(),
            "Loaded manifest"
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            manifest,
        })
    }

    /// Save back to the file the manifest was loaded from.
    pub fn save(&self) -> DocumentResult<()> {
        let path = self.path.as_ref().ok_or(DocumentError::NoPath)?;
        self.save_to(path)
    }

    /// Save to a JSON file.
    ///
    /// Writes a temporary sibling first and renames it into place.
    pub fn save_to(&self, path: impl AsRef<Path>) -> DocumentResult<()> {
        let path = path.as_ref();
        let write_err = |source: std::io::Error| DocumentError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let temp_path = path.with_extension("json.tmp");
        let file = std::fs::File::create(&temp_path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.manifest)
            .map_err(|e| write_err(e.into()))?;
        std::io::Write::flush(&mut writer).map_err(write_err)?;
        drop(writer);

        std::fs::rename(&temp_path, path).map_err(write_err)?;
        debug!(path = %path.display(), "Saved manifest");
        Ok(())
    }

    /// File the manifest was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The manifest contents.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Mutable manifest contents.
    pub fn manifest_mut(&mut self) -> &mut Manifest {
        &mut self.manifest
    }

    fn writable_node(&mut self, id: &NodeId) -> DocumentResult<&mut ManifestNode> {
        let node = self
            .manifest
            .node_mut(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))?;
        if node.locked {
            return Err(DocumentError::Locked { node: id.clone() });
        }
        Ok(node)
    }
}

impl HostDocument for ManifestDocument {
    fn nodes(&self) -> Vec<(NodeId, String)> {
        self.manifest
            .nodes
            .iter()
            .map(|n| (n.name.clone(), n.type_name.clone()))
            .collect()
    }

    fn get_attribute(&self, id: &NodeId, name: &str) -> Option<String> {
        self.manifest.node(id)?.attributes.get(name).cloned()
    }

    fn get_flag(&self, id: &NodeId, name: &str) -> bool {
        self.manifest
            .node(id)
            .and_then(|n| n.flags.get(name).copied())
            .unwrap_or(false)
    }

    fn set_attribute(&mut self, id: &NodeId, name: &str, value: &str) -> DocumentResult<()> {
        self.writable_node(id)?.set_attribute(name, value);
        Ok(())
    }

    fn set_attributes(&mut self, id: &NodeId, values: &[(&str, &str)]) -> DocumentResult<()> {
        // Lookup and lock check happen before any write.
        let node = self.writable_node(id)?;
        for (name, value) in values {
            node.set_attribute(name, value);
        }
        Ok(())
    }

    fn list_references(&self) -> Vec<(NodeId, String)> {
        self.manifest
            .references
            .iter()
            .map(|r| (r.name.clone(), r.path.clone()))
            .collect()
    }

    fn is_reference_loadable(&self, id: &NodeId) -> bool {
        self.manifest.reference(id).is_some_and(|r| r.loadable)
    }

    fn reload_reference(&mut self, id: &NodeId, path: &str) -> DocumentResult<()> {
        if self.manifest.reference(id).is_none() && self.manifest.node(id).is_some() {
            return Err(DocumentError::NotAReference(id.clone()));
        }
        let reference = self
            .manifest
            .reference_mut(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))?;
        reference.path = path.to_string();
        reference.loaded = true;
        Ok(())
    }
}
