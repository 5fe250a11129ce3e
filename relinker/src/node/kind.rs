//! Node kind classification and the static node type table.

use std::fmt;
use std::str::FromStr;

/// Attribute holding the directory of a cache file node.
pub const CACHE_DIRECTORY_ATTRIBUTE: &str = "cachePath";

/// Attribute holding the base name (no extension) of a cache file node.
pub const CACHE_NAME_ATTRIBUTE: &str = "cacheName";

/// Extension of the descriptor file that must sit next to a cache.
pub const CACHE_DESCRIPTOR_EXTENSION: &str = "xml";

/// Closed set of path-bearing node kinds.
///
/// The kind determines whether directories are acceptable matches and
/// which write-back strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A single string attribute pointing at a file.
    PlainFile,
    /// A single string attribute pointing at a directory.
    PlainDirectory,
    /// A cache split across a directory and a name attribute, with an
    /// `.xml` descriptor sitting next to the data.
    CacheFile,
    /// A document reference, only reachable through the reference API.
    Reference,
}

impl NodeKind {
    /// All kinds, in declaration order.
    pub const ALL: [NodeKind; 4] = [
        NodeKind::PlainFile,
        NodeKind::PlainDirectory,
        NodeKind::CacheFile,
        NodeKind::Reference,
    ];

    /// Whether a directory entry can satisfy a search for this kind.
    pub fn accepts_directory(&self) -> bool {
        matches!(self, NodeKind::PlainDirectory)
    }

    /// Short lowercase name used on the command line and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::PlainFile => "file",
            NodeKind::PlainDirectory => "directory",
            NodeKind::CacheFile => "cache",
            NodeKind::Reference => "reference",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(NodeKind::PlainFile),
            "directory" | "dir" => Ok(NodeKind::PlainDirectory),
            "cache" => Ok(NodeKind::CacheFile),
            "reference" | "ref" => Ok(NodeKind::Reference),
            other => Err(format!("unknown node kind '{}'", other)),
        }
    }
}

/// Static description of one concrete host node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTypeInfo {
    /// Host type name as reported by the document.
    pub type_name: &'static str,
    /// Kind the type maps to.
    pub kind: NodeKind,
    /// Attribute carrying the path. Empty for references, which have no
    /// direct attribute. For caches this is the directory attribute.
    pub attribute: &'static str,
    /// Attribute that switches on UDIM tiling, if the type supports it.
    pub udim_flag: Option<&'static str>,
    /// Attribute that switches on frame sequences, if the type supports it.
    pub sequence_flag: Option<&'static str>,
}

impl NodeTypeInfo {
    const fn file(type_name: &'static str, attribute: &'static str) -> Self {
        Self {
            type_name,
            kind: NodeKind::PlainFile,
            attribute,
            udim_flag: None,
            sequence_flag: None,
        }
    }

    const fn with_udim(mut self, flag: &'static str) -> Self {
        self.udim_flag = Some(flag);
        self
    }

    const fn with_sequence(mut self, flag: &'static str) -> Self {
        self.sequence_flag = Some(flag);
        self
    }
}

/// Host node type table.
///
/// Type names and attribute names must match the host exactly.
pub const NODE_TYPES: &[NodeTypeInfo] = &[
    NodeTypeInfo::file("file", "fileTextureName")
        .with_udim("uvTilingMode")
        .with_sequence("useFrameExtension"),
    NodeTypeInfo::file("psdFileTex", "fileTextureName")
        .with_udim("uvTilingMode")
        .with_sequence("useFrameExtension"),
    NodeTypeInfo::file("imagePlane", "imageName").with_sequence("useFrameExtension"),
    NodeTypeInfo::file("aiImage", "filename"),
    NodeTypeInfo::file("aiStandIn", "dso").with_sequence("useFrameExtension"),
    NodeTypeInfo::file("aiVolume", "filename").with_sequence("useFrameExtension"),
    NodeTypeInfo::file("audio", "filename"),
    NodeTypeInfo::file("gpuCache", "cacheFileName"),
    NodeTypeInfo::file("AlembicNode", "abc_File"),
    NodeTypeInfo::file("RedshiftProxyMesh", "fileName").with_sequence("useFrameExtension"),
    NodeTypeInfo::file("VRayMesh", "fileName"),
    NodeTypeInfo {
        type_name: "xgmPalette",
        kind: NodeKind::PlainDirectory,
        attribute: "xgDataPath",
        udim_flag: None,
        sequence_flag: None,
    },
    NodeTypeInfo {
        type_name: "cacheFile",
        kind: NodeKind::CacheFile,
        attribute: CACHE_DIRECTORY_ATTRIBUTE,
        udim_flag: None,
        sequence_flag: None,
    },
    NodeTypeInfo {
        type_name: "reference",
        kind: NodeKind::Reference,
        attribute: "",
        udim_flag: None,
        sequence_flag: None,
    },
];

/// Look up a host node type by name.
pub fn lookup_node_type(type_name: &str) -> Option<&'static NodeTypeInfo> {
    NODE_TYPES.iter().find(|info| info.type_name == type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_file_node() {
        let info = lookup_node_type("file").unwrap();
        assert_eq!(info.kind, NodeKind::PlainFile);
        assert_eq!(info.attribute, "fileTextureName");
        assert_eq!(info.udim_flag, Some("uvTilingMode"));
        assert_eq!(info.sequence_flag, Some("useFrameExtension"));
    }

    #[test]
    fn test_lookup_cache_node() {
        let info = lookup_node_type("cacheFile").unwrap();
        assert_eq!(info.kind, NodeKind::CacheFile);
        assert_eq!(info.attribute, "cachePath");
    }

    #[test]
    fn test_lookup_unknown_type() {
        assert!(lookup_node_type("transform").is_none());
        // Type names are case-sensitive
        assert!(lookup_node_type("File").is_none());
    }

    #[test]
    fn test_type_names_are_unique() {
        for (i, a) in NODE_TYPES.iter().enumerate() {
            for b in &NODE_TYPES[i + 1..] {
                assert_ne!(a.type_name, b.type_name);
            }
        }
    }

    #[test]
    fn test_only_directory_kind_accepts_directories() {
        assert!(NodeKind::PlainDirectory.accepts_directory());
        assert!(!NodeKind::PlainFile.accepts_directory());
        assert!(!NodeKind::CacheFile.accepts_directory());
        assert!(!NodeKind::Reference.accepts_directory());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("file".parse::<NodeKind>().unwrap(), NodeKind::PlainFile);
        assert_eq!("CACHE".parse::<NodeKind>().unwrap(), NodeKind::CacheFile);
        assert_eq!("ref".parse::<NodeKind>().unwrap(), NodeKind::Reference);
        assert!("mesh".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_kind_name_round_trips() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.name().parse::<NodeKind>().unwrap(), kind);
        }
    }
}
