//! Node kinds and path entries.
//!
//! A host document contains many concrete node types. Each type that
//! carries a file path maps to exactly one [`NodeKind`], which decides both
//! how the path may be matched on disk and how a repaired path is written
//! back. The mapping itself is plain data held in [`NODE_TYPES`].

mod entry;
mod kind;

pub use entry::{NodeId, PathEntry, PatternFlags};
pub use kind::{
    lookup_node_type, NodeKind, NodeTypeInfo, CACHE_DESCRIPTOR_EXTENSION,
    CACHE_DIRECTORY_ATTRIBUTE, CACHE_NAME_ATTRIBUTE, NODE_TYPES,
};
