//! Reference catalog building.

use std::path::Path;

use tracing::{debug, trace};

use super::HostDocument;
use crate::node::{
    lookup_node_type, NodeId, NodeKind, NodeTypeInfo, PathEntry, PatternFlags,
    CACHE_DESCRIPTOR_EXTENSION, CACHE_NAME_ATTRIBUTE,
};
use crate::pattern::{classify, NamePredicate};

/// Enumerate every path-bearing node of the document.
///
/// Plain nodes come first in document order, followed by references in
/// dependency graph order. Nodes of unknown types and nodes with an empty
/// path are skipped.
pub fn build_catalog<D: HostDocument + ?Sized>(doc: &D) -> Vec<PathEntry> {
    let mut entries = Vec::new();

    for (id, type_name) in doc.nodes() {
        let Some(info) = lookup_node_type(&type_name) else {
            trace!(node = %id, type_name = %type_name, "Skipping node without a path attribute");
            continue;
        };
        if info.kind == NodeKind::Reference {
            continue;
        }
        if let Some(entry) = entry_for_node(doc, id, info) {
            entries.push(entry);
        }
    }

    for (id, path) in doc.list_references() {
        if path.is_empty() {
            continue;
        }
        let is_valid = is_valid_path(&path, NodeKind::Reference, PatternFlags::default());
        entries.push(PathEntry {
            id,
            type_name: "reference".to_string(),
            attribute: String::new(),
            raw_path: path,
            kind: NodeKind::Reference,
            flags: PatternFlags::default(),
            is_valid,
        });
    }

    debug!(
        entries = entries.len(),
        broken = entries.iter().filter(|e| !e.is_valid).count(),
        "Catalog built"
    );

    entries
}

/// Read the raw path and kind of a single node.
///
/// References are found through the reference listing, never by name.
pub fn read_entry<D: HostDocument + ?Sized>(doc: &D, id: &NodeId) -> Option<(String, NodeKind)> {
    if let Some((_, path)) = doc.list_references().into_iter().find(|(r, _)| r == id) {
        return Some((path, NodeKind::Reference));
    }

    let (_, type_name) = doc.nodes().into_iter().find(|(n, _)| n == id)?;
    let info = lookup_node_type(&type_name)?;
    let raw_path = read_raw_path(doc, id, info)?;
    Some((raw_path, info.kind))
}

fn entry_for_node<D: HostDocument + ?Sized>(
    doc: &D,
    id: NodeId,
    info: &NodeTypeInfo,
) -> Option<PathEntry> {
    let raw_path = read_raw_path(doc, &id, info)?;
    let flags = PatternFlags {
        udim: info.udim_flag.is_some_and(|flag| doc.get_flag(&id, flag)),
        sequence: info.sequence_flag.is_some_and(|flag| doc.get_flag(&id, flag)),
    };
    let is_valid = is_valid_path(&raw_path, info.kind, flags);

    Some(PathEntry {
        id,
        type_name: info.type_name.to_string(),
        attribute: info.attribute.to_string(),
        raw_path,
        kind: info.kind,
        flags,
        is_valid,
    })
}

fn read_raw_path<D: HostDocument + ?Sized>(
    doc: &D,
    id: &NodeId,
    info: &NodeTypeInfo,
) -> Option<String> {
    match info.kind {
        NodeKind::CacheFile => {
            let dir = doc.get_attribute(id, info.attribute).filter(|s| !s.is_empty())?;
            let name = doc
                .get_attribute(id, CACHE_NAME_ATTRIBUTE)
                .filter(|s| !s.is_empty())?;
            let descriptor = format!("{}.{}", name, CACHE_DESCRIPTOR_EXTENSION);
            Some(Path::new(&dir).join(descriptor).to_string_lossy().into_owned())
        }
        _ => doc.get_attribute(id, info.attribute).filter(|s| !s.is_empty()),
    }
}

/// Whether a path resolves on disk for the given kind.
///
/// Plain paths must exist as a file, or as a directory for directory
/// kinds. Token paths are valid when their parent directory holds at
/// least one entry matching the expanded pattern.
pub fn is_valid_path(raw_path: &str, kind: NodeKind, flags: PatternFlags) -> bool {
    let accept_directory = kind.accepts_directory();
    let classification = classify(raw_path, flags.udim, flags.sequence, accept_directory);
    let predicate = NamePredicate::compile(&classification.desired_name, classification.pattern);

    if !predicate.is_pattern() {
        let path = Path::new(raw_path);
        return if accept_directory {
            path.is_dir()
        } else {
            path.is_file()
        };
    }

    let Some(parent) = Path::new(raw_path).parent() else {
        return false;
    };
    let Ok(entries) = std::fs::read_dir(parent) else {
        return false;
    };

    entries.flatten().any(|entry| {
        entry.path().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| predicate.matches(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Manifest, ManifestDocument};
    use tempfile::TempDir;

    #[test]
    fn test_plain_file_validity() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.png");
        std::fs::write(&file, b"png").unwrap();

        let path = file.to_string_lossy();
        assert!(is_valid_path(&path, NodeKind::PlainFile, PatternFlags::default()));
        assert!(!is_valid_path(
            &temp.path().join("b.png").to_string_lossy(),
            NodeKind::PlainFile,
            PatternFlags::default()
        ));
    }

    #[test]
    fn test_directory_validity_depends_on_kind() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_string_lossy();
        assert!(is_valid_path(&dir, NodeKind::PlainDirectory, PatternFlags::default()));
        assert!(!is_valid_path(&dir, NodeKind::PlainFile, PatternFlags::default()));
    }

    #[test]
    fn test_udim_validity() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("tex.1001.png"), b"png").unwrap();
        let path = temp.path().join("tex.<UDIM>.png");
        let flags = PatternFlags {
            udim: true,
            sequence: false,
        };

        assert!(is_valid_path(&path.to_string_lossy(), NodeKind::PlainFile, flags));
        // Without the flag the token is a literal name that does not exist
        assert!(!is_valid_path(
            &path.to_string_lossy(),
            NodeKind::PlainFile,
            PatternFlags::default()
        ));
    }

    #[test]
    fn test_catalog_skips_unknown_and_empty_nodes() {
        let mut manifest = Manifest::default();
        manifest.add_node("persp", "camera");
        manifest
            .add_node("file1", "file")
            .set_attribute("fileTextureName", "/missing/a.png");
        manifest.add_node("file2", "file");
        let doc = ManifestDocument::new(manifest);

        let entries = build_catalog(&doc);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_str(), "file1");
        assert_eq!(entries[0].attribute, "fileTextureName");
        assert!(!entries[0].is_valid);
    }

    #[test]
    fn test_catalog_reads_pattern_flags() {
        let mut manifest = Manifest::default();
        manifest
            .add_node("file1", "file")
            .set_attribute("fileTextureName", "/missing/tex.<UDIM>.png")
            .set_flag("uvTilingMode", true);
        manifest
            .add_node("plane1", "imagePlane")
            .set_attribute("imageName", "/missing/bg.<f>.jpg")
            .set_flag("useFrameExtension", true);
        let doc = ManifestDocument::new(manifest);

        let entries = build_catalog(&doc);
        assert!(entries[0].flags.udim);
        assert!(!entries[0].flags.sequence);
        assert!(entries[1].flags.sequence);
    }

    #[test]
    fn test_catalog_joins_cache_attributes() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("fluid.xml"), b"<xml/>").unwrap();

        let mut manifest = Manifest::default();
        manifest
            .add_node("cache1", "cacheFile")
            .set_attribute("cachePath", &temp.path().to_string_lossy())
            .set_attribute("cacheName", "fluid");
        let doc = ManifestDocument::new(manifest);

        let entries = build_catalog(&doc);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, NodeKind::CacheFile);
        assert_eq!(
            entries[0].raw_path,
            temp.path().join("fluid.xml").to_string_lossy()
        );
        assert!(entries[0].is_valid);
    }

    #[test]
    fn test_catalog_lists_references_last() {
        let mut manifest = Manifest::default();
        manifest.add_reference("charRN", "/missing/char.ma");
        manifest
            .add_node("file1", "file")
            .set_attribute("fileTextureName", "/missing/a.png");
        let doc = ManifestDocument::new(manifest);

        let entries = build_catalog(&doc);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].kind, NodeKind::Reference);
        assert_eq!(entries[1].raw_path, "/missing/char.ma");
        assert!(entries[1].attribute.is_empty());
    }

    #[test]
    fn test_read_entry() {
        let mut manifest = Manifest::default();
        manifest
            .add_node("snd", "audio")
            .set_attribute("filename", "/a/b.wav");
        manifest.add_reference("setRN", "/a/set.ma");
        let doc = ManifestDocument::new(manifest);

        assert_eq!(
            read_entry(&doc, &NodeId::new("snd")),
            Some(("/a/b.wav".to_string(), NodeKind::PlainFile))
        );
        assert_eq!(
            read_entry(&doc, &NodeId::new("setRN")),
            Some(("/a/set.ma".to_string(), NodeKind::Reference))
        );
        assert_eq!(read_entry(&doc, &NodeId::new("nope")), None);
    }
}
