//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use relinker::config::ConfigFile;
use relinker::document::ManifestDocument;
use relinker::node::NodeKind;
use relinker::search::CacheStrategy;

use crate::error::CliError;

/// Node kind selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    /// Plain file attributes (textures, caches, proxies)
    File,
    /// Directory-valued attributes
    Directory,
    /// Cache nodes with an XML descriptor
    Cache,
    /// Loaded references
    Reference,
}

impl From<KindArg> for NodeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::File => NodeKind::PlainFile,
            KindArg::Directory => NodeKind::PlainDirectory,
            KindArg::Cache => NodeKind::CacheFile,
            KindArg::Reference => NodeKind::Reference,
        }
    }
}

/// Cache strategy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StrategyArg {
    /// Probe cached directories for the exact file name
    Exact,
    /// List cached directories and apply the name pattern
    Predicate,
}

impl From<StrategyArg> for CacheStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Exact => CacheStrategy::ExactName,
            StrategyArg::Predicate => CacheStrategy::Predicate,
        }
    }
}

/// Convert repeated `--kind` flags. No flags means every kind.
pub fn to_node_kinds(kinds: &[KindArg]) -> Vec<NodeKind> {
    kinds.iter().copied().map(NodeKind::from).collect()
}

/// Resolve the search root from CLI args and config.
pub fn resolve_search_root(
    cli_root: Option<PathBuf>,
    config: &ConfigFile,
) -> Result<PathBuf, CliError> {
    // CLI takes precedence, then config
    cli_root
        .or_else(|| config.search.default_root.clone())
        .ok_or_else(|| {
            CliError::Config(
                "No search root given. Use --root or set search.default_root \
                 with 'relinker config set'"
                    .to_string(),
            )
        })
}

/// Load a manifest, logging where it came from.
pub fn load_manifest(path: &Path) -> Result<ManifestDocument, CliError> {
    let doc = ManifestDocument::load(path)?;
    tracing::debug!(path = %path.display(), "Loaded manifest");
    Ok(doc)
}

/// Save a manifest in place, or to `output` when given.
pub fn save_manifest(doc: &ManifestDocument, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => doc.save_to(path)?,
        None => doc.save()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_arg_conversion() {
        let kinds = to_node_kinds(&[KindArg::Cache, KindArg::Reference]);
        assert_eq!(kinds, vec![NodeKind::CacheFile, NodeKind::Reference]);
        assert!(to_node_kinds(&[]).is_empty());
    }

    #[test]
    fn test_cli_root_takes_precedence() {
        let mut config = ConfigFile::default();
        config.search.default_root = Some(PathBuf::from("/from/config"));

        let root = resolve_search_root(Some(PathBuf::from("/from/cli")), &config).unwrap();
        assert_eq!(root, PathBuf::from("/from/cli"));

        let root = resolve_search_root(None, &config).unwrap();
        assert_eq!(root, PathBuf::from("/from/config"));
    }

    #[test]
    fn test_save_manifest_to_output() {
        use relinker::document::Manifest;

        let temp = tempfile::TempDir::new().unwrap();
        let output = temp.path().join("out.json");

        let mut manifest = Manifest::default();
        manifest
            .add_node("tex1", "file")
            .set_attribute("fileTextureName", "/old/wood.png");
        let doc = ManifestDocument::new(manifest);

        save_manifest(&doc, Some(&output)).unwrap();
        let reloaded = load_manifest(&output).unwrap();
        assert_eq!(reloaded.manifest().nodes.len(), 1);
    }

    #[test]
    fn test_save_without_path_fails() {
        let doc = ManifestDocument::new(Default::default());
        assert!(matches!(save_manifest(&doc, None), Err(CliError::Document(_))));
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let config = ConfigFile::default();
        let err = resolve_search_root(None, &config).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
