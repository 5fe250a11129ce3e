//! Search requests built from path entries.

use std::path::PathBuf;

use crate::node::{NodeKind, PathEntry};
use crate::pattern::{classify, NamePredicate, PatternKind};

/// What to look for and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Leaf name to find, tokens included.
    pub desired_name: String,
    /// Pattern carried by the name. Only set when the token is present.
    pub pattern: PatternKind,
    /// Whether a directory may satisfy the search.
    pub accept_directory: bool,
    /// Directory tree to search.
    pub search_root: PathBuf,
}

impl SearchRequest {
    /// Build a request for a plain file name.
    pub fn exact(desired_name: impl Into<String>, search_root: impl Into<PathBuf>) -> Self {
        Self {
            desired_name: desired_name.into(),
            pattern: PatternKind::None,
            accept_directory: false,
            search_root: search_root.into(),
        }
    }

    /// Classify a path entry into a request.
    pub fn for_entry(entry: &PathEntry, search_root: impl Into<PathBuf>) -> Self {
        let classification = classify(
            &entry.raw_path,
            entry.flags.udim,
            entry.flags.sequence,
            entry.kind == NodeKind::PlainDirectory,
        );
        Self {
            desired_name: classification.desired_name,
            pattern: classification.pattern,
            accept_directory: classification.accept_directory,
            search_root: search_root.into(),
        }
    }

    /// Compile the predicate for this request.
    pub fn predicate(&self) -> NamePredicate {
        NamePredicate::compile(&self.desired_name, self.pattern)
    }
}
