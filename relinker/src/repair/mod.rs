//! Repair, refresh, and search-and-replace passes.
//!
//! A repair pass rebuilds the catalog, skips entries that already resolve,
//! and for each broken entry (in catalog order) searches the configured
//! root and writes back the match. Later entries benefit from directories
//! found by earlier ones through the engine's location cache.
//!
//! Only an invalid search root aborts a pass. Everything else is recorded
//! per entry in the [`RepairReport`] and the pass moves on.

mod error;
mod replace;
mod report;

pub use error::{RepairError, RepairResult};
pub use replace::search_replace;
pub use report::{EntryOutcome, EntryReport, RepairReport, ReplaceChange, ReplaceReport};

use std::path::Path;

use tracing::{info, warn};

use crate::document::{build_catalog, HostDocument};
use crate::node::{NodeKind, PathEntry};
use crate::pattern::PatternKind;
use crate::search::{SearchConfig, SearchEngine, SearchError, SearchObserver, SearchRequest};
use crate::writeback::WriteBackApplier;

/// Options for a repair pass.
#[derive(Debug, Clone)]
pub struct RepairOptions {
    /// Search engine configuration, including the search root.
    pub search: SearchConfig,

    /// Restrict the pass to these kinds. `None` includes every kind.
    pub only_kinds: Option<Vec<NodeKind>>,

    /// Resolve but do not write back.
    pub dry_run: bool,
}

impl RepairOptions {
    /// Create options for the given search configuration.
    pub fn new(search: SearchConfig) -> Self {
        Self {
            search,
            only_kinds: None,
            dry_run: false,
        }
    }

    /// Restrict the pass to the given kinds. An empty list means all kinds.
    pub fn with_kinds(mut self, kinds: Vec<NodeKind>) -> Self {
        self.only_kinds = if kinds.is_empty() { None } else { Some(kinds) };
        self
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn includes(&self, kind: NodeKind) -> bool {
        includes_kind(self.only_kinds.as_deref(), kind)
    }
}

pub(crate) fn includes_kind(only: Option<&[NodeKind]>, kind: NodeKind) -> bool {
    only.map_or(true, |kinds| kinds.contains(&kind))
}

/// Drives repair passes over a host document.
#[derive(Debug, Clone)]
pub struct RepairPass {
    options: RepairOptions,
    applier: WriteBackApplier,
}

impl RepairPass {
    /// Create a pass with the given options.
    pub fn new(options: RepairOptions) -> Self {
        Self {
            options,
            applier: WriteBackApplier::new(),
        }
    }

    /// The pass options.
    pub fn options(&self) -> &RepairOptions {
        &self.options
    }

    /// Rebuild the catalog and return the current entries.
    pub fn refresh<D: HostDocument + ?Sized>(doc: &D) -> Vec<PathEntry> {
        build_catalog(doc)
    }

    /// Run a repair pass.
    ///
    /// # Errors
    ///
    /// Returns [`RepairError::InvalidSearchRoot`] before touching any entry
    /// if the search root is not an existing directory.
    pub fn run<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        observer: &mut dyn SearchObserver,
    ) -> RepairResult<RepairReport> {
        let root = self.options.search.search_root.clone();
        let mut engine = SearchEngine::new(self.options.search.clone());
        engine
            .validate_root()
            .map_err(|_| RepairError::InvalidSearchRoot(root.clone()))?;

        let entries: Vec<PathEntry> = build_catalog(doc)
            .into_iter()
            .filter(|e| self.options.includes(e.kind))
            .collect();

        info!(
            root = %root.display(),
            entries = entries.len(),
            dry_run = self.options.dry_run,
            "Starting repair pass"
        );

        let mut report = RepairReport::new(entries.len());

        for entry in entries {
            if entry.is_valid {
                report.already_valid += 1;
                continue;
            }
            if report.cancelled {
                report.record(entry.id, entry.kind, entry.raw_path, EntryOutcome::Skipped);
                continue;
            }

            let outcome = self.repair_entry(doc, &mut engine, &entry, &root, observer);
            if matches!(outcome, EntryOutcome::Skipped) {
                report.cancelled = true;
            }
            report.record(entry.id, entry.kind, entry.raw_path, outcome);
        }

        report.stats = engine.stats();

        info!(
            total = report.total,
            repaired = report.repaired,
            still_broken = report.still_broken(),
            cancelled = report.cancelled,
            full_walks = report.stats.full_walks,
            cache_hits = report.stats.cache_hits,
            "Repair pass finished"
        );

        Ok(report)
    }

    fn repair_entry<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        engine: &mut SearchEngine,
        entry: &PathEntry,
        root: &Path,
        observer: &mut dyn SearchObserver,
    ) -> EntryOutcome {
        let request = SearchRequest::for_entry(entry, root);

        let found = match engine.resolve(&request, observer) {
            Ok(Some(found)) => found,
            Ok(None) => {
                warn!(node = %entry.id, path = %entry.raw_path, "No match found");
                return EntryOutcome::NotFound;
            }
            Err(SearchError::Cancelled) => {
                info!(node = %entry.id, "Repair pass cancelled");
                return EntryOutcome::Skipped;
            }
            Err(e) => {
                warn!(node = %entry.id, error = %e, "Search failed");
                return EntryOutcome::Failed(e.to_string());
            }
        };

        let new_path = write_target(&request, &found);

        if self.options.dry_run {
            return EntryOutcome::WouldRepair { new_path };
        }

        match self.applier.apply_entry(doc, entry, &new_path) {
            Ok(()) => {
                info!(node = %entry.id, from = %entry.raw_path, to = %new_path, "Repaired path");
                EntryOutcome::Repaired { new_path }
            }
            Err(e) => {
                warn!(node = %entry.id, path = %new_path, error = %e, "Write-back failed");
                EntryOutcome::WriteFailed(e.to_string())
            }
        }
    }
}

/// Path written back for a resolved request.
///
/// Token patterns keep their token: the match only tells us which
/// directory holds the tile set or sequence.
fn write_target(request: &SearchRequest, found: &Path) -> String {
    let path = match (request.pattern, found.parent()) {
        (PatternKind::None, _) | (_, None) => found.to_path_buf(),
        (_, Some(dir)) => dir.join(&request.desired_name),
    };
    path.to_string_lossy().into_owned()
}
