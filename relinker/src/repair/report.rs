//! Pass outcome reporting.

use std::fmt;

use crate::node::{NodeId, NodeKind};
use crate::search::SearchStats;

/// What happened to one broken entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A match was found and written back.
    Repaired { new_path: String },
    /// A match was found but nothing was written (dry run).
    WouldRepair { new_path: String },
    /// The full walk found no match.
    NotFound,
    /// A match was found but write-back was rejected.
    WriteFailed(String),
    /// The search itself failed for this entry.
    Failed(String),
    /// The pass was cancelled before this entry was searched.
    Skipped,
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOutcome::Repaired { new_path } => write!(f, "repaired -> {}", new_path),
            EntryOutcome::WouldRepair { new_path } => write!(f, "would repair -> {}", new_path),
            EntryOutcome::NotFound => write!(f, "not found"),
            EntryOutcome::WriteFailed(reason) => write!(f, "write failed: {}", reason),
            EntryOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            EntryOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome for one processed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Node the entry belongs to.
    pub id: NodeId,
    /// Kind of the node.
    pub kind: NodeKind,
    /// Path before the pass.
    pub old_path: String,
    /// What happened.
    pub outcome: EntryOutcome,
}

/// Aggregate result of a repair pass.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    /// Entries considered by the pass.
    pub total: usize,
    /// Entries that were already valid and left alone.
    pub already_valid: usize,
    /// Entries repaired (or that would be, in a dry run).
    pub repaired: usize,
    /// Entries with no match under the search root.
    pub unresolved: usize,
    /// Entries whose search or write-back failed.
    pub failed: usize,
    /// Entries not searched because the pass was cancelled.
    pub skipped: usize,
    /// Whether the pass was cancelled.
    pub cancelled: bool,
    /// Search engine counters.
    pub stats: SearchStats,
    /// Per-entry outcomes, in processing order. Valid entries are omitted.
    pub outcomes: Vec<EntryReport>,
}

impl RepairReport {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, id: NodeId, kind: NodeKind, old_path: String, outcome: EntryOutcome) {
        match &outcome {
            EntryOutcome::Repaired { .. } | EntryOutcome::WouldRepair { .. } => self.repaired += 1,
            EntryOutcome::NotFound => self.unresolved += 1,
            EntryOutcome::WriteFailed(_) | EntryOutcome::Failed(_) => self.failed += 1,
            EntryOutcome::Skipped => self.skipped += 1,
        }
        self.outcomes.push(EntryReport {
            id,
            kind,
            old_path,
            outcome,
        });
    }

    /// Entries still broken after the pass.
    pub fn still_broken(&self) -> usize {
        self.unresolved + self.failed + self.skipped
    }
}

/// One substitution made by search-and-replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceChange {
    /// Node that was changed.
    pub id: NodeId,
    /// Path before substitution.
    pub old_path: String,
    /// Path after substitution.
    pub new_path: String,
}

/// Aggregate result of a search-and-replace pass.
#[derive(Debug, Clone, Default)]
pub struct ReplaceReport {
    /// Substitutions written back.
    pub changed: Vec<ReplaceChange>,
    /// Entries that did not contain the search text.
    pub unchanged: usize,
    /// Substitutions rejected by write-back, with the reason.
    pub failed: Vec<(ReplaceChange, String)>,
}

impl ReplaceReport {
    /// Whether the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && self.failed.is_empty()
    }
}
