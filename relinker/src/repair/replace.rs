//! Literal search-and-replace over every path entry.

use tracing::{info, warn};

use super::error::{RepairError, RepairResult};
use super::report::{ReplaceChange, ReplaceReport};
use super::{includes_kind, RepairPass};
use crate::document::{build_catalog, HostDocument};
use crate::node::NodeKind;
use crate::writeback::WriteBackApplier;

impl RepairPass {
    /// Substitute `find` with `replace` in every entry's raw path and write
    /// the result back directly.
    ///
    /// No search, cache, or pattern logic is involved. Entries that do not
    /// contain `find` are left alone, so repeating a pass is a no-op once
    /// the text no longer occurs.
    pub fn search_replace<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        find: &str,
        replace: &str,
    ) -> RepairResult<ReplaceReport> {
        search_replace(doc, find, replace, self.options.only_kinds.as_deref())
    }
}

/// Search-and-replace without a configured pass.
pub fn search_replace<D: HostDocument + ?Sized>(
    doc: &mut D,
    find: &str,
    replace: &str,
    only_kinds: Option<&[NodeKind]>,
) -> RepairResult<ReplaceReport> {
    if find.is_empty() {
        return Err(RepairError::EmptyPattern);
    }

    let applier = WriteBackApplier::new();
    let mut report = ReplaceReport::default();

    for entry in build_catalog(doc) {
        if !includes_kind(only_kinds, entry.kind) || !entry.raw_path.contains(find) {
            report.unchanged += 1;
            continue;
        }

        let new_path = entry.raw_path.replace(find, replace);
        if new_path == entry.raw_path {
            report.unchanged += 1;
            continue;
        }

        let change = ReplaceChange {
            id: entry.id.clone(),
            old_path: entry.raw_path.clone(),
            new_path,
        };

        match applier.apply_entry(doc, &entry, &change.new_path) {
            Ok(()) => report.changed.push(change),
            Err(e) => {
                warn!(node = %entry.id, path = %change.new_path, error = %e, "Replace write-back failed");
                report.failed.push((change, e.to_string()));
            }
        }
    }

    info!(
        changed = report.changed.len(),
        unchanged = report.unchanged,
        failed = report.failed.len(),
        "Search and replace finished"
    );

    Ok(report)
}
