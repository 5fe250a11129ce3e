//! `relinker replace` - literal substitution across every path.

use std::path::PathBuf;

use clap::Args;
use console::style;
use relinker::repair::search_replace;

use super::common::{load_manifest, save_manifest, to_node_kinds, KindArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `relinker replace`.
#[derive(Debug, Args)]
pub struct ReplaceArgs {
    /// Scene manifest to edit
    pub manifest: PathBuf,

    /// Text to search for (must not be empty)
    pub find: String,

    /// Replacement text
    pub replace: String,

    /// Only touch these kinds (repeatable)
    #[arg(long, value_enum)]
    pub kind: Vec<KindArg>,

    /// Write the result here instead of overwriting the manifest
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the replace command.
pub fn run(args: ReplaceArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("replace");

    let mut doc = load_manifest(&args.manifest)?;
    let kinds = to_node_kinds(&args.kind);
    let only_kinds = (!kinds.is_empty()).then_some(kinds.as_slice());

    let report = search_replace(&mut doc, &args.find, &args.replace, only_kinds)?;

    for change in &report.changed {
        println!(
            "{} {}: {} -> {}",
            style("changed").green(),
            change.id,
            style(&change.old_path).dim(),
            change.new_path
        );
    }
    for (change, reason) in &report.failed {
        println!(
            "{} {}: {} ({})",
            style("failed ").red().bold(),
            change.id,
            change.new_path,
            reason
        );
    }

    if report.is_noop() {
        println!("No paths contain '{}'; nothing to do.", args.find);
        return Ok(());
    }

    if !report.changed.is_empty() {
        save_manifest(&doc, args.output.as_deref())?;
    }

    println!();
    println!(
        "{} changed, {} failed, {} unchanged",
        style(report.changed.len()).green(),
        style(report.failed.len()).red(),
        report.unchanged
    );

    Ok(())
}
