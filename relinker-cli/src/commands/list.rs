//! `relinker list` - show every path-bearing node and its status.

use std::path::PathBuf;

use clap::Args;
use console::style;
use relinker::repair::RepairPass;

use super::common::{load_manifest, to_node_kinds, KindArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `relinker list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Scene manifest to inspect
    pub manifest: PathBuf,

    /// Only show entries whose path does not resolve
    #[arg(long)]
    pub broken: bool,

    /// Only show these kinds (repeatable)
    #[arg(long, value_enum)]
    pub kind: Vec<KindArg>,
}

/// Run the list command.
pub fn run(args: ListArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("list");

    let doc = load_manifest(&args.manifest)?;
    let kinds = to_node_kinds(&args.kind);

    let entries: Vec<_> = RepairPass::refresh(&doc)
        .into_iter()
        .filter(|e| kinds.is_empty() || kinds.contains(&e.kind))
        .collect();
    let broken = entries.iter().filter(|e| !e.is_valid).count();

    for entry in entries.iter().filter(|e| !args.broken || !e.is_valid) {
        let status = if entry.is_valid {
            style("ok    ").green()
        } else {
            style("broken").red().bold()
        };
        println!(
            "{} {:<10} {:<24} {}",
            status,
            entry.kind.name(),
            entry.id.as_str(),
            style(&entry.raw_path).dim()
        );
    }

    println!();
    println!(
        "{} entries, {} broken",
        style(entries.len()).cyan(),
        if broken == 0 {
            style(broken).green()
        } else {
            style(broken).red()
        }
    );

    Ok(())
}
