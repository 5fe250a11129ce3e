//! `relinker repair` - search for missing files and relink them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use relinker::repair::{EntryOutcome, RepairOptions, RepairPass, RepairReport};
use relinker::search::{CallbackObserver, CancellationFlag, SearchConfig};

use super::common::{
    load_manifest, resolve_search_root, save_manifest, to_node_kinds, KindArg, StrategyArg,
};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `relinker repair`.
#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Scene manifest to repair
    pub manifest: PathBuf,

    /// Directory tree to search (default: search.default_root)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Visit directory entries in sorted order for reproducible matches
    #[arg(long)]
    pub sorted: bool,

    /// How remembered directories are consulted
    #[arg(long, value_enum)]
    pub cache_strategy: Option<StrategyArg>,

    /// Maximum directory depth below the root
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Do not descend into hidden directories
    #[arg(long)]
    pub skip_hidden: bool,

    /// Only repair these kinds (repeatable)
    #[arg(long, value_enum)]
    pub kind: Vec<KindArg>,

    /// Report matches without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write the result here instead of overwriting the manifest
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the repair command.
pub fn run(args: RepairArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("repair");
    let config = runner.config();

    let root = resolve_search_root(args.root.clone(), config)?;
    let mut search = SearchConfig::from_config_file(config, root);
    if args.sorted {
        search = search.with_sorted_entries(true);
    }
    if let Some(strategy) = args.cache_strategy {
        search = search.with_cache_strategy(strategy.into());
    }
    if args.max_depth.is_some() {
        search = search.with_max_depth(args.max_depth);
    }
    if args.skip_hidden {
        search = search.with_skip_hidden(true);
    }

    let options = RepairOptions::new(search)
        .with_kinds(to_node_kinds(&args.kind))
        .with_dry_run(args.dry_run);
    let pass = RepairPass::new(options);

    let mut doc = load_manifest(&args.manifest)?;

    let cancel = CancellationFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || handler_flag.cancel())
        .map_err(|e| CliError::Signal(e.to_string()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!(
        "Searching {}",
        pass.options().search.search_root.display()
    ));

    let progress = spinner.clone();
    let mut directories = 0usize;
    let mut observer = CallbackObserver::new(cancel).with_callback(move |dir, _| {
        directories += 1;
        progress.set_message(format!("{} directories | {}", directories, dir.display()));
    });

    let result = pass.run(&mut doc, &mut observer);
    spinner.finish_and_clear();
    let report = result?;

    print_outcomes(&report);

    if report.repaired > 0 && !args.dry_run {
        save_manifest(&doc, args.output.as_deref())?;
    }

    print_summary(&report, args.dry_run);

    Ok(())
}

fn print_outcomes(report: &RepairReport) {
    for entry in &report.outcomes {
        let label = match &entry.outcome {
            EntryOutcome::Repaired { .. } => style("repaired").green(),
            EntryOutcome::WouldRepair { .. } => style("match   ").cyan(),
            EntryOutcome::NotFound => style("missing ").yellow(),
            EntryOutcome::WriteFailed(_) | EntryOutcome::Failed(_) => style("failed  ").red().bold(),
            EntryOutcome::Skipped => style("skipped ").dim(),
        };
        println!(
            "{} {:<10} {} {}",
            label,
            entry.kind.name(),
            entry.id,
            style(&entry.outcome).dim()
        );
    }
}

fn print_summary(report: &RepairReport, dry_run: bool) {
    println!();
    if report.cancelled {
        println!("{}", style("Search cancelled; remaining entries were skipped.").yellow());
    }
    println!("{}", style("Summary").bold().underlined());
    println!("  {:<14} {}", "Entries:", report.total);
    println!("  {:<14} {}", "Already valid:", report.already_valid);
    println!(
        "  {:<14} {}",
        if dry_run { "Would repair:" } else { "Repaired:" },
        style(report.repaired).green()
    );
    println!("  {:<14} {}", "Not found:", style(report.unresolved).yellow());
    println!("  {:<14} {}", "Failed:", style(report.failed).red());
    println!("  {:<14} {}", "Skipped:", report.skipped);
    println!(
        "  {:<14} {} cache hits, {} walks, {} directories",
        "Search:",
        report.stats.cache_hits,
        report.stats.full_walks,
        report.stats.directories_visited
    );
    if dry_run {
        println!();
        println!("Dry run: manifest not modified.");
    }
}
