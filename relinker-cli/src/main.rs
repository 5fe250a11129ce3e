//! Relinker CLI - find and repair broken file references.
//!
//! Thin command-line surface over the `relinker` library. Documents are
//! read from and written back to JSON scene manifests.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use console::style;

use commands::config::ConfigCommands;
use commands::list::ListArgs;
use commands::repair::RepairArgs;
use commands::replace::ReplaceArgs;

/// Find and repair broken file references in scene manifests.
#[derive(Debug, Parser)]
#[command(name = "relinker", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overrides the configured level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every path-bearing node and whether it resolves
    List(ListArgs),

    /// Search a directory tree for missing files and relink them
    Repair(RepairArgs),

    /// Substitute text in every path and write the result back
    Replace(ReplaceArgs),

    /// View or change configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List(args) => commands::list::run(args, cli.verbose),
        Commands::Repair(args) => commands::repair::run(args, cli.verbose),
        Commands::Replace(args) => commands::replace::run(args, cli.verbose),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(e.exit_code());
    }
}
