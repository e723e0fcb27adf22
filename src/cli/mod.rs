//! Command-line interface for Wayfinder.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "wayfinder",
    version,
    about = "Agentic file search over a OneDrive-style drive tree"
)]
pub struct Cli {
    /// Emit machine-readable JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Load configuration from a specific file instead of .wayfinder/
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the drive for the file a query describes
    Search(commands::search::SearchArgs),
    /// List the children of a folder, or run a server-side name search
    Ls(commands::ls::LsArgs),
    /// Resolve a slash-delimited path to its item id
    Resolve(commands::resolve::ResolveArgs),
}

/// Print a terminal error in the requested format and exit non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
}
