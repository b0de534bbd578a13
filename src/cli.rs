//! Command-line interface definitions for hashdupe.
//!
//! # Example
//!
//! ```bash
//! # Find files with identical content under a folder
//! hashdupe scan ~/Pictures --csv pictures.csv
//!
//! # Skip VCS metadata and build output (patterns are regexes)
//! hashdupe scan ~/src -e '\.git' -e 'target/'
//!
//! # What exists only in the backup, or only in the live copy?
//! hashdupe compare /mnt/backup ~/Documents --csv backup.csv --comparison-csv live.csv
//!
//! # Machine-readable report
//! hashdupe -q compare /mnt/backup ~/Documents --json
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Content-hash duplicate finder and tree comparer.
///
/// Walks directory trees, fingerprints every file with SHA-256 and reports
/// files with identical content, or the contents present in only one of two
/// trees.
#[derive(Debug, Parser)]
#[command(name = "hashdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (default: platform config dir/config.toml)
    #[arg(long, value_name = "FILE", global = true, env = "HASHDUPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not show the progress spinner
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the selected subcommand reports as JSON.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Commands::Scan(args) => args.json,
            Commands::Compare(args) => args.json,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find files with identical content under one directory
    Scan(ScanArgs),
    /// Report contents present in only one of two directories
    Compare(CompareArgs),
}

/// Walk options shared by both subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct WalkArgs {
    /// Exclude paths containing a match for this regex (repeatable)
    ///
    /// Matched against the path below the scan root, with `/` separators.
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    pub exclusions: Vec<String>,

    /// Number of walker threads (default from config, otherwise 4)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Skip everything below an excluded directory
    ///
    /// Without this flag only the excluded directory's own entry is dropped
    /// and its contents are still walked and matched one by one.
    #[arg(long)]
    pub prune_excluded: bool,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub walk: WalkArgs,

    /// Write every entry to this CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Print a JSON report on stdout instead of the text summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the compare subcommand.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Reference directory (entries only here are tagged `=>`)
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Comparison directory (entries only here are tagged `<=`)
    #[arg(value_name = "COMPARISON")]
    pub comparison: PathBuf,

    #[command(flatten)]
    pub walk: WalkArgs,

    /// Write the annotated reference tree to this CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Write the annotated comparison tree to this CSV file
    #[arg(long, value_name = "FILE")]
    pub comparison_csv: Option<PathBuf>,

    /// Limit CSV exports to entries present on one side only
    #[arg(long)]
    pub tagged_only: bool,

    /// Print a JSON report on stdout instead of the text summary
    #[arg(long)]
    pub json: bool,
}
