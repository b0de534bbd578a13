//! Application driver behind the `hashdupe` binary.
//!
//! [`run_app`] turns parsed CLI arguments into walks, duplicate reports and
//! comparisons. It never exits the process; `main` maps the returned
//! [`ExitCode`] (or error) to the process status.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use bytesize::ByteSize;
use chrono::{DateTime, Local, Utc};

use crate::cli::{Cli, Commands, CompareArgs, ScanArgs, WalkArgs};
use crate::compare::{compare_snapshots, ComparisonSummary};
use crate::config::Config;
use crate::duplicates::{find_duplicates, sort_by_wasted_space, DuplicateStats};
use crate::error::ExitCode;
use crate::logging::init_logging;
use crate::output::json::{write_json, JsonCompareOutput, JsonOutput, JsonRunInfo};
use crate::output::CsvOutput;
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::{ExclusionFilter, LocalTree, ScanResult, WalkOptions, Walker};
use crate::signal::install_handler;

/// State shared by every walk of one run.
struct RunContext {
    config: Config,
    shutdown_flag: Arc<AtomicBool>,
    progress: Option<Arc<dyn ProgressCallback>>,
    quiet: bool,
    started_at: DateTime<Utc>,
    start: Instant,
}

impl RunContext {
    fn run_info(&self, interrupted: bool, exit_code: ExitCode) -> JsonRunInfo {
        JsonRunInfo::new(self.started_at, self.start.elapsed(), interrupted, exit_code)
    }

    fn finish(&self) {
        log::info!("Elapsed time: {:.2?}", self.start.elapsed());
    }
}

/// Run the command selected on the command line.
///
/// # Errors
///
/// Returns an error for fatal conditions: an unreadable configuration file,
/// a root that is not a readable directory, an invalid exclusion pattern,
/// or a report that cannot be written. Problems with individual files are
/// reported through [`ExitCode::PartialSuccess`] instead.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref())?;
    if log::log_enabled!(log::Level::Debug) {
        match config.to_toml() {
            Ok(toml) => log::debug!("Effective configuration:\n{}", toml.trim_end()),
            Err(e) => log::debug!("Effective configuration: {:?} ({})", config, e),
        }
    }

    let handler = install_handler().context("Failed to install Ctrl+C handler")?;

    let show_progress = config.progress && !cli.no_progress && !cli.quiet;
    let started_at = Utc::now();
    log::info!(
        "Start time: {}",
        started_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z")
    );

    let ctx = RunContext {
        config,
        shutdown_flag: handler.get_flag(),
        progress: show_progress
            .then(|| Arc::new(Progress::new(false)) as Arc<dyn ProgressCallback>),
        quiet: cli.quiet,
        started_at,
        start: Instant::now(),
    };

    let code = match cli.command {
        Commands::Scan(args) => run_scan(&ctx, &args),
        Commands::Compare(args) => run_compare(&ctx, &args),
    }?;

    ctx.finish();
    Ok(code)
}

/// Load configuration; an explicitly named file must exist.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            Config::load_from_path(path)
                .with_context(|| format!("Invalid configuration file {}", path.display()))
        }
        None => Config::load().context("Invalid configuration"),
    }
}

/// Combine configuration and CLI walk flags. CLI patterns follow the
/// configured ones.
fn walk_options(config: &Config, args: &WalkArgs) -> Result<WalkOptions> {
    let patterns = config.exclusions.iter().chain(args.exclusions.iter());
    let exclusions = ExclusionFilter::new(patterns)?;

    Ok(WalkOptions {
        exclusions,
        prune_excluded: args.prune_excluded || config.prune_excluded,
        threads: args.threads.map_or(config.io_threads, usize::from),
    })
}

/// A root that passed the setup checks, ready to walk.
struct PreparedTree<'a> {
    root: &'a Path,
    label: &'static str,
    walker: Walker<LocalTree>,
}

/// Resolve options and open the root. Fails before any traversal.
fn prepare_tree<'a>(
    ctx: &RunContext,
    root: &'a Path,
    args: &WalkArgs,
    label: &'static str,
) -> Result<PreparedTree<'a>> {
    let options = walk_options(&ctx.config, args)?;
    let tree = LocalTree::new(root)
        .with_context(|| format!("Cannot walk {} folder '{}'", label, root.display()))?;

    if !options.exclusions.is_empty() {
        log::debug!(
            "Excluding paths matching: {}",
            options.exclusions.patterns().collect::<Vec<_>>().join(", ")
        );
    }

    let mut walker = Walker::new(tree, options).with_shutdown_flag(Arc::clone(&ctx.shutdown_flag));
    if let Some(ref progress) = ctx.progress {
        walker = walker.with_progress_callback(Arc::clone(progress));
    }
    Ok(PreparedTree {
        root,
        label,
        walker,
    })
}

/// Walk one prepared root, logging the per-folder summary.
fn walk_tree(ctx: &RunContext, prepared: PreparedTree<'_>) -> ScanResult {
    let PreparedTree {
        root,
        label,
        walker,
    } = prepared;

    log::info!(
        "Gathering directory and file data from {} folder '{}'...",
        label,
        root.display()
    );
    if let Some(ref progress) = ctx.progress {
        progress.on_message(label);
    }
    let result = walker.walk();

    log::info!(
        "Number of directories found in '{}': {}",
        root.display(),
        result.directory_count()
    );
    log::info!(
        "Number of files found in '{}':       {} ({})",
        root.display(),
        result.file_count(),
        ByteSize::b(result.total_size())
    );
    if result.has_errors() {
        log::warn!(
            "{} entries under '{}' could not be read",
            result.errors.len(),
            root.display()
        );
    }
    if result.interrupted {
        log::warn!("Walk of '{}' was interrupted; results are partial", root.display());
    }

    result
}

/// Tag both results unless either walk was cut short. A partial walk
/// cannot prove that a content is missing from the other side.
fn annotate_if_complete(
    reference: &mut ScanResult,
    comparison: &mut ScanResult,
) -> Option<ComparisonSummary> {
    if reference.interrupted || comparison.interrupted {
        log::warn!("Comparison skipped because a walk was interrupted; no entries are tagged");
        return None;
    }

    let (_, summary) = compare_snapshots(reference, comparison);
    log::info!(
        "{} contents only in reference, {} only in comparison, {} shared",
        summary.reference_only,
        summary.comparison_only,
        summary.shared
    );
    Some(summary)
}

fn write_csv(result: &ScanResult, path: &Path, tagged_only: bool) -> Result<()> {
    log::info!("Writing data to CSV file '{}'", path.display());
    let output = if tagged_only {
        CsvOutput::tagged_only(result)
    } else {
        CsvOutput::from_result(result)
    };
    output
        .write_file(path)
        .with_context(|| format!("Failed to write CSV file {}", path.display()))
}

fn run_scan(ctx: &RunContext, args: &ScanArgs) -> Result<ExitCode> {
    let result = walk_tree(ctx, prepare_tree(ctx, &args.path, &args.walk, "scan")?);

    let mut groups = find_duplicates(&result.files);
    sort_by_wasted_space(&mut groups);
    let stats = DuplicateStats::from_files(&result.files);

    let code = if result.interrupted {
        ExitCode::Interrupted
    } else if result.has_errors() {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    if let Some(ref csv) = args.csv {
        write_csv(&result, csv, false)?;
    }

    if args.json {
        let report = JsonOutput::new(
            &args.path,
            &result,
            &groups,
            ctx.run_info(result.interrupted, code),
        );
        write_json(&report, &mut io::stdout().lock(), true)
            .context("Failed to write JSON report")?;
    } else if !ctx.quiet {
        let mut out = io::stdout().lock();
        for group in &groups {
            writeln!(
                out,
                "{} ({} x {})",
                group.fingerprint,
                group.len(),
                ByteSize::b(group.size())
            )?;
            let mut paths: Vec<&PathBuf> = group.files.iter().map(|e| &e.relative_path).collect();
            paths.sort();
            for path in paths {
                writeln!(out, "  {}", path.display())?;
            }
        }
        writeln!(
            out,
            "\nTotal number of duplicate SHA256 hashes: {} ({} redundant files, {} reclaimable, {:.1}% of scanned bytes)",
            stats.duplicate_groups,
            stats.duplicate_files,
            ByteSize::b(stats.reclaimable_space),
            stats.wasted_percentage()
        )?;
    }

    Ok(code)
}

fn run_compare(ctx: &RunContext, args: &CompareArgs) -> Result<ExitCode> {
    let reference_tree = prepare_tree(ctx, &args.reference, &args.walk, "reference")?;
    let comparison_tree = prepare_tree(ctx, &args.comparison, &args.walk, "comparison")?;

    let mut reference = walk_tree(ctx, reference_tree);
    let mut comparison = if reference.interrupted {
        ScanResult {
            interrupted: true,
            ..Default::default()
        }
    } else {
        walk_tree(ctx, comparison_tree)
    };

    let summary = annotate_if_complete(&mut reference, &mut comparison);

    let interrupted = reference.interrupted || comparison.interrupted;
    let code = if interrupted {
        ExitCode::Interrupted
    } else if reference.has_errors() || comparison.has_errors() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    };

    if let Some(ref csv) = args.csv {
        write_csv(&reference, csv, args.tagged_only)?;
    }
    if let Some(ref csv) = args.comparison_csv {
        write_csv(&comparison, csv, args.tagged_only)?;
    }

    if args.json {
        let report = JsonCompareOutput::new(
            (&args.reference, &reference),
            (&args.comparison, &comparison),
            &summary.unwrap_or_default(),
            ctx.run_info(interrupted, code),
        );
        write_json(&report, &mut io::stdout().lock(), true)
            .context("Failed to write JSON report")?;
    } else if !ctx.quiet {
        let mut out = io::stdout().lock();
        for (result, tag) in [(&reference, "=>"), (&comparison, "<=")] {
            let mut tagged: Vec<&PathBuf> = result
                .entries()
                .filter(|e| e.provenance().is_tagged())
                .map(|e| &e.relative_path)
                .collect();
            tagged.sort();
            for path in tagged {
                writeln!(out, "{} {}", tag, path.display())?;
            }
        }
        match summary {
            None => writeln!(out, "Walk interrupted; folders were not compared")?,
            Some(summary) if summary.is_identical() => {
                writeln!(out, "Both folders hold the same contents")?
            }
            Some(summary) => writeln!(
                out,
                "\n{} contents only in '{}', {} only in '{}'",
                summary.reference_only,
                args.reference.display(),
                summary.comparison_only,
                args.comparison.display()
            )?,
        }
    }

    Ok(code)
}
