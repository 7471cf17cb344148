//! abbrev CLI - depth-bounded abbreviation of Python sources
//!
//! Thin wrapper over the library: resolves configuration from flags and an
//! optional JSON file, runs the single-file or directory driver, prints the
//! statistics and optionally appends to the run journal.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use depth_abbreviator::{
    abbreviate_file, abbreviate_tree, AbbreviationConfig, Abbreviator, BatchReport, ConfigFile,
    FileReport, OutputLayout, RunJournal, RunRecord,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Abbreviate deeply nested Python blocks while keeping the file valid.
#[derive(Parser, Debug)]
#[command(name = "abbrev")]
#[command(version = depth_abbreviator::VERSION)]
#[command(about = "Abbreviate deeply nested Python blocks")]
#[command(after_help = "EXAMPLES:
  # Keep two levels, preview 90 characters per line
  abbrev service.py --preserve-chars 90

  # Abbreviate a whole package into a separate directory
  abbrev src/ --depth 1 --preserve-chars 60 --output-dir abbreviated/

  # Print to stdout with the traversal summary on stderr
  abbrev service.py --preserve-chars 60 --stdout --debug
")]
struct Cli {
    // ─── Input / output ─────────────────────────────────────────────────────

    /// Python file or directory to abbreviate
    #[arg(value_name = "PATH", help_heading = "Input / output")]
    path: PathBuf,

    /// Write outputs to DIR as <stem>_depth<D>_<timestamp>.py
    #[arg(long = "output-dir", value_name = "DIR", help_heading = "Input / output")]
    output_dir: Option<PathBuf>,

    /// Print the abbreviated code instead of writing a file (single file only)
    #[arg(long = "stdout", conflicts_with = "output_dir", help_heading = "Input / output")]
    stdout: bool,

    /// Print the report as JSON
    #[arg(long = "json", conflicts_with = "stdout", help_heading = "Input / output")]
    json: bool,

    // ─── Abbreviation ───────────────────────────────────────────────────────

    /// Deepest nesting level kept verbatim; negative abbreviates everything
    #[arg(short = 'd', long = "depth", allow_negative_numbers = true, help_heading = "Abbreviation")]
    depth: Option<i32>,

    /// Characters kept per preview line (required unless set in --config)
    #[arg(long = "preserve-chars", value_name = "N", help_heading = "Abbreviation")]
    preserve_chars: Option<usize>,

    /// Non-blank body lines kept as preview comments
    #[arg(long = "preserve-lines", value_name = "N", help_heading = "Abbreviation")]
    preserve_lines: Option<usize>,

    /// JSON file with default settings; flags override it
    #[arg(short = 'c', long = "config", value_name = "FILE", help_heading = "Abbreviation")]
    config: Option<PathBuf>,

    // ─── Diagnostics ────────────────────────────────────────────────────────

    /// Print a traversal summary
    #[arg(long = "debug", help_heading = "Diagnostics")]
    debug: bool,

    /// Append a record per file to this journal
    #[arg(long = "journal", value_name = "FILE", help_heading = "Diagnostics")]
    journal: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Diagnostics")]
    verbose: u8,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<AbbreviationConfig> {
        let base = match &self.config {
            Some(path) => ConfigFile::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ConfigFile::default(),
        };

        let overrides = ConfigFile {
            max_depth: self.depth,
            preserve_chars: self.preserve_chars,
            preserve_lines: self.preserve_lines,
            debug: self.debug.then_some(true),
        };

        base.resolve(overrides)
            .context("pass --preserve-chars or set preserve_chars in --config")
    }

    fn layout(&self) -> OutputLayout {
        match &self.output_dir {
            Some(dir) => OutputLayout::Directory(dir.clone()),
            None => OutputLayout::Sibling,
        }
    }
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let log_level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_file_report(report: &FileReport) {
    println!("Abbreviated code written to {}", report.output_path.display());
    println!("Original file: {} characters", report.original_chars);
    println!("Abbreviated file: {} characters", report.abbreviated_chars);
    println!(
        "Characters saved: {} ({:.2}%)",
        report.chars_saved, report.percent_saved
    );
    if let Some(reason) = &report.soft_failure {
        eprintln!("Warning: {reason}; output is a copy of the input");
    }
    if let Some(debug) = &report.debug {
        println!();
        println!("{debug}");
    }
}

fn print_batch_report(batch: &BatchReport) {
    for report in &batch.reports {
        println!(
            "{} -> {} ({} chars saved, {:.2}%)",
            report.input_path.display(),
            report.output_path.display(),
            report.chars_saved,
            report.percent_saved
        );
        if let Some(reason) = &report.soft_failure {
            eprintln!("Warning: {}: {reason}", report.input_path.display());
        }
        if let Some(debug) = &report.debug {
            println!("{debug}");
        }
    }
    for failure in &batch.failures {
        eprintln!("Error: {}: {}", failure.path.display(), failure.error);
    }
    println!();
    println!("Files abbreviated: {}", batch.reports.len());
    println!("Original total: {} characters", batch.total_original_chars());
    println!(
        "Characters saved: {} ({:.2}%)",
        batch.total_chars_saved(),
        batch.percent_saved()
    );
}

fn record_runs(
    journal_path: &Path,
    reports: &[FileReport],
    config: &AbbreviationConfig,
) -> anyhow::Result<()> {
    let mut journal = RunJournal::load_from_file(journal_path);
    for report in reports {
        match RunRecord::from_report(report, config) {
            Ok(record) => journal.append(record),
            Err(e) => warn!(path = %report.input_path.display(), error = %e, "not journaled"),
        }
    }
    journal
        .save_to_file(journal_path)
        .with_context(|| format!("saving journal {}", journal_path.display()))?;
    info!(records = journal.len(), path = %journal_path.display(), "journal saved");
    Ok(())
}

fn run_stdout(cli: &Cli, config: AbbreviationConfig) -> anyhow::Result<()> {
    if !cli.path.is_file() {
        bail!("--stdout needs a single file, got '{}'", cli.path.display());
    }
    let source = std::fs::read_to_string(&cli.path)
        .with_context(|| format!("reading {}", cli.path.display()))?;

    let result = Abbreviator::new(config).abbreviate(&source);
    print!("{}", result.code);

    if let Some(err) = &result.soft_failure {
        eprintln!("Warning: {err}; output is a copy of the input");
    }
    if let Some(debug) = &result.debug {
        eprintln!("{debug}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = cli.resolve_config()?;
    info!(
        path = %cli.path.display(),
        max_depth = config.max_depth,
        preserve_chars = config.preserve_chars,
        preserve_lines = config.preserve_lines,
        "starting"
    );

    if cli.stdout {
        return run_stdout(&cli, config);
    }

    let layout = cli.layout();
    let reports = if cli.path.is_dir() {
        let batch = abbreviate_tree(&cli.path, &config, &layout)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&batch)?);
        } else {
            print_batch_report(&batch);
        }
        if !batch.failures.is_empty() && batch.reports.is_empty() {
            bail!("no files could be abbreviated under '{}'", cli.path.display());
        }
        batch.reports
    } else {
        let report = abbreviate_file(&cli.path, &config, &layout)
            .with_context(|| format!("abbreviating '{}'", cli.path.display()))?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_file_report(&report);
        }
        vec![report]
    };

    if let Some(journal_path) = &cli.journal {
        record_runs(journal_path, &reports, &config)?;
    }

    Ok(())
}
