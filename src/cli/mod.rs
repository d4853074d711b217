//! # CLI Module
//!
//! Command-line interface for the media duplicate finder.
//!
//! ## Usage
//! ```bash
//! # Scan with a config file
//! media-dedup --config ./config.json
//!
//! # Override output path and concurrency
//! media-dedup --config ./config.json --output ~/dupes.json --queue-limit 16
//!
//! # List every classified file while scanning
//! media-dedup --config ./config.json --verbose
//! ```

use clap::Parser;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_dedup::config::Config;
use media_dedup::core::counter::format_size;
use media_dedup::core::fingerprint::FileRecord;
use media_dedup::core::pipeline::PipelineResult;
use media_dedup::core::reporter::write_json;
use media_dedup::core::scanner::MediaKind;
use media_dedup::error::Result;
use media_dedup::events::{
    ClusterEvent, Event, EventChannel, FingerprintEvent, PipelineEvent, ScanEvent,
};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Media Dedup - find near-duplicate photos and videos
#[derive(Parser, Debug)]
#[command(name = "media-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Search options JSON file
    #[arg(short, long, default_value = "./config.json")]
    config: PathBuf,

    /// Report path (overrides "output" in the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Concurrent fingerprint limit (overrides "queueLimit")
    #[arg(short, long)]
    queue_limit: Option<usize>,

    /// Print every classified file
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// No progress or summary output; errors are still printed
    #[arg(long)]
    quiet: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let term = Term::stderr();

    let mut config = Config::load(&cli.config)?;
    if let Some(limit) = cli.queue_limit {
        config = config.with_queue_limit(limit)?;
    }
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }

    if !cli.quiet {
        print_config(&term, &config);
    }

    let pipeline = config.pipeline_builder().build();
    let (sender, receiver) = EventChannel::new();

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix:.bold} {pos} fingerprinted  {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let progress_clone = progress.clone();
    let verbose = cli.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    progress_clone.set_prefix(phase.to_string());
                }
                Event::Scan(ScanEvent::DirectoryEntered { path, totals, .. }) => {
                    progress_clone.set_message(format!("{}  {}", totals, path.display()));
                }
                Event::Scan(ScanEvent::FileDiscovered {
                    path,
                    kind,
                    size,
                    ordinal,
                    ..
                }) if verbose => {
                    progress_clone.println(format!(
                        "  {:<5} {:>6} {} {}",
                        kind,
                        ordinal,
                        style(format_size(size)).dim(),
                        display_path(&path)
                    ));
                }
                Event::Fingerprint(FingerprintEvent::Recorded { .. })
                | Event::Fingerprint(FingerprintEvent::Failed { .. }) => {
                    progress_clone.inc(1);
                }
                Event::Scan(ScanEvent::Completed { totals }) => {
                    progress_clone.set_message(totals.to_string());
                }
                Event::Cluster(ClusterEvent::Started { kind, total }) => {
                    progress_clone.set_message(format!("{} {}s", total, kind));
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    progress_clone.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let outcome = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    progress.finish_and_clear();

    let result = outcome?;
    write_json(&result.report, &config.output)?;

    if !cli.quiet {
        print_results(&term, &result, &config.output);
    }
    print_errors(&term, &result);

    Ok(())
}

fn print_config(term: &Term, config: &Config) {
    term.write_line(&format!(
        "{} {}",
        style("Media Dedup").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    for (label, value) in config.echo_lines() {
        term.write_line(&format!("  {:<13} {}", style(label).dim(), value))
            .ok();
    }
    term.write_line("").ok();
}

fn print_results(term: &Term, result: &PipelineResult, output: &Path) {
    let totals = &result.totals;
    let summary = result.report.summary();

    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line(&format!(
        "  {} directories, {} photos, {} videos, {} skipped ({}) in {:.1}s",
        style(totals.directories).cyan(),
        style(totals.photo_files).cyan(),
        style(totals.video_files).cyan(),
        style(totals.skipped_files).dim(),
        totals.bytes,
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line("").ok();

    for cluster in result.report.clusters() {
        term.write_line(&format!(
            "  {} {}",
            style("Similar").yellow().bold(),
            describe(&cluster.representative)
        ))
        .ok();
        for m in &cluster.matches {
            term.write_line(&format!(
                "      {} {}",
                style(format!("Distance:{:<3}", m.distance)).dim(),
                describe(&m.record)
            ))
            .ok();
        }
    }
    if !result.report.clusters().is_empty() {
        term.write_line("").ok();
    }

    term.write_line(&format!(
        "  {} clusters, {} duplicates, {} unique",
        style(summary.clusters).cyan(),
        style(summary.duplicates).yellow(),
        style(summary.uniques).green()
    ))
    .ok();
    term.write_line(&format!(
        "  Report written to {}",
        style(output.display()).bold()
    ))
    .ok();
}

/// Per-file failures, all at once after the run
fn print_errors(term: &Term, result: &PipelineResult) {
    if result.errors.is_empty() {
        return;
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{} {} files could not be fingerprinted:",
        style("!").red().bold(),
        result.errors.len()
    ))
    .ok();
    for error in &result.errors {
        term.write_line(&format!("  {}", style(error).red())).ok();
    }
}

fn describe(record: &FileRecord) -> String {
    let (width, height) = record.fingerprint.dimensions();
    let kind = match record.fingerprint.kind() {
        MediaKind::Video => record
            .fingerprint
            .duration_secs()
            .map(|secs| format!(" {secs}s"))
            .unwrap_or_default(),
        _ => String::new(),
    };
    format!(
        "[{:>4}px*{:>4}px{}] {}",
        width,
        height,
        kind,
        display_path(&record.path)
    )
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(&home).ok().map(Path::to_path_buf))
        .map(|rest| format!("~/{}", rest.display()))
        .unwrap_or_else(|| path.display().to_string())
}
