//! Batch command - process many documents and export them to a spreadsheet.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use vehidoc_core::error::ExportError;
use vehidoc_core::export::export_with_config;
use vehidoc_core::models::record::{DocumentFormat, ProcessedDocument};
use vehidoc_core::pdf::SourceDocument;
use vehidoc_core::pipeline::{BatchReport, DocumentOutcome, DocumentPipeline, ProgressEvent};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Spreadsheet to write (default: the exported file name in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail every document that is not of this format
    #[arg(short, long)]
    expect: Option<DocumentFormat>,

    /// Documents processed at the same time (default: batch.concurrency)
    #[arg(short = 'j', long, env = "VEHIDOC_CONCURRENCY")]
    jobs: Option<usize>,

    /// Leave the statistics sheet out of the spreadsheet
    #[arg(long)]
    no_stats: bool,

    /// Print each progress event as a JSON line instead of a progress bar
    #[arg(long)]
    events: bool,

    /// Also write a per-document summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = expand_input(&args.input, &config.pdf.allowed_extensions)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    // Events own stdout, human output moves to stderr.
    let say = |line: String| {
        if args.events {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    };

    say(format!("{} Found {} files to process", style("ℹ").blue(), files.len()));

    // Files are read by the pipeline; unreadable ones become failed documents.
    let documents: Vec<SourceDocument> = files
        .iter()
        .map(|path| SourceDocument::from_path(path))
        .collect();

    let export_config = config.export.clone();
    let pipeline = DocumentPipeline::new(config);

    let pb = if args.events {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(documents.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}",
            )?
            .progress_chars("=>-"),
    );

    let report = pipeline
        .process_batch(documents, args.expect, args.jobs, |event| {
            if args.events {
                emit_event(event);
            } else {
                pb.set_position(event.completed as u64);
                pb.set_message(progress_message(event));
            }
        })
        .await;

    pb.finish_and_clear();

    let accepted = report.accepted();
    let hint = args.expect.or_else(|| shared_format(&accepted));
    let stats = (!args.no_stats).then_some(&report.stats);

    match export_with_config(&accepted, hint, stats, &export_config) {
        Ok(buffer) => {
            let output_path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(buffer.decoded_file_name()));
            fs::write(&output_path, &buffer.bytes)?;
            say(format!(
                "{} Spreadsheet written to {}",
                style("✓").green(),
                output_path.display()
            ));
        }
        Err(ExportError::NothingToExport) => {
            warn!("No accepted documents, nothing exported");
            say(format!(
                "{} No accepted documents, spreadsheet not written",
                style("!").yellow()
            ));
        }
        Err(e) => return Err(e.into()),
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &report)?;
        say(format!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        ));
    }

    say(String::new());
    say(format!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.stats.total(),
        start.elapsed()
    ));
    say(format!(
        "   {} successful, {} failed",
        style(report.stats.succeeded()).green(),
        style(report.stats.failed()).red()
    ));

    if !report.stats.failures().is_empty() {
        say(String::new());
        say(format!("{}", style("Failed files:").red()));
        for failure in report.stats.failures() {
            say(format!("  - {}: {}", failure.document_name, failure.error));
        }
    }

    Ok(())
}

/// Glob matches with an accepted extension, sorted for a stable submission order.
fn expand_input(pattern: &str, allowed_extensions: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && has_allowed_extension(p, allowed_extensions))
        .collect();
    files.sort();

    debug!("Pattern {} matched {} files", pattern, files.len());
    Ok(files)
}

fn has_allowed_extension(path: &Path, allowed_extensions: &[String]) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    allowed_extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
}

fn emit_event(event: &ProgressEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!("Could not serialize progress event: {}", e),
    }
}

fn progress_message(event: &ProgressEvent) -> String {
    format!(
        "{} ok, {} failed, ~{}s left",
        event.successes,
        event.failures,
        event.estimated_ms_remaining.div_ceil(1000)
    )
}

/// The format every record shares, if there is exactly one.
fn shared_format(records: &[ProcessedDocument]) -> Option<DocumentFormat> {
    let first = records.first()?.format;
    records
        .iter()
        .all(|doc| doc.format == first)
        .then_some(first)
}

fn write_summary(path: &Path, report: &BatchReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["filename", "status", "format", "error"])?;

    for outcome in &report.outcomes {
        match outcome {
            DocumentOutcome::Succeeded(doc) => {
                wtr.write_record([doc.document_name.as_str(), "success", doc.format.code(), ""])?;
            }
            DocumentOutcome::Failed {
                document_name,
                reason,
            } => {
                wtr.write_record([document_name.as_str(), "error", "", reason.as_str()])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
