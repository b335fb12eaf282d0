//! Process command - extract and validate a single document.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use vehidoc_core::export::NAME_HEADER;
use vehidoc_core::models::record::{DocumentFormat, ProcessedDocument};
use vehidoc_core::pdf::SourceDocument;
use vehidoc_core::pipeline::DocumentPipeline;

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Fail unless the document is of this format
    /// (CRT, SOAP, PERMISO_CIRCULACION, CERTIFICADO_DE_HOMOLOGACION)
    #[arg(short, long)]
    expect: Option<DocumentFormat>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Reading {}", args.input.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let document = SourceDocument::from_path(&args.input);
    let pipeline = DocumentPipeline::new(config);
    let result = pipeline.process_document(document, args.expect).await;
    pb.finish_and_clear();
    let processed = result?;

    info!(
        "Accepted {} as {} in {:?}",
        processed.document_name,
        processed.format,
        start.elapsed()
    );

    let output = format_document(&processed, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_document(doc: &ProcessedDocument, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(doc)?),
        OutputFormat::Csv => format_document_csv(doc),
        OutputFormat::Text => Ok(format_document_text(doc)),
    }
}

fn format_document_csv(doc: &ProcessedDocument) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![NAME_HEADER];
    header.extend(doc.record.iter().map(|(field, _)| field));
    wtr.write_record(&header)?;

    let mut row = vec![doc.document_name.as_str()];
    row.extend(doc.record.iter().map(|(_, value)| value));
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_document_text(doc: &ProcessedDocument) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", doc.document_name));
    output.push_str(&format!("Format: {} ({})\n", doc.format.label(), doc.format.code()));
    if let Some(title) = &doc.title {
        output.push_str(&format!("Title: {}\n", title));
    }
    output.push('\n');

    let width = doc
        .record
        .iter()
        .map(|(field, _)| field.chars().count())
        .max()
        .unwrap_or(0);

    output.push_str("Fields:\n");
    for (field, value) in doc.record.iter() {
        let padding = width - field.chars().count();
        output.push_str(&format!("  {}:{} {}\n", field, " ".repeat(padding), value));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use vehidoc_core::models::record::ExtractedRecord;

    fn sample() -> ProcessedDocument {
        let mut record = ExtractedRecord::new(DocumentFormat::CompulsoryInsurance);
        record.set("INSCRIPCION R.V.M", "LXWJ75-4");
        record.set("RUT", "97006000-6");
        ProcessedDocument {
            document_name: "soap.pdf".to_string(),
            format: DocumentFormat::CompulsoryInsurance,
            record,
            title: None,
        }
    }

    #[test]
    fn test_csv_starts_with_document_name() {
        let csv = format_document_csv(&sample()).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Nombre PDF,INSCRIPCION R.V.M,Bajo el codigo,RUT"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("soap.pdf,LXWJ75-4,,97006000-6"));
    }

    #[test]
    fn test_text_lists_every_field() {
        let text = format_document_text(&sample());

        assert!(text.contains("Document: soap.pdf"));
        assert!(text.contains("(SOAP)"));
        assert!(text.contains("RUT:"));
        assert!(text.contains("97006000-6"));
        assert!(!text.contains("Title:"));
    }
}
