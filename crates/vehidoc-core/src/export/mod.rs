//! Spreadsheet export of accepted documents.
//!
//! A workbook always has a "Data" sheet; a "Statistics" sheet is added when
//! run statistics are supplied.

mod filename;
mod sheet;
mod xlsx;

pub use filename::{export_file_name, sanitize};
pub use sheet::{CHECK_DIGIT_HEADER, DataSheet, NAME_HEADER};
pub use xlsx::{DATA_SHEET, STATISTICS_SHEET, strip_markup};

use tracing::{debug, info};

use crate::error::ExportError;
use crate::models::config::ExportConfig;
use crate::models::record::{DocumentFormat, ProcessedDocument};
use crate::models::stats::BatchRunStats;

/// A finished workbook and the name to save it under.
#[derive(Debug, Clone)]
pub struct SheetBuffer {
    pub bytes: Vec<u8>,
    /// Sanitized and percent-encoded.
    pub file_name: String,
}

impl SheetBuffer {
    /// The file name without percent-encoding, for writing to disk.
    pub fn decoded_file_name(&self) -> String {
        urlencoding::decode(&self.file_name)
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| self.file_name.clone())
    }
}

/// Export with the default layout.
pub fn export(
    records: &[ProcessedDocument],
    hint: Option<DocumentFormat>,
    stats: Option<&BatchRunStats>,
) -> Result<SheetBuffer, ExportError> {
    export_with_config(records, hint, stats, &ExportConfig::default())
}

/// Build the workbook for `records`.
///
/// Fails with [`ExportError::NothingToExport`] when there are no records and
/// no statistics.
pub fn export_with_config(
    records: &[ProcessedDocument],
    hint: Option<DocumentFormat>,
    stats: Option<&BatchRunStats>,
    config: &ExportConfig,
) -> Result<SheetBuffer, ExportError> {
    if records.is_empty() && stats.is_none() {
        return Err(ExportError::NothingToExport);
    }
    if stats.is_none() {
        debug!("No statistics supplied, skipping the statistics sheet");
    }

    let sheet = DataSheet::build(records, hint);
    let bytes = xlsx::write_workbook(&sheet, stats, config)?;
    let file_name = export_file_name(base_name(records, hint));

    info!(
        "Exported {} records ({} columns) as {}",
        sheet.rows.len(),
        sheet.headers.len(),
        file_name
    );

    Ok(SheetBuffer { bytes, file_name })
}

/// A lone titled document names the file; otherwise the format does.
fn base_name(records: &[ProcessedDocument], hint: Option<DocumentFormat>) -> &str {
    match records {
        [only] => match only.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => hint.unwrap_or(DocumentFormat::Unknown).label(),
        },
        _ => hint.unwrap_or(DocumentFormat::Unknown).label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ExtractedRecord;
    use pretty_assertions::assert_eq;

    fn homologation(name: &str, title: Option<&str>) -> ProcessedDocument {
        let mut record = ExtractedRecord::new(DocumentFormat::Homologation);
        record.set("Patente", "LXWJ75");
        ProcessedDocument {
            document_name: name.to_string(),
            format: DocumentFormat::Homologation,
            record,
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_nothing_to_export() {
        let result = export(&[], Some(DocumentFormat::TechnicalInspection), None);
        assert!(matches!(result, Err(ExportError::NothingToExport)));
    }

    #[test]
    fn test_stats_only_export() {
        let stats = BatchRunStats::new(0);
        let buffer = export(&[], Some(DocumentFormat::CompulsoryInsurance), Some(&stats)).unwrap();

        assert!(buffer.bytes.starts_with(b"PK"));
        assert_eq!(buffer.file_name, "Seguro%20Obligatorio%20(SOAP).xlsx");
        assert_eq!(buffer.decoded_file_name(), "Seguro Obligatorio (SOAP).xlsx");
    }

    #[test]
    fn test_single_titled_document_names_the_file() {
        let records = [homologation("h.pdf", Some("INDIVIDUAL A"))];
        let buffer = export(&records, Some(DocumentFormat::Homologation), None).unwrap();

        assert!(buffer.bytes.starts_with(b"PK"));
        assert_eq!(buffer.file_name, "INDIVIDUAL.xlsx");
    }

    #[test]
    fn test_several_documents_use_the_format_label() {
        let records = [
            homologation("a.pdf", Some("INDIVIDUAL")),
            homologation("b.pdf", Some("INDIVIDUAL")),
        ];
        let buffer = export(&records, Some(DocumentFormat::Homologation), None).unwrap();
        assert_eq!(buffer.file_name, "Certificado%20de%20Homologacion.xlsx");

        let buffer = export(&records, None, None).unwrap();
        assert_eq!(buffer.file_name, "Consolidado.xlsx");
    }
}
