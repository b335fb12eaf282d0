//! Document pipeline: text extraction, detection, extraction and validation
//! for one document, and bounded-concurrency batches with progress events.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::document::{detect_format, extractor_for};
use crate::error::{PdfError, Result, VehidocError};
use crate::models::config::VehidocConfig;
use crate::models::record::{DocumentFormat, ProcessedDocument};
use crate::models::stats::BatchRunStats;
use crate::pdf::{PdfTextExtractor, SourceDocument, TextExtractor};

/// Whether a document made it through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Succeeded,
    Failed,
}

/// Final state of one document in a batch.
#[derive(Debug, Clone)]
pub enum DocumentOutcome {
    Succeeded(ProcessedDocument),
    Failed {
        document_name: String,
        reason: String,
    },
}

impl DocumentOutcome {
    pub fn document_name(&self) -> &str {
        match self {
            Self::Succeeded(doc) => &doc.document_name,
            Self::Failed { document_name, .. } => document_name,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Succeeded(_) => OutcomeKind::Succeeded,
            Self::Failed { .. } => OutcomeKind::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Emitted after every completed document, in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Documents finished so far, including this one.
    pub completed: usize,
    pub total: usize,
    pub document_name: String,
    pub outcome: OutcomeKind,
    /// Failure reason, for failed documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Running success count.
    pub successes: usize,
    /// Running failure count.
    pub failures: usize,
    pub elapsed_ms: u64,
    /// Mean time per finished document times the documents left.
    pub estimated_ms_remaining: u64,
}

impl ProgressEvent {
    fn new(stats: &BatchRunStats, outcome: &DocumentOutcome, elapsed: Duration) -> Self {
        let completed = stats.completed();
        let remaining = stats.total().saturating_sub(completed);
        let elapsed_ms = elapsed.as_millis() as u64;

        Self {
            completed,
            total: stats.total(),
            document_name: outcome.document_name().to_string(),
            outcome: outcome.kind(),
            error: match outcome {
                DocumentOutcome::Failed { reason, .. } => Some(reason.clone()),
                DocumentOutcome::Succeeded(_) => None,
            },
            successes: stats.succeeded(),
            failures: stats.failed(),
            elapsed_ms,
            estimated_ms_remaining: estimate_remaining(elapsed_ms, completed, remaining),
        }
    }
}

fn estimate_remaining(elapsed_ms: u64, completed: usize, remaining: usize) -> u64 {
    if completed == 0 {
        return 0;
    }
    let per_document = elapsed_ms as f64 / completed as f64;
    (per_document * remaining as f64).round() as u64
}

/// Everything a batch produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One outcome per submitted document, in submission order.
    pub outcomes: Vec<DocumentOutcome>,
    pub stats: BatchRunStats,
}

impl BatchReport {
    /// Accepted documents, in submission order.
    pub fn accepted(&self) -> Vec<ProcessedDocument> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                DocumentOutcome::Succeeded(doc) => Some(doc.clone()),
                DocumentOutcome::Failed { .. } => None,
            })
            .collect()
    }
}

/// Runs documents through detection, extraction and validation.
pub struct DocumentPipeline {
    extractor: Arc<dyn TextExtractor>,
    config: VehidocConfig,
}

impl DocumentPipeline {
    /// Pipeline backed by [`PdfTextExtractor`].
    pub fn new(config: VehidocConfig) -> Self {
        Self::with_extractor(Arc::new(PdfTextExtractor::new()), config)
    }

    pub fn with_extractor(extractor: Arc<dyn TextExtractor>, config: VehidocConfig) -> Self {
        Self { extractor, config }
    }

    pub fn config(&self) -> &VehidocConfig {
        &self.config
    }

    /// Detect, extract and validate already extracted text.
    ///
    /// With an `expected` format, any other detected format is an error
    /// naming both.
    pub fn process_text(
        &self,
        document_name: &str,
        text: &str,
        expected: Option<DocumentFormat>,
    ) -> Result<ProcessedDocument> {
        let format = detect_format(text);
        debug!(document = document_name, "Detected format: {}", format);

        if let Some(expected) = expected {
            if format != expected {
                return Err(VehidocError::FormatMismatch {
                    document: document_name.to_string(),
                    expected,
                    detected: format,
                });
            }
        }

        let extractor = extractor_for(format).ok_or_else(|| VehidocError::UnknownFormat {
            document: document_name.to_string(),
        })?;

        let record = extractor.extract(text)?;
        extractor
            .validate(&record, document_name)
            .into_result(document_name)?;

        Ok(ProcessedDocument {
            document_name: document_name.to_string(),
            format,
            title: extractor.title(text),
            record,
        })
    }

    /// Run one document through the whole pipeline.
    ///
    /// Loading and text extraction run on the blocking pool; a document's
    /// content is only in memory while it holds a batch slot.
    pub async fn process_document(
        &self,
        document: SourceDocument,
        expected: Option<DocumentFormat>,
    ) -> Result<ProcessedDocument> {
        let name = document.name.clone();
        let pdf_config = self.config.pdf.clone();
        let extractor = Arc::clone(&self.extractor);
        let text = tokio::task::spawn_blocking(move || {
            let bytes = document.load(&pdf_config)?;
            extractor.extract_text(&bytes)
        })
        .await
        .map_err(|e| PdfError::TextExtraction(e.to_string()))??;

        debug!(document = %name, "Extracted {} characters of text", text.len());
        self.process_text(&name, &text, expected)
    }

    /// Process a batch of documents.
    ///
    /// Documents run in chunks of `batch.chunk_size`, at most `concurrency`
    /// at a time (default `batch.concurrency`), yielding to the runtime
    /// between chunks. `on_progress` is called after each document finishes.
    /// A failed document never stops the batch.
    pub async fn process_batch<F>(
        &self,
        documents: Vec<SourceDocument>,
        expected: Option<DocumentFormat>,
        concurrency: Option<usize>,
        mut on_progress: F,
    ) -> BatchReport
    where
        F: FnMut(&ProgressEvent),
    {
        let total = documents.len();
        let concurrency = concurrency.unwrap_or(self.config.batch.concurrency).max(1);
        let chunk_size = self.config.batch.chunk_size.max(1);

        info!(
            "Processing {} documents ({} at a time, chunks of {})",
            total, concurrency, chunk_size
        );

        let started = Instant::now();
        let mut stats = BatchRunStats::new(total);
        let mut outcomes: Vec<Option<DocumentOutcome>> = vec![None; total];
        let mut pending = documents.into_iter().enumerate();

        loop {
            let chunk: Vec<(usize, SourceDocument)> = pending.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }

            let mut results = stream::iter(chunk)
                .map(|(index, document)| async move {
                    let name = document.name.clone();
                    let result = self.process_document(document, expected).await;
                    (index, name, result)
                })
                .buffer_unordered(concurrency);

            while let Some((index, name, result)) = results.next().await {
                let outcome = match result {
                    Ok(doc) => {
                        info!(document = %name, "Accepted as {}", doc.format);
                        stats.record_success();
                        DocumentOutcome::Succeeded(doc)
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        warn!(document = %name, "Rejected: {}", reason);
                        stats.record_failure(index, name.as_str(), reason.as_str());
                        DocumentOutcome::Failed {
                            document_name: name,
                            reason,
                        }
                    }
                };

                on_progress(&ProgressEvent::new(&stats, &outcome, started.elapsed()));
                outcomes[index] = Some(outcome);
            }

            tokio::task::yield_now().await;
        }

        info!(
            "Batch finished: {} succeeded, {} failed in {:?}",
            stats.succeeded(),
            stats.failed(),
            started.elapsed()
        );

        BatchReport {
            outcomes: outcomes.into_iter().flatten().collect(),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CRT_TEXT: &str = "CERTIFICADO DE REVISIÓN TÉCNICA
FECHA REVISIÓN: 10 OCTUBRE 2023
PLANTA: AB-1234
PLACA PATENTE ABCD12
VÁLIDO HASTA OCTUBRE 2024
N°B1234567
CERTIFICADO DE EMISIONES CONTAMINANTES
VÁLIDO HASTA ABRIL 2024";

    const SOAP_TEXT: &str = "SEGURO OBLIGATORIO
INSCRIPCION R.V.M.: LXWJ75-4
Bajo el codigo: POL320130487
RUT: 97.006.000-6
RIGE DESDE 01-01-2025
HASTA 31-12-2025
POLIZA N°: 6297613-M
PRIMA: 8.990";

    const HOMOLOGATION_TEXT: &str = "CERTIFICADO DE HOMOLOGACIÓN INDIVIDUAL REEMPLAZA
FECHA DE EMISIÓN 19/JUL/2022
Nº CORRELATIVO 2022-000123
CÓDIGO DE INFORME TÉCNICO CIT-4567
PATENTE LXWJ-75
VÁLIDO HASTA JUL/2025
TIPO DE VEHÍCULO CAMIONETA
MARCA TOYOTA
AÑO 2020
MODELO HILUX 2.4 COLOR BLANCO PERLA VIN MR0HA3CD100123456
Nº MOTOR 2GDC123456 C
Firmado por: JUAN PEREZ SOTO 19/07/2022 AUDITORÍA";

    const PERMIT_TEXT: &str = "PERMISO DE CIRCULACIÓN
Placa Única: ABC-123
Codigo SII: SII456
Valor Permiso: 1000
Pago total:
Pago cuota 1: X
Pago cuota 2:
Total a pagar: 1500
Fecha de emisión: 01/01/2025
Fecha Vencimiento: 31/12/2025
Forma de Pago: EFECTIVO";

    /// Treats the document bytes as UTF-8 text.
    struct PlainText;

    impl TextExtractor for PlainText {
        fn extract_text(&self, data: &[u8]) -> crate::pdf::Result<String> {
            let text = String::from_utf8_lossy(data).into_owned();
            if text.trim().is_empty() {
                return Err(PdfError::NoText);
            }
            Ok(text)
        }
    }

    fn pipeline(config: VehidocConfig) -> DocumentPipeline {
        let mut config = config;
        config.pdf.require_pdf_header = false;
        DocumentPipeline::with_extractor(Arc::new(PlainText), config)
    }

    fn doc(name: &str, text: &str) -> SourceDocument {
        SourceDocument::new(name, text.as_bytes().to_vec())
    }

    #[test]
    fn test_process_text() {
        let processed = pipeline(VehidocConfig::default())
            .process_text("crt.pdf", CRT_TEXT, None)
            .unwrap();

        assert_eq!(processed.format, DocumentFormat::TechnicalInspection);
        assert_eq!(processed.record.get("Fecha de Revisión"), Some("10 OCTUBRE 2023"));
        assert_eq!(processed.title, None);
    }

    #[test]
    fn test_process_homologation_text() {
        let processed = pipeline(VehidocConfig::default())
            .process_text("h.pdf", HOMOLOGATION_TEXT, None)
            .unwrap();

        assert_eq!(processed.format, DocumentFormat::Homologation);
        assert_eq!(processed.title.as_deref(), Some("INDIVIDUAL"));
        assert_eq!(processed.record.get("Patente"), Some("LXWJ75"));
        assert_eq!(processed.record.get("Nº Motor"), Some("2GDC123456"));
        assert_eq!(processed.record.get("Firmado por"), Some("JUAN PEREZ SOTO"));
        assert!(processed.record.iter().all(|(_, value)| !value.is_empty()));
    }

    #[test]
    fn test_process_permit_text() {
        let processed = pipeline(VehidocConfig::default())
            .process_text("permiso.pdf", PERMIT_TEXT, None)
            .unwrap();

        assert_eq!(processed.format, DocumentFormat::CirculationPermit);
        let values: Vec<(&str, &str)> = processed.record.iter().collect();
        assert_eq!(
            values,
            vec![
                ("Placa Única", "ABC-123"),
                ("Código SII", "SII456"),
                ("Valor Permiso", "1000"),
                ("Pago total", "No aplica"),
                ("Pago Cuota 1", "X"),
                ("Pago Cuota 2", "No aplica"),
                ("Total a pagar", "1500"),
                ("Fecha de emisión", "01/01/2025"),
                ("Fecha de vencimiento", "31/12/2025"),
                ("Forma de Pago", "EFECTIVO"),
            ]
        );
    }

    #[test]
    fn test_format_mismatch() {
        let result = pipeline(VehidocConfig::default()).process_text(
            "crt.pdf",
            CRT_TEXT,
            Some(DocumentFormat::CompulsoryInsurance),
        );

        match result {
            Err(VehidocError::FormatMismatch {
                expected, detected, ..
            }) => {
                assert_eq!(expected, DocumentFormat::CompulsoryInsurance);
                assert_eq!(detected, DocumentFormat::TechnicalInspection);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format() {
        let result = pipeline(VehidocConfig::default()).process_text("x.pdf", "Factura", None);
        assert!(matches!(result, Err(VehidocError::UnknownFormat { .. })));
    }

    #[test]
    fn test_rejection_lists_every_field() {
        let text = SOAP_TEXT.replace("RUT: 97.006.000-6", "").replace("PRIMA: 8.990", "");
        let error = pipeline(VehidocConfig::default())
            .process_text("soap.pdf", &text, None)
            .unwrap_err();

        let message = error.to_string();
        assert!(message.contains("\"RUT\""));
        assert!(message.contains("\"PRIMA\""));
    }

    #[tokio::test]
    async fn test_process_document_checks_input() {
        let result = pipeline(VehidocConfig::default())
            .process_document(doc("crt.txt", CRT_TEXT), None)
            .await;
        assert!(matches!(result, Err(VehidocError::Pdf(PdfError::Rejected { .. }))));

        let result = pipeline(VehidocConfig::default())
            .process_document(doc("empty.pdf", "  "), None)
            .await;
        assert!(matches!(result, Err(VehidocError::Pdf(PdfError::NoText))));
    }

    #[tokio::test]
    async fn test_batch_counts_and_order() {
        let mut config = VehidocConfig::default();
        config.batch.chunk_size = 2;

        let documents = vec![
            doc("a.pdf", CRT_TEXT),
            doc("b.pdf", "nothing useful here"),
            doc("c.pdf", SOAP_TEXT),
            doc("d.pdf", "CERTIFICADO DE REVISIÓN TÉCNICA sin emisiones"),
            doc("e.pdf", CRT_TEXT),
        ];

        let mut events = Vec::new();
        let report = pipeline(config)
            .process_batch(documents, None, Some(3), |event| events.push(event.clone()))
            .await;

        let names: Vec<&str> = report.outcomes.iter().map(|o| o.document_name()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf", "d.pdf", "e.pdf"]);

        let kinds: Vec<OutcomeKind> = report.outcomes.iter().map(|o| o.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                OutcomeKind::Succeeded,
                OutcomeKind::Failed,
                OutcomeKind::Succeeded,
                OutcomeKind::Failed,
                OutcomeKind::Succeeded,
            ]
        );

        assert_eq!(report.stats.total(), 5);
        assert_eq!(report.stats.succeeded(), 3);
        assert_eq!(report.stats.failed(), 2);
        assert_eq!(report.accepted().len(), 3);

        assert_eq!(events.len(), 5);
        let counts: Vec<usize> = events.iter().map(|e| e.completed).collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5]);

        let last = events.last().unwrap();
        assert_eq!((last.successes, last.failures), (3, 2));
        assert_eq!(last.estimated_ms_remaining, 0);

        let failed: Vec<&ProgressEvent> = events
            .iter()
            .filter(|e| e.outcome == OutcomeKind::Failed)
            .collect();
        assert!(failed.iter().all(|e| e.error.is_some()));
    }

    #[tokio::test]
    async fn test_batch_with_expected_format() {
        let documents = vec![doc("a.pdf", CRT_TEXT), doc("c.pdf", SOAP_TEXT)];
        let report = pipeline(VehidocConfig::default())
            .process_batch(documents, Some(DocumentFormat::CompulsoryInsurance), None, |_| {})
            .await;

        assert_eq!(report.stats.failed(), 1);
        assert_eq!(report.stats.failures()[0].document_name, "a.pdf");
        assert!(report.stats.failures()[0].error.contains("(SOAP)"));
    }

    #[tokio::test]
    async fn test_unreadable_source_fails_only_that_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let on_disk = dir.path().join("a.pdf");
        std::fs::write(&on_disk, CRT_TEXT).unwrap();

        let documents = vec![
            SourceDocument::from_path(&on_disk),
            SourceDocument::from_path(&dir.path().join("gone.pdf")),
            doc("c.pdf", SOAP_TEXT),
        ];

        let mut events = Vec::new();
        let report = pipeline(VehidocConfig::default())
            .process_batch(documents, None, Some(2), |event| events.push(event.clone()))
            .await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.stats.succeeded(), 2);
        assert_eq!(report.stats.failed(), 1);
        assert_eq!(report.stats.failures()[0].document_name, "gone.pdf");
        assert!(report.stats.failures()[0].error.contains("could not read gone.pdf"));
        assert!(!report.outcomes[1].is_success());
        assert_eq!(events.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = pipeline(VehidocConfig::default())
            .process_batch(Vec::new(), None, None, |_| panic!("no events expected"))
            .await;
        assert!(report.outcomes.is_empty());
        assert_eq!(report.stats.total(), 0);
    }

    #[test]
    fn test_estimate_remaining() {
        assert_eq!(estimate_remaining(1000, 4, 6), 1500);
        assert_eq!(estimate_remaining(0, 0, 6), 0);
        assert_eq!(estimate_remaining(1000, 3, 1), 333);
    }
}
