//! Core library for Chilean vehicle document extraction.
//!
//! This crate provides:
//! - PDF text extraction (lopdf + pdf-extract)
//! - Format detection for the four supported documents (homologation
//!   certificates, technical inspection certificates, compulsory insurance
//!   and circulation permits)
//! - Per-format field extraction and strict structural validation
//! - A bounded-concurrency batch pipeline with progress reporting
//! - Spreadsheet export of accepted records with a statistics sheet

pub mod document;
pub mod error;
pub mod export;
pub mod models;
pub mod pdf;
pub mod pipeline;

pub use document::{DocumentExtractor, detect_format, extractor_for};
pub use error::{
    ExportError, ExtractionError, FieldError, PdfError, Result, ValidationError, VehidocError,
};
pub use export::{SheetBuffer, export, export_with_config};
pub use models::config::VehidocConfig;
pub use models::record::{DocumentFormat, ExtractedRecord, ProcessedDocument, ValidationOutcome};
pub use models::stats::{BatchRunStats, FailedDocument};
pub use pdf::{DocumentSource, PdfTextExtractor, SourceDocument, TextExtractor};
pub use pipeline::{BatchReport, DocumentOutcome, DocumentPipeline, OutcomeKind, ProgressEvent};
