//! Error types for the vehidoc-core library.

use std::fmt;

use thiserror::Error;

use crate::models::record::DocumentFormat;

/// Main error type for the vehidoc library.
#[derive(Error, Debug)]
pub enum VehidocError {
    /// PDF loading or text extraction error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// A required structural anchor is missing from the document text.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// One or more fields failed their acceptance test.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The detected format differs from the one the caller declared.
    #[error(
        "the file {document} does not match the expected format ({expected}); it was detected as: {detected}"
    )]
    FormatMismatch {
        document: String,
        expected: DocumentFormat,
        detected: DocumentFormat,
    },

    /// The document text matched none of the supported formats.
    #[error("the file {document} could not be identified as a supported format")]
    UnknownFormat { document: String },

    /// Spreadsheet export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF input and text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF carries no recoverable text.
    #[error("the PDF contains no extractable text or its format is not valid")]
    NoText,

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The input was refused before any parsing took place.
    #[error("rejected input {name}: {reason}")]
    Rejected { name: String, reason: String },

    /// The input could not be read from disk.
    #[error("could not read {name}: {reason}")]
    Unreadable { name: String, reason: String },
}

/// Errors raised while pulling fields out of document text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A certificate section the format requires is absent.
    #[error("the document does not contain the required section(s): {0}")]
    MissingSection(String),

    /// A section is present but lacks a value the format cannot do without.
    #[error("{field} was not found in section {section}")]
    MissingAnchor { section: String, field: String },
}

/// Why a single field was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// The field is empty.
    Missing,
    /// The field is shorter than the format allows.
    TooShort { min: usize },
    /// The field does not have the expected shape.
    Malformed { value: String },
    /// The field is outside its closed set of accepted values.
    NotAllowed { value: String },
}

/// A single field violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "missing field \"{}\"", self.field),
            FieldErrorKind::TooShort { min } => write!(
                f,
                "field \"{}\" is incomplete (fewer than {} characters)",
                self.field, min
            ),
            FieldErrorKind::Malformed { value } => write!(
                f,
                "field \"{}\" with value \"{}\" does not match the expected format",
                self.field, value
            ),
            FieldErrorKind::NotAllowed { value } => {
                write!(f, "field \"{}\" with value \"{}\" is not valid", self.field, value)
            }
        }
    }
}

/// Every violation found in one document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub document: String,
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the file {} has data problems:", self.document)?;
        for error in &self.errors {
            write!(f, "\n - {}", error)?;
        }
        Ok(())
    }
}

/// Errors related to spreadsheet export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No records and no statistics were supplied.
    #[error("there are no records to export")]
    NothingToExport,

    /// The spreadsheet writer failed.
    #[error("failed to write spreadsheet: {0}")]
    Writer(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type for the vehidoc library.
pub type Result<T> = std::result::Result<T, VehidocError>;
