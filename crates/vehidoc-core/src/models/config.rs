//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the vehidoc pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehidocConfig {
    /// PDF input configuration.
    pub pdf: PdfConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,

    /// Spreadsheet export configuration.
    pub export: ExportConfig,
}

/// PDF input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Largest accepted input, in bytes.
    pub max_file_size: u64,

    /// Refuse inputs that do not start with `%PDF-`.
    pub require_pdf_header: bool,

    /// Accepted file extensions (lowercase, without the dot).
    pub allowed_extensions: Vec<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            require_pdf_header: true,
            allowed_extensions: vec!["pdf".to_string()],
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Documents processed at the same time.
    pub concurrency: usize,

    /// Documents per chunk; the pipeline yields to the scheduler between chunks.
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 15,
            chunk_size: 100,
        }
    }
}

/// Spreadsheet layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Column width per character of the longest cell.
    pub column_width_factor: f64,

    /// Narrowest column width.
    pub min_column_width: f64,

    /// Height of a single-line data row.
    pub base_row_height: f64,

    /// Characters assumed to fit on one wrapped line.
    pub chars_per_line: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            column_width_factor: 1.2,
            min_column_width: 10.0,
            base_row_height: 15.0,
            chars_per_line: 20,
        }
    }
}

impl VehidocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
