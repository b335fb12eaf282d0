//! PDF input handling.
//!
//! The pipeline only needs raw text from a document; [`TextExtractor`] is the
//! seam it depends on, with [`PdfTextExtractor`] as the default.

mod extractor;

pub use extractor::PdfTextExtractor;

use std::path::{Path, PathBuf};

use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Turns document bytes into raw text.
pub trait TextExtractor: Send + Sync {
    /// Extract all text from the document.
    ///
    /// Fails with [`PdfError::NoText`] when nothing readable comes out.
    fn extract_text(&self, data: &[u8]) -> Result<String>;
}

/// Where a document's content comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Content already in memory.
    Memory(Vec<u8>),
    /// A file read only when the document is loaded.
    File(PathBuf),
}

/// A document submitted for processing: its name and where to find its content.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub source: DocumentSource,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            source: DocumentSource::Memory(bytes.into()),
        }
    }

    /// A document on disk, named after the file. Nothing is read yet.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: DocumentSource::File(path.to_path_buf()),
        }
    }

    /// Refuse inputs by name and size before any content is read.
    pub fn check(&self, config: &PdfConfig) -> Result<()> {
        let extension = Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if !config
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(self.rejected(format!(
                "unsupported file type, expected one of: {}",
                config.allowed_extensions.join(", ")
            )));
        }

        let size = self.size()?;
        if size > config.max_file_size {
            return Err(self.rejected(format!(
                "file is {} bytes, the limit is {} bytes",
                size, config.max_file_size
            )));
        }

        Ok(())
    }

    /// Check the input, read it and confirm it looks like a PDF.
    ///
    /// Files are read here, so callers control how many are held in memory
    /// at once.
    pub fn load(self, config: &PdfConfig) -> Result<Vec<u8>> {
        self.check(config)?;

        let Self { name, source } = self;
        let bytes = match source {
            DocumentSource::Memory(bytes) => bytes,
            DocumentSource::File(path) => std::fs::read(&path).map_err(|e| PdfError::Unreadable {
                name: name.clone(),
                reason: e.to_string(),
            })?,
        };

        if config.require_pdf_header && !bytes.starts_with(PDF_MAGIC) {
            return Err(PdfError::Rejected {
                name,
                reason: "content does not start with a PDF header".to_string(),
            });
        }

        Ok(bytes)
    }

    fn size(&self) -> Result<u64> {
        match &self.source {
            DocumentSource::Memory(bytes) => Ok(bytes.len() as u64),
            DocumentSource::File(path) => std::fs::metadata(path)
                .map(|meta| meta.len())
                .map_err(|e| self.unreadable(&e)),
        }
    }

    fn rejected(&self, reason: String) -> PdfError {
        PdfError::Rejected {
            name: self.name.clone(),
            reason,
        }
    }

    fn unreadable(&self, error: &std::io::Error) -> PdfError {
        PdfError::Unreadable {
            name: self.name.clone(),
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> PdfConfig {
        PdfConfig {
            max_file_size: 64,
            ..PdfConfig::default()
        }
    }

    #[test]
    fn test_check_accepts_pdf() {
        let doc = SourceDocument::new("CRT.PDF", b"%PDF-1.7\n".to_vec());
        assert!(doc.check(&config()).is_ok());
    }

    #[test]
    fn test_check_rejects_extension() {
        let doc = SourceDocument::new("notes.txt", b"%PDF-1.7\n".to_vec());
        assert!(matches!(doc.check(&config()), Err(PdfError::Rejected { .. })));

        let doc = SourceDocument::new("no_extension", b"%PDF-1.7\n".to_vec());
        assert!(matches!(doc.check(&config()), Err(PdfError::Rejected { .. })));
    }

    #[test]
    fn test_check_rejects_oversized() {
        let mut bytes = b"%PDF-1.7\n".to_vec();
        bytes.resize(65, b' ');
        let doc = SourceDocument::new("big.pdf", bytes);

        match doc.check(&config()) {
            Err(PdfError::Rejected { name, reason }) => {
                assert_eq!(name, "big.pdf");
                assert!(reason.contains("65 bytes"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_checks_header() {
        let doc = SourceDocument::new("fake.pdf", b"PK\x03\x04".to_vec());
        assert!(matches!(doc.clone().load(&config()), Err(PdfError::Rejected { .. })));

        let lenient = PdfConfig {
            require_pdf_header: false,
            ..config()
        };
        assert_eq!(doc.load(&lenient).unwrap(), b"PK\x03\x04".to_vec());
    }

    #[test]
    fn test_from_path_reads_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crt.pdf");
        fs::write(&path, b"%PDF-1.7\nbody").unwrap();

        let doc = SourceDocument::from_path(&path);
        assert_eq!(doc.name, "crt.pdf");

        // Content written after construction is what gets loaded.
        fs::write(&path, b"%PDF-1.7\nnewer").unwrap();
        assert_eq!(doc.load(&config()).unwrap(), b"%PDF-1.7\nnewer".to_vec());
    }

    #[test]
    fn test_oversized_file_rejected_from_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.pdf");
        fs::write(&path, vec![b'x'; 65]).unwrap();

        match SourceDocument::from_path(&path).load(&config()) {
            Err(PdfError::Rejected { reason, .. }) => assert!(reason.contains("65 bytes")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let doc = SourceDocument::from_path(&dir.path().join("gone.pdf"));

        match doc.load(&config()) {
            Err(PdfError::Unreadable { name, .. }) => assert_eq!(name, "gone.pdf"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
