//! Format detection, field extraction and validation for vehicle documents.

mod detect;
pub mod homologation;
pub mod inspection;
pub mod insurance;
pub mod matcher;
pub mod normalize;
pub mod patterns;
pub mod permit;
pub mod validate;

pub use detect::detect_format;
pub use homologation::HomologationExtractor;
pub use inspection::InspectionExtractor;
pub use insurance::InsuranceExtractor;
pub use matcher::{find_field, find_or_empty};
pub use permit::PermitExtractor;

use crate::error::ExtractionError;
use crate::models::record::{DocumentFormat, ExtractedRecord, ValidationOutcome};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Extractor and validator pair for one document format.
///
/// Implementations are pure: they read the text or record they are given and
/// touch no shared state.
pub trait DocumentExtractor: Send + Sync {
    /// The format this extractor handles.
    fn format(&self) -> DocumentFormat;

    /// Map raw document text to the format's fixed field set.
    ///
    /// Absent fields come back as empty strings; an error means a structural
    /// anchor the format depends on is missing.
    fn extract(&self, text: &str) -> Result<ExtractedRecord>;

    /// Check every field of an extracted record.
    fn validate(&self, record: &ExtractedRecord, document_name: &str) -> ValidationOutcome;

    /// Document title, for formats that carry one.
    fn title(&self, _text: &str) -> Option<String> {
        None
    }
}

static HOMOLOGATION: HomologationExtractor = HomologationExtractor;
static INSPECTION: InspectionExtractor = InspectionExtractor;
static INSURANCE: InsuranceExtractor = InsuranceExtractor;
static PERMIT: PermitExtractor = PermitExtractor;

/// The extractor for a detected format; `None` for [`DocumentFormat::Unknown`].
pub fn extractor_for(format: DocumentFormat) -> Option<&'static dyn DocumentExtractor> {
    match format {
        DocumentFormat::Homologation => Some(&HOMOLOGATION),
        DocumentFormat::TechnicalInspection => Some(&INSPECTION),
        DocumentFormat::CompulsoryInsurance => Some(&INSURANCE),
        DocumentFormat::CirculationPermit => Some(&PERMIT),
        DocumentFormat::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_format_has_an_extractor() {
        for format in DocumentFormat::SUPPORTED {
            let extractor = extractor_for(format).unwrap();
            assert_eq!(extractor.format(), format);
            assert!(!format.fields().is_empty());
        }
        assert!(extractor_for(DocumentFormat::Unknown).is_none());
    }
}
