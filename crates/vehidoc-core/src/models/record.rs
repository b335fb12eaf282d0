//! Document formats and the records extracted from them.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::document::{homologation, inspection, insurance, permit};
use crate::error::{FieldError, ValidationError};

/// The vehicle document kinds the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// Certificado de Homologación.
    #[serde(rename = "CERTIFICADO_DE_HOMOLOGACION")]
    Homologation,
    /// Certificado de Revisión Técnica (CRT).
    #[serde(rename = "CRT")]
    TechnicalInspection,
    /// Seguro Obligatorio de Accidentes Personales (SOAP).
    #[serde(rename = "SOAP")]
    CompulsoryInsurance,
    /// Permiso de Circulación.
    #[serde(rename = "PERMISO_CIRCULACION")]
    CirculationPermit,
    /// None of the above.
    #[serde(rename = "DESCONOCIDO")]
    Unknown,
}

impl DocumentFormat {
    /// All formats a document can be extracted as.
    pub const SUPPORTED: [DocumentFormat; 4] = [
        DocumentFormat::Homologation,
        DocumentFormat::TechnicalInspection,
        DocumentFormat::CompulsoryInsurance,
        DocumentFormat::CirculationPermit,
    ];

    /// Stable identifier used on the wire and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Self::Homologation => "CERTIFICADO_DE_HOMOLOGACION",
            Self::TechnicalInspection => "CRT",
            Self::CompulsoryInsurance => "SOAP",
            Self::CirculationPermit => "PERMISO_CIRCULACION",
            Self::Unknown => "DESCONOCIDO",
        }
    }

    /// Human readable name, also the base name of exported spreadsheets.
    pub fn label(self) -> &'static str {
        match self {
            Self::Homologation => "Certificado de Homologación",
            Self::TechnicalInspection => "Certificado de Revisión Técnica (CRT)",
            Self::CompulsoryInsurance => "Seguro Obligatorio (SOAP)",
            Self::CirculationPermit => "Permiso de Circulación",
            Self::Unknown => "Consolidado",
        }
    }

    /// Field names, in export order, declared by the format's extractor.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Homologation => homologation::FIELDS,
            Self::TechnicalInspection => inspection::FIELDS,
            Self::CompulsoryInsurance => insurance::FIELDS,
            Self::CirculationPermit => permit::FIELDS,
            Self::Unknown => &[],
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown format"),
            other => f.write_str(other.code()),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "certificado_de_homologacion" | "homologacion" | "homologation" => {
                Ok(Self::Homologation)
            }
            "crt" | "revision_tecnica" | "technical_inspection" | "inspection" => {
                Ok(Self::TechnicalInspection)
            }
            "soap" | "seguro_obligatorio" | "compulsory_insurance" | "insurance" => {
                Ok(Self::CompulsoryInsurance)
            }
            "permiso_circulacion" | "circulation_permit" | "permit" => Ok(Self::CirculationPermit),
            _ => Err(format!("unknown document format: {}", s)),
        }
    }
}

/// Ordered field-name to value mapping produced by one extractor.
///
/// The field set and its order come from [`DocumentFormat::fields`]; values
/// start empty and are filled in by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    format: DocumentFormat,
    fields: Vec<(&'static str, String)>,
}

impl ExtractedRecord {
    /// Create a record with every field of `format` present and empty.
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            fields: format
                .fields()
                .iter()
                .map(|name| (*name, String::new()))
                .collect(),
        }
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Set a field value. Names outside the format's schema are ignored.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        if let Some(slot) = self.fields.iter_mut().find(|(field, _)| *field == name) {
            slot.1 = value.into();
        }
    }

    /// Value of a field, `None` if the format does not declare it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(name, value)| (*name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ExtractedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of running a format validator over a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every field passed; the record is unchanged.
    Accepted,
    /// At least one field failed. Holds every violation, not just the first.
    Rejected(Vec<FieldError>),
}

impl ValidationOutcome {
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Self::Accepted
        } else {
            Self::Rejected(errors)
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Attach the document name to a rejection.
    pub fn into_result(self, document: &str) -> Result<(), ValidationError> {
        match self {
            Self::Accepted => Ok(()),
            Self::Rejected(errors) => Err(ValidationError {
                document: document.to_string(),
                errors,
            }),
        }
    }
}

/// A document that made it through detection, extraction and validation.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    /// Name the caller submitted the document under.
    pub document_name: String,
    /// Format detected from the text.
    pub format: DocumentFormat,
    /// Extracted and validated fields.
    pub record: ExtractedRecord,
    /// Document title, when the format carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrorKind;

    #[test]
    fn test_record_keeps_declared_order() {
        let mut record = ExtractedRecord::new(DocumentFormat::TechnicalInspection);
        record.set("Folio", "N°B1");
        record.set("Not a field", "ignored");

        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, DocumentFormat::TechnicalInspection.fields());
        assert_eq!(record.get("Folio"), Some("N°B1"));
        assert_eq!(record.get("Planta"), Some(""));
        assert_eq!(record.get("Not a field"), None);
    }

    #[test]
    fn test_record_serializes_as_ordered_map() {
        let mut record = ExtractedRecord::new(DocumentFormat::CompulsoryInsurance);
        record.set("RUT", "97006000-6");

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with("{\"INSCRIPCION R.V.M\":\"\""));
        assert!(json.contains("\"RUT\":\"97006000-6\""));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CRT".parse::<DocumentFormat>().unwrap(), DocumentFormat::TechnicalInspection);
        assert_eq!("soap".parse::<DocumentFormat>().unwrap(), DocumentFormat::CompulsoryInsurance);
        assert_eq!(
            "PERMISO_CIRCULACION".parse::<DocumentFormat>().unwrap(),
            DocumentFormat::CirculationPermit
        );
        assert_eq!(
            "certificado-de-homologacion".parse::<DocumentFormat>().unwrap(),
            DocumentFormat::Homologation
        );
        assert!("invoice".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn test_outcome_into_result() {
        assert!(ValidationOutcome::from_errors(vec![]).into_result("a.pdf").is_ok());

        let outcome = ValidationOutcome::from_errors(vec![FieldError::new(
            "Planta",
            FieldErrorKind::Missing,
        )]);
        assert!(!outcome.is_accepted());
        let error = outcome.into_result("a.pdf").unwrap_err();
        assert_eq!(error.document, "a.pdf");
        assert_eq!(error.errors.len(), 1);
    }
}
