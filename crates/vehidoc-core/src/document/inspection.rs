//! Technical inspection certificate (CRT) extraction.
//!
//! A CRT document bundles two certificates: the technical revision and the
//! emissions check. Each carries its own "VÁLIDO HASTA" date, so the text is
//! split into both sections before those dates are read.

use tracing::debug;

use super::matcher::find_or_empty;
use super::patterns::*;
use super::validate::{FieldRule, check_fields};
use super::{DocumentExtractor, Result};
use crate::error::ExtractionError;
use crate::models::record::{DocumentFormat, ExtractedRecord, ValidationOutcome};

pub const INSPECTION_DATE: &str = "Fecha de Revisión";
pub const PLANT: &str = "Planta";
pub const PLATE: &str = "Placa Patente";
pub const REVISION_VALID_UNTIL: &str = "Válido Hasta Revisión Técnica";
pub const EMISSIONS_VALID_UNTIL: &str = "Válido Hasta Contaminantes";
pub const FOLIO: &str = "Folio";

/// Fields in export order. The folio always comes last.
pub const FIELDS: &[&str] = &[
    INSPECTION_DATE,
    PLANT,
    PLATE,
    REVISION_VALID_UNTIL,
    EMISSIONS_VALID_UNTIL,
    FOLIO,
];

const REVISION_SECTION: &str = "Revisión Técnica";
const EMISSIONS_SECTION: &str = "Emisiones Contaminantes";

/// CRT extractor.
pub struct InspectionExtractor;

impl DocumentExtractor for InspectionExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::TechnicalInspection
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        extract_inspection(text)
    }

    fn validate(&self, record: &ExtractedRecord, document_name: &str) -> ValidationOutcome {
        let rules = [
            (INSPECTION_DATE, FieldRule::Shape(&CRT_INSPECTION_DATE_SHAPE)),
            (PLATE, FieldRule::Shape(&CRT_PLATE_SHAPE)),
            (PLANT, FieldRule::Shape(&ANY_TEXT_SHAPE)),
            (REVISION_VALID_UNTIL, FieldRule::Shape(&CRT_VALID_UNTIL_SHAPE)),
            (EMISSIONS_VALID_UNTIL, FieldRule::Shape(&CRT_VALID_UNTIL_SHAPE)),
            (FOLIO, FieldRule::Shape(&CRT_FOLIO_SHAPE)),
        ];
        check_fields(record, &rules, document_name)
    }
}

/// Extract the CRT field set from text.
///
/// Fails when either certificate section is absent, or when a section has
/// no "VÁLIDO HASTA" value.
pub fn extract_inspection(text: &str) -> Result<ExtractedRecord> {
    let mut record = ExtractedRecord::new(DocumentFormat::TechnicalInspection);

    record.set(INSPECTION_DATE, find_or_empty(text, &CRT_INSPECTION_DATE));
    record.set(PLANT, find_or_empty(text, &CRT_PLANT));
    record.set(PLATE, find_or_empty(text, &CRT_PLATE));

    let revision = section(text, &CRT_REVISION_SECTION);
    let emissions = section(text, &CRT_EMISSIONS_SECTION);

    let (revision, emissions) = match (revision, emissions) {
        (Some(revision), Some(emissions)) => (revision, emissions),
        (revision, emissions) => {
            let missing: Vec<&str> = [
                (revision.is_none(), REVISION_SECTION),
                (emissions.is_none(), EMISSIONS_SECTION),
            ]
            .into_iter()
            .filter_map(|(absent, name)| absent.then_some(name))
            .collect();
            return Err(ExtractionError::MissingSection(missing.join(", ")));
        }
    };

    record.set(
        REVISION_VALID_UNTIL,
        valid_until(revision, REVISION_SECTION)?,
    );
    record.set(
        EMISSIONS_VALID_UNTIL,
        valid_until(emissions, EMISSIONS_SECTION)?,
    );

    record.set(FOLIO, find_or_empty(text, &CRT_FOLIO));

    debug!("Extracted CRT record: {:?}", record);
    Ok(record)
}

/// Body of a certificate section (group 1 of its pattern).
fn section<'t>(text: &'t str, pattern: &regex::Regex) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str())
}

/// The month-year validity of a section, falling back to a full date.
fn valid_until(section: &str, section_name: &str) -> Result<String> {
    let caps = CRT_VALID_UNTIL
        .captures(section)
        .ok_or_else(|| ExtractionError::MissingAnchor {
            section: section_name.to_string(),
            field: "VÁLIDO HASTA".to_string(),
        })?;

    let value = caps
        .get(2)
        .or_else(|| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();

    Ok(value.to_string())
}
