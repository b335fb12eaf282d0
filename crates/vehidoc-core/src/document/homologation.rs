//! Homologation certificate (Certificado de Homologación) extraction.

use tracing::debug;

use super::matcher::{find_field, find_or_empty};
use super::normalize::{compact_identifier, split_at_char};
use super::patterns::*;
use super::validate::{FieldRule, check_fields};
use super::{DocumentExtractor, Result};
use crate::models::record::{DocumentFormat, ExtractedRecord, ValidationOutcome};

pub const ISSUE_DATE: &str = "Fecha de Emisión";
pub const SERIAL_NUMBER: &str = "Nº Correlativo";
pub const REPORT_CODE: &str = "Código Informe Técnico";
pub const PLATE: &str = "Patente";
pub const VALID_UNTIL: &str = "Válido Hasta";
pub const VEHICLE_TYPE: &str = "Tipo de Vehículo";
pub const MAKE: &str = "Marca";
pub const YEAR: &str = "Año";
pub const MODEL: &str = "Modelo";
pub const COLOR: &str = "Color";
pub const VIN: &str = "VIN";
pub const ENGINE_NUMBER: &str = "Nº Motor";
pub const SIGNED_BY: &str = "Firmado por";

/// Fields in export order.
pub const FIELDS: &[&str] = &[
    ISSUE_DATE,
    SERIAL_NUMBER,
    REPORT_CODE,
    PLATE,
    VALID_UNTIL,
    VEHICLE_TYPE,
    MAKE,
    YEAR,
    MODEL,
    COLOR,
    VIN,
    ENGINE_NUMBER,
    SIGNED_BY,
];

/// Plates are six characters; anything after that is the check digit.
const PLATE_LENGTH: usize = 6;

/// Homologation certificate extractor.
pub struct HomologationExtractor;

impl DocumentExtractor for HomologationExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Homologation
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        Ok(extract_homologation(text))
    }

    fn validate(&self, record: &ExtractedRecord, document_name: &str) -> ValidationOutcome {
        let rules = [
            (ISSUE_DATE, FieldRule::TrimmedShape(&HOMOLOGATION_ISSUE_DATE_SHAPE)),
            (SERIAL_NUMBER, FieldRule::TrimmedShape(&HOMOLOGATION_CODE_SHAPE)),
            (REPORT_CODE, FieldRule::TrimmedShape(&HOMOLOGATION_CODE_SHAPE)),
            (PLATE, FieldRule::TrimmedShape(&HOMOLOGATION_PLATE_SHAPE)),
            (VALID_UNTIL, FieldRule::TrimmedShape(&HOMOLOGATION_VALID_UNTIL_SHAPE)),
            (VEHICLE_TYPE, FieldRule::TrimmedShape(&HOMOLOGATION_VEHICLE_TYPE_SHAPE)),
            (MAKE, FieldRule::TrimmedShape(&HOMOLOGATION_MAKE_SHAPE)),
            (YEAR, FieldRule::TrimmedShape(&HOMOLOGATION_YEAR_SHAPE)),
            (MODEL, FieldRule::TrimmedShape(&ANY_TEXT_SHAPE)),
            (COLOR, FieldRule::TrimmedShape(&HOMOLOGATION_COLOR_SHAPE)),
            (VIN, FieldRule::TrimmedShape(&HOMOLOGATION_VIN_SHAPE)),
            (ENGINE_NUMBER, FieldRule::TrimmedShape(&HOMOLOGATION_ENGINE_SHAPE)),
            (SIGNED_BY, FieldRule::TrimmedShape(&ANY_TEXT_SHAPE)),
        ];
        check_fields(record, &rules, document_name)
    }

    fn title(&self, text: &str) -> Option<String> {
        find_field(text, &HOMOLOGATION_TITLE)
    }
}

/// Extract the homologation field set from text.
pub fn extract_homologation(text: &str) -> ExtractedRecord {
    let mut record = ExtractedRecord::new(DocumentFormat::Homologation);

    record.set(ISSUE_DATE, find_or_empty(text, &HOMOLOGATION_ISSUE_DATE));
    record.set(SERIAL_NUMBER, find_or_empty(text, &HOMOLOGATION_SERIAL));
    record.set(REPORT_CODE, find_or_empty(text, &HOMOLOGATION_REPORT_CODE));
    record.set(PLATE, normalize_plate(&find_or_empty(text, &HOMOLOGATION_PLATE)));
    record.set(VALID_UNTIL, find_or_empty(text, &HOMOLOGATION_VALID_UNTIL));
    record.set(VEHICLE_TYPE, find_or_empty(text, &HOMOLOGATION_VEHICLE_TYPE));
    record.set(MAKE, find_or_empty(text, &HOMOLOGATION_MAKE));
    record.set(YEAR, find_or_empty(text, &HOMOLOGATION_YEAR));
    record.set(MODEL, find_or_empty(text, &HOMOLOGATION_MODEL));
    record.set(COLOR, find_or_empty(text, &HOMOLOGATION_COLOR));
    record.set(VIN, find_or_empty(text, &HOMOLOGATION_VIN));
    record.set(ENGINE_NUMBER, clean_engine_number(&find_or_empty(text, &HOMOLOGATION_ENGINE)));
    record.set(SIGNED_BY, clean_signatory(&find_or_empty(text, &HOMOLOGATION_SIGNATORY)));

    debug!("Extracted homologation record: {:?}", record);
    record
}

/// Drop hyphens and spaces and keep the first six characters.
fn normalize_plate(value: &str) -> String {
    let compact = compact_identifier(value);
    split_at_char(&compact, PLATE_LENGTH).0
}

/// Remove a trailing layout artifact (`C`, `El`) from the engine number.
fn clean_engine_number(value: &str) -> String {
    HOMOLOGATION_ENGINE_ARTIFACT
        .replace(value, "")
        .trim()
        .to_string()
}

/// Cut the signatory name at the first embedded date.
fn clean_signatory(value: &str) -> String {
    SIGNATURE_DATE
        .split(value)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
