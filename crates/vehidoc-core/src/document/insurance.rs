//! Compulsory insurance (SOAP) extraction.

use regex::Regex;
use tracing::debug;

use super::matcher::find_or_empty;
use super::normalize::{collapse_line_breaks, strip_separators, tighten_hyphen};
use super::patterns::*;
use super::validate::{FieldRule, check_fields};
use super::{DocumentExtractor, Result};
use crate::models::record::{DocumentFormat, ExtractedRecord, ValidationOutcome};

pub const INSCRIPTION: &str = "INSCRIPCION R.V.M";
pub const CODE: &str = "Bajo el codigo";
pub const RUT: &str = "RUT";
pub const VALID_FROM: &str = "RIGE DESDE";
pub const VALID_TO: &str = "HASTA";
pub const POLICY_NUMBER: &str = "POLIZA N°";
pub const PREMIUM: &str = "PRIMA";

/// Fields in export order.
pub const FIELDS: &[&str] = &[
    INSCRIPTION,
    CODE,
    RUT,
    VALID_FROM,
    VALID_TO,
    POLICY_NUMBER,
    PREMIUM,
];

const MIN_FIELD_LENGTH: usize = 3;

/// SOAP extractor.
pub struct InsuranceExtractor;

impl DocumentExtractor for InsuranceExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::CompulsoryInsurance
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        Ok(extract_insurance(text))
    }

    fn validate(&self, record: &ExtractedRecord, document_name: &str) -> ValidationOutcome {
        let rule = |shape: &'static Regex| FieldRule::MinLengthShape(MIN_FIELD_LENGTH, shape);
        let rules = [
            (INSCRIPTION, rule(&SOAP_INSCRIPTION_SHAPE)),
            (CODE, rule(&SOAP_CODE_SHAPE)),
            (RUT, rule(&SOAP_RUT_SHAPE)),
            (VALID_FROM, rule(&SOAP_DATE_SHAPE)),
            (VALID_TO, rule(&SOAP_DATE_SHAPE)),
            (POLICY_NUMBER, rule(&SOAP_POLICY_SHAPE)),
            (PREMIUM, rule(&SOAP_PREMIUM_SHAPE)),
        ];
        check_fields(record, &rules, document_name)
    }
}

/// Extract the SOAP field set from text.
///
/// Line breaks are flattened first since labels and values are often split
/// across lines in these documents.
pub fn extract_insurance(text: &str) -> ExtractedRecord {
    let text = collapse_line_breaks(text);
    let mut record = ExtractedRecord::new(DocumentFormat::CompulsoryInsurance);

    record.set(INSCRIPTION, find_or_empty(&text, &SOAP_INSCRIPTION));
    record.set(CODE, find_or_empty(&text, &SOAP_CODE));
    record.set(RUT, extract_rut(&text));
    record.set(VALID_FROM, find_or_empty(&text, &SOAP_VALID_FROM));
    record.set(VALID_TO, find_or_empty(&text, &SOAP_VALID_TO));
    record.set(POLICY_NUMBER, tighten_hyphen(&find_or_empty(&text, &SOAP_POLICY)));
    record.set(PREMIUM, find_or_empty(&text, &SOAP_PREMIUM));

    debug!("Extracted SOAP record: {:?}", record);
    record
}

/// RUT as `<digits>-<check>`, with thousands separators removed.
fn extract_rut(text: &str) -> String {
    SOAP_RUT
        .captures(text)
        .and_then(|caps| {
            let number = caps.get(1)?.as_str();
            let check = caps.get(2)?.as_str();
            Some(format!("{}-{}", strip_separators(number, &['.', ' ']), check))
        })
        .unwrap_or_default()
}
