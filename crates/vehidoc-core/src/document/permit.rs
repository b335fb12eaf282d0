//! Circulation permit (Permiso de Circulación) extraction.

use tracing::debug;

use super::matcher::find_or_empty;
use super::normalize::collapse_line_breaks;
use super::patterns::*;
use super::validate::{FieldRule, check_fields};
use super::{DocumentExtractor, Result};
use crate::models::record::{DocumentFormat, ExtractedRecord, ValidationOutcome};

pub const PLATE: &str = "Placa Única";
pub const SII_CODE: &str = "Código SII";
pub const PERMIT_AMOUNT: &str = "Valor Permiso";
pub const PAID_IN_FULL: &str = "Pago total";
pub const INSTALLMENT_1: &str = "Pago Cuota 1";
pub const INSTALLMENT_2: &str = "Pago Cuota 2";
pub const TOTAL_DUE: &str = "Total a pagar";
pub const ISSUE_DATE: &str = "Fecha de emisión";
pub const EXPIRY_DATE: &str = "Fecha de vencimiento";
pub const PAYMENT_METHOD: &str = "Forma de Pago";

/// Fields in export order.
pub const FIELDS: &[&str] = &[
    PLATE,
    SII_CODE,
    PERMIT_AMOUNT,
    PAID_IN_FULL,
    INSTALLMENT_1,
    INSTALLMENT_2,
    TOTAL_DUE,
    ISSUE_DATE,
    EXPIRY_DATE,
    PAYMENT_METHOD,
];

/// Payment marks: ticked or not applicable.
const PAYMENT_FIELDS: &[&str] = &[PAID_IN_FULL, INSTALLMENT_1, INSTALLMENT_2];

/// Value recorded for a payment mark that is not ticked.
pub const NOT_APPLICABLE: &str = "No aplica";

const PAYMENT_VALUES: &[&str] = &["X", NOT_APPLICABLE];

const MIN_FIELD_LENGTH: usize = 3;

/// Circulation permit extractor.
pub struct PermitExtractor;

impl DocumentExtractor for PermitExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::CirculationPermit
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        Ok(extract_permit(text))
    }

    fn validate(&self, record: &ExtractedRecord, document_name: &str) -> ValidationOutcome {
        let mandatory = [
            PLATE,
            SII_CODE,
            PERMIT_AMOUNT,
            TOTAL_DUE,
            ISSUE_DATE,
            EXPIRY_DATE,
            PAYMENT_METHOD,
        ]
        .into_iter()
        .map(|field| (field, FieldRule::MinLength(MIN_FIELD_LENGTH)));

        let payments = PAYMENT_FIELDS
            .iter()
            .map(|field| (*field, FieldRule::OneOf(PAYMENT_VALUES)));

        let rules: Vec<(&'static str, FieldRule)> = mandatory.chain(payments).collect();
        check_fields(record, &rules, document_name)
    }
}

/// Extract the permit field set from text.
///
/// Unticked payment marks become "No aplica"; other absent fields stay empty.
pub fn extract_permit(text: &str) -> ExtractedRecord {
    let text = collapse_line_breaks(text);
    let mut record = ExtractedRecord::new(DocumentFormat::CirculationPermit);

    let patterns: [(&str, &regex::Regex); 10] = [
        (PLATE, &PERMIT_PLATE),
        (SII_CODE, &PERMIT_SII_CODE),
        (PERMIT_AMOUNT, &PERMIT_VALUE),
        (PAID_IN_FULL, &PERMIT_PAID_IN_FULL),
        (INSTALLMENT_1, &PERMIT_INSTALLMENT_1),
        (INSTALLMENT_2, &PERMIT_INSTALLMENT_2),
        (TOTAL_DUE, &PERMIT_TOTAL_DUE),
        (ISSUE_DATE, &PERMIT_ISSUE_DATE),
        (EXPIRY_DATE, &PERMIT_EXPIRY_DATE),
        (PAYMENT_METHOD, &PERMIT_PAYMENT_METHOD),
    ];

    for (field, pattern) in patterns {
        let value = find_or_empty(&text, pattern);
        if value.is_empty() && PAYMENT_FIELDS.contains(&field) {
            record.set(field, NOT_APPLICABLE);
        } else {
            record.set(field, value);
        }
    }

    debug!("Extracted permit record: {:?}", record);
    record
}
