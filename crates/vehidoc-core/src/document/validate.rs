//! Field acceptance tests shared by the format validators.

use regex::Regex;
use tracing::debug;

use crate::error::{FieldError, FieldErrorKind};
use crate::models::record::{ExtractedRecord, ValidationOutcome};

/// Acceptance test for one field.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    /// Non-empty and matching the shape as-is.
    Shape(&'static Regex),
    /// Non-empty and matching the shape once surrounding whitespace is trimmed.
    TrimmedShape(&'static Regex),
    /// At least this many characters once trimmed.
    MinLength(usize),
    /// At least this many characters once trimmed, then matching the shape.
    MinLengthShape(usize, &'static Regex),
    /// One of a closed set of values, compared case-insensitively.
    OneOf(&'static [&'static str]),
}

impl FieldRule {
    fn check(self, field: &str, value: &str) -> Option<FieldErrorKind> {
        let malformed = || FieldErrorKind::Malformed {
            value: value.to_string(),
        };

        match self {
            Self::Shape(shape) => {
                if value.is_empty() {
                    Some(FieldErrorKind::Missing)
                } else if !shape.is_match(value) {
                    Some(malformed())
                } else {
                    None
                }
            }
            Self::TrimmedShape(shape) => {
                if value.is_empty() {
                    Some(FieldErrorKind::Missing)
                } else if !shape.is_match(value.trim()) {
                    Some(malformed())
                } else {
                    None
                }
            }
            Self::MinLength(min) => {
                (value.trim().chars().count() < min).then_some(FieldErrorKind::TooShort { min })
            }
            Self::MinLengthShape(min, shape) => {
                if value.trim().chars().count() < min {
                    Some(FieldErrorKind::TooShort { min })
                } else if !shape.is_match(value) {
                    Some(malformed())
                } else {
                    None
                }
            }
            Self::OneOf(allowed) => {
                if allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
                    None
                } else {
                    debug!("{} = {:?} is outside {:?}", field, value, allowed);
                    Some(FieldErrorKind::NotAllowed {
                        value: value.to_string(),
                    })
                }
            }
        }
    }
}

/// Run every rule against the record, collecting all violations.
pub fn check_fields(
    record: &ExtractedRecord,
    rules: &[(&'static str, FieldRule)],
    document_name: &str,
) -> ValidationOutcome {
    let errors: Vec<FieldError> = rules
        .iter()
        .filter_map(|(field, rule)| {
            let value = record.get(field).unwrap_or_default();
            match rule.check(field, value) {
                Some(kind) => {
                    debug!(document = document_name, "Validation: {} rejected ({:?})", field, kind);
                    Some(FieldError::new(*field, kind))
                }
                None => {
                    debug!(document = document_name, "Validation: {} = {:?} accepted", field, value);
                    None
                }
            }
        })
        .collect();

    ValidationOutcome::from_errors(errors)
}
