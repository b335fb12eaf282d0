//! The "Data" sheet as plain headers and rows, before any spreadsheet
//! writing happens.

use crate::document::normalize::{compact_identifier, split_at_char};
use crate::document::{homologation, insurance, permit};
use crate::models::config::ExportConfig;
use crate::models::record::{DocumentFormat, ProcessedDocument};

/// Header of the document name column.
pub const NAME_HEADER: &str = "Nombre PDF";

/// Header of the check digit split off a plate or inscription.
pub const CHECK_DIGIT_HEADER: &str = "digito verificador";

const PLATE_LENGTH: usize = 6;

/// Candidates for the primary identifier column when no format is known.
const PRIMARY_CANDIDATES: &[&str] = &[homologation::PLATE, permit::PLATE, insurance::INSCRIPTION];

/// Column headers plus one row of cells per accepted document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One document's cells in column order, before headers are merged.
struct OrderedRow {
    primary: Option<(&'static str, String)>,
    check_digit: Option<String>,
    rest: Vec<(&'static str, String)>,
}

impl DataSheet {
    /// Lay out accepted documents.
    ///
    /// Columns are the document name, the primary identifier (and its check
    /// digit when any row has one), then every other field in first-seen
    /// order. `hint` picks how the primary identifier is derived.
    pub fn build(records: &[ProcessedDocument], hint: Option<DocumentFormat>) -> Self {
        let ordered: Vec<(String, OrderedRow)> = records
            .iter()
            .map(|doc| (doc.document_name.clone(), order_record(doc, hint)))
            .collect();

        let with_check_digit = ordered.iter().any(|(_, row)| row.check_digit.is_some());

        let mut headers: Vec<String> = vec![NAME_HEADER.to_string()];
        let mut keyed_rows: Vec<Vec<(String, String)>> = Vec::with_capacity(ordered.len());

        for (name, row) in ordered {
            let mut cells = vec![(NAME_HEADER.to_string(), name)];
            if let Some((key, value)) = row.primary {
                cells.push((key.to_string(), value));
                if with_check_digit {
                    cells.push((
                        CHECK_DIGIT_HEADER.to_string(),
                        row.check_digit.unwrap_or_default(),
                    ));
                }
            }
            cells.extend(row.rest.into_iter().map(|(key, value)| (key.to_string(), value)));

            for (key, _) in &cells {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
            keyed_rows.push(cells);
        }

        let rows = keyed_rows
            .into_iter()
            .map(|cells| {
                headers
                    .iter()
                    .map(|header| {
                        cells
                            .iter()
                            .find(|(key, _)| key == header)
                            .map(|(_, value)| value.clone())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width per column from its longest cell, header included.
    pub fn column_widths(&self, config: &ExportConfig) -> Vec<f64> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                (longest as f64 * config.column_width_factor).max(config.min_column_width)
            })
            .collect()
    }

    /// Height per data row, from how many lines its first cell wraps to.
    pub fn row_heights(&self, config: &ExportConfig) -> Vec<f64> {
        let per_line = config.chars_per_line.max(1);
        self.rows
            .iter()
            .map(|row| {
                let length = row.first().map(|cell| cell.chars().count()).unwrap_or(0);
                let lines = length.div_ceil(per_line).max(1);
                config.base_row_height * lines as f64
            })
            .collect()
    }
}

fn order_record(doc: &ProcessedDocument, hint: Option<DocumentFormat>) -> OrderedRow {
    let primary_key = match hint {
        Some(DocumentFormat::Homologation) => Some(homologation::PLATE),
        Some(DocumentFormat::CirculationPermit) => Some(permit::PLATE),
        Some(DocumentFormat::CompulsoryInsurance) => Some(insurance::INSCRIPTION),
        _ => PRIMARY_CANDIDATES
            .iter()
            .copied()
            .find(|key| doc.record.get(key).is_some()),
    };

    let mut primary = None;
    let mut check_digit = None;
    if let Some(key) = primary_key {
        if let Some(value) = doc.record.get(key) {
            let (plate, check) = split_identifier(value, key, hint);
            primary = Some((key, plate));
            check_digit = check;
        }
    }

    let rest = doc
        .record
        .iter()
        .filter(|(key, _)| Some(*key) != primary_key)
        .map(|(key, value)| (key, value.to_string()))
        .collect();

    OrderedRow {
        primary,
        check_digit,
        rest,
    }
}

/// Separate a plate-like identifier from its check digit.
fn split_identifier(
    value: &str,
    key: &str,
    hint: Option<DocumentFormat>,
) -> (String, Option<String>) {
    match hint {
        Some(DocumentFormat::Homologation) => (value.replace('-', "").trim().to_string(), None),
        Some(DocumentFormat::CirculationPermit) | Some(DocumentFormat::CompulsoryInsurance) => {
            plate_with_check(&compact_identifier(value))
        }
        _ if PRIMARY_CANDIDATES.contains(&key) && value.contains('-') => {
            plate_with_check(value.replace('-', "").trim())
        }
        _ => (value.to_string(), None),
    }
}

/// First six characters are the plate, anything left is the check digit.
fn plate_with_check(compact: &str) -> (String, Option<String>) {
    let (plate, rest) = split_at_char(compact, PLATE_LENGTH);
    let check = (!rest.is_empty()).then_some(rest);
    (plate, check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ExtractedRecord;
    use pretty_assertions::assert_eq;

    fn processed(name: &str, format: DocumentFormat, values: &[(&str, &str)]) -> ProcessedDocument {
        let mut record = ExtractedRecord::new(format);
        for (field, value) in values {
            record.set(field, *value);
        }
        ProcessedDocument {
            document_name: name.to_string(),
            format,
            record,
            title: None,
        }
    }

    #[test]
    fn test_first_row_follows_declared_order() {
        let crt = processed(
            "crt.pdf",
            DocumentFormat::TechnicalInspection,
            &[("Fecha de Revisión", "10 OCTUBRE 2023"), ("Folio", "N°B1")],
        );

        let sheet = DataSheet::build(&[crt], Some(DocumentFormat::TechnicalInspection));

        let mut expected_headers = vec![NAME_HEADER];
        expected_headers.extend(DocumentFormat::TechnicalInspection.fields());
        assert_eq!(sheet.headers, expected_headers);
        assert_eq!(
            sheet.rows[0],
            vec!["crt.pdf", "10 OCTUBRE 2023", "", "", "", "", "N°B1"]
        );
    }

    #[test]
    fn test_insurance_inscription_split() {
        let with_check = processed(
            "a.pdf",
            DocumentFormat::CompulsoryInsurance,
            &[("INSCRIPCION R.V.M", "LXWJ75 - 4"), ("RUT", "97006000-6")],
        );
        let without_check = processed(
            "b.pdf",
            DocumentFormat::CompulsoryInsurance,
            &[("INSCRIPCION R.V.M", "THJL54"), ("RUT", "12345678-9")],
        );

        let sheet = DataSheet::build(
            &[with_check, without_check],
            Some(DocumentFormat::CompulsoryInsurance),
        );

        assert_eq!(&sheet.headers[..4], &[NAME_HEADER, "INSCRIPCION R.V.M", CHECK_DIGIT_HEADER, "Bajo el codigo"]);
        assert_eq!(&sheet.rows[0][..3], &["a.pdf", "LXWJ75", "4"]);
        assert_eq!(&sheet.rows[1][..3], &["b.pdf", "THJL54", ""]);
    }

    #[test]
    fn test_homologation_plate_has_no_check_digit() {
        let doc = processed(
            "h.pdf",
            DocumentFormat::Homologation,
            &[("Patente", "LXWJ-75")],
        );
        let sheet = DataSheet::build(&[doc], Some(DocumentFormat::Homologation));

        assert_eq!(&sheet.headers[..2], &[NAME_HEADER, "Patente"]);
        assert!(!sheet.headers.iter().any(|h| h == CHECK_DIGIT_HEADER));
        assert_eq!(sheet.rows[0][1], "LXWJ75");
    }

    #[test]
    fn test_fallback_without_hint() {
        let permit = processed(
            "p.pdf",
            DocumentFormat::CirculationPermit,
            &[("Placa Única", "ABCD-12-3")],
        );
        let crt = processed(
            "c.pdf",
            DocumentFormat::TechnicalInspection,
            &[("Placa Patente", "ABCD12")],
        );

        let sheet = DataSheet::build(&[permit, crt], None);

        assert_eq!(&sheet.headers[..3], &[NAME_HEADER, "Placa Única", CHECK_DIGIT_HEADER]);
        assert_eq!(&sheet.rows[0][..3], &["p.pdf", "ABCD12", "3"]);

        // Mixed formats: the inspection row leaves the permit columns empty.
        let plate_col = sheet.headers.iter().position(|h| h == "Placa Patente").unwrap();
        assert_eq!(sheet.rows[1][1], "");
        assert_eq!(sheet.rows[1][plate_col], "ABCD12");
    }

    #[test]
    fn test_widths_and_heights() {
        let doc = processed(
            "a_very_long_document_name_for_wrapping.pdf",
            DocumentFormat::TechnicalInspection,
            &[("Planta", "AB")],
        );
        let sheet = DataSheet::build(&[doc], None);
        let config = ExportConfig::default();

        let widths = sheet.column_widths(&config);
        assert_eq!(widths.len(), sheet.headers.len());
        assert!((widths[0] - 42.0 * 1.2).abs() < 1e-9);
        let planta = sheet.headers.iter().position(|h| h == "Planta").unwrap();
        assert_eq!(widths[planta], 10.0);

        assert_eq!(sheet.row_heights(&config), vec![45.0]);
    }
}
