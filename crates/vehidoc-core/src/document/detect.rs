//! Keyword-based document format detection.

use tracing::debug;

use crate::models::record::DocumentFormat;

/// Trigger phrases per format, tested in this order; the first hit wins.
const TRIGGERS: &[(DocumentFormat, &[&str])] = &[
    (DocumentFormat::Homologation, &["CERTIFICADO DE HOMOLOGACIÓN"]),
    (
        DocumentFormat::TechnicalInspection,
        &["CERTIFICADO DE REVISIÓN TÉCNICA", "FECHA REVISIÓN"],
    ),
    (
        DocumentFormat::CompulsoryInsurance,
        &["SEGURO OBLIGATORIO", "SOAP"],
    ),
    (
        DocumentFormat::CirculationPermit,
        &["PERMISO DE CIRCULACIÓN", "PLACA ÚNICA"],
    ),
];

/// Classify raw document text.
///
/// Runs independently of the extractors: a document is classified even if
/// its fields later fail to extract.
pub fn detect_format(text: &str) -> DocumentFormat {
    let upper = text.to_uppercase();

    let format = TRIGGERS
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| upper.contains(phrase)))
        .map(|(format, _)| *format)
        .unwrap_or(DocumentFormat::Unknown);

    debug!("Detected document format: {:?}", format);
    format
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_format() {
        assert_eq!(
            detect_format("Certificado de Homologación individual"),
            DocumentFormat::Homologation
        );
        assert_eq!(
            detect_format("Fecha Revisión: 10 OCTUBRE 2023"),
            DocumentFormat::TechnicalInspection
        );
        assert_eq!(
            detect_format("Seguro Obligatorio de Accidentes Personales"),
            DocumentFormat::CompulsoryInsurance
        );
        assert_eq!(
            detect_format("Placa Única: ABC-123"),
            DocumentFormat::CirculationPermit
        );
    }

    #[test]
    fn test_priority_order() {
        // Homologation wins over any later trigger present in the same text.
        let text = "CERTIFICADO DE HOMOLOGACIÓN ... SEGURO OBLIGATORIO ... PLACA ÚNICA";
        assert_eq!(detect_format(text), DocumentFormat::Homologation);

        let text = "FECHA REVISIÓN ... SOAP";
        assert_eq!(detect_format(text), DocumentFormat::TechnicalInspection);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(detect_format("Factura electrónica"), DocumentFormat::Unknown);
        assert_eq!(detect_format(""), DocumentFormat::Unknown);
    }
}
