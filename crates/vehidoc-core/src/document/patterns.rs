//! Regex patterns for the four supported vehicle documents.
//!
//! Capture patterns pull a labeled value out of document text (group 1 is the
//! value). Shape patterns are anchored and decide whether a value is accepted.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Homologation certificate (Certificado de Homologación)
    pub static ref HOMOLOGATION_TITLE: Regex = Regex::new(
        r"(?i)CERTIFICADO DE HOMOLOGACIÓN\s+(.*?)\s+REEMPLAZA"
    ).unwrap();

    pub static ref HOMOLOGATION_ISSUE_DATE: Regex = Regex::new(
        r"(?i)FECHA DE EMISIÓN\s+([0-9A-Z/]+)"
    ).unwrap();

    pub static ref HOMOLOGATION_SERIAL: Regex = Regex::new(
        r"(?i)N[°º]\s*CORRELATIVO\s+([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref HOMOLOGATION_REPORT_CODE: Regex = Regex::new(
        r"(?i)CÓDIGO DE INFORME TÉCNICO\s+([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref HOMOLOGATION_PLATE: Regex = Regex::new(
        r"(?i)PATENTE\s+([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref HOMOLOGATION_VALID_UNTIL: Regex = Regex::new(
        r"(?i)VÁLIDO HASTA\s+([0-9A-Z/]+)"
    ).unwrap();

    pub static ref HOMOLOGATION_VEHICLE_TYPE: Regex = Regex::new(
        r"(?i)TIPO DE VEHÍCULO\s+([A-ZÑ]+)"
    ).unwrap();

    pub static ref HOMOLOGATION_MAKE: Regex = Regex::new(
        r"(?i)MARCA\s+([A-Z]+)"
    ).unwrap();

    pub static ref HOMOLOGATION_YEAR: Regex = Regex::new(
        r"(?i)AÑO\s+([0-9]{4})"
    ).unwrap();

    pub static ref HOMOLOGATION_MODEL: Regex = Regex::new(
        r"(?i)MODELO\s+(.+?)[ \t]+COLOR"
    ).unwrap();

    // The value ends before a standalone VIN label or at end of text.
    pub static ref HOMOLOGATION_COLOR: Regex = Regex::new(
        r"(?i)COLOR\s+([A-Z\s()0-9.\-]+?)(?:\s+VIN\b|$)"
    ).unwrap();

    pub static ref HOMOLOGATION_VIN: Regex = Regex::new(
        r"(?i)VIN\s+([A-Z0-9]+)"
    ).unwrap();

    pub static ref HOMOLOGATION_ENGINE: Regex = Regex::new(
        r"(?i)N[°º]\s*MOTOR\s+([A-Z0-9]+(?:\s+[A-Z0-9]+)?)"
    ).unwrap();

    // Layout residue that sticks to the engine number.
    pub static ref HOMOLOGATION_ENGINE_ARTIFACT: Regex = Regex::new(
        r"(?i)\s+(?:C|El)$"
    ).unwrap();

    pub static ref HOMOLOGATION_SIGNATORY: Regex = Regex::new(
        r"(?i)Firmado por:\s+(.+?)(?:\s+AUDITORÍA|\r?\n|$)"
    ).unwrap();

    pub static ref SIGNATURE_DATE: Regex = Regex::new(
        r"\d{2}/\d{2}/\d{4}"
    ).unwrap();

    pub static ref HOMOLOGATION_ISSUE_DATE_SHAPE: Regex = Regex::new(
        r"^\d{1,2}/[A-Z]{3}/\d{4}$"
    ).unwrap();

    pub static ref HOMOLOGATION_CODE_SHAPE: Regex = Regex::new(
        r"^[A-Z0-9\-]+$"
    ).unwrap();

    pub static ref HOMOLOGATION_PLATE_SHAPE: Regex = Regex::new(
        r"(?i)^[A-Z0-9]{6}$"
    ).unwrap();

    pub static ref HOMOLOGATION_VALID_UNTIL_SHAPE: Regex = Regex::new(
        r"^[A-Z]{3}/\d{4}$"
    ).unwrap();

    pub static ref HOMOLOGATION_VEHICLE_TYPE_SHAPE: Regex = Regex::new(
        r"^[A-ZÑ]+$"
    ).unwrap();

    pub static ref HOMOLOGATION_MAKE_SHAPE: Regex = Regex::new(
        r"^[A-Z]+$"
    ).unwrap();

    pub static ref HOMOLOGATION_COLOR_SHAPE: Regex = Regex::new(
        r"^[A-Z\s()0-9.\-]+\.?$"
    ).unwrap();

    pub static ref HOMOLOGATION_YEAR_SHAPE: Regex = Regex::new(
        r"^\d{4}$"
    ).unwrap();

    pub static ref HOMOLOGATION_VIN_SHAPE: Regex = Regex::new(
        r"^[A-Z0-9]+$"
    ).unwrap();

    pub static ref HOMOLOGATION_ENGINE_SHAPE: Regex = Regex::new(
        r"^[A-Z0-9 ]+(?:\s*[A-Za-z]+)?$"
    ).unwrap();

    // Technical inspection certificate (CRT)
    pub static ref CRT_INSPECTION_DATE: Regex = Regex::new(
        r"(?i)FECHA REVISIÓN:\s*(\d{1,2}\s+[A-ZÁÉÍÓÚÑ]+\s+\d{4})"
    ).unwrap();

    pub static ref CRT_PLANT: Regex = Regex::new(
        r"(?i)PLANTA:\s*([A-Z0-9-]+)"
    ).unwrap();

    pub static ref CRT_PLATE: Regex = Regex::new(
        r"(?i)PLACA PATENTE\s+([A-Z0-9]+)"
    ).unwrap();

    // Revision section: from its title up to the emissions title or end of text.
    pub static ref CRT_REVISION_SECTION: Regex = Regex::new(
        r"(?i)CERTIFICADO\s+(?:DE\s+)?REVISI[ÓO]N\s+T[EÉ]CNICA([\s\S]*?)(?:CERTIFICADO\s+(?:DE\s+)?(?:EMISIONES\s+)?CONTAMINANTES|$)"
    ).unwrap();

    // Emissions section: from its title up to the next certificate or end of text.
    pub static ref CRT_EMISSIONS_SECTION: Regex = Regex::new(
        r"(?i)CERTIFICADO\s+(?:DE\s+)?(?:EMISIONES\s+)?CONTAMINANTES([\s\S]*?)(?:CERTIFICADO\s|$)"
    ).unwrap();

    // Group 2 is the month-year; group 1 catches a leading full date.
    pub static ref CRT_VALID_UNTIL: Regex = Regex::new(
        r"(?i)VÁLIDO HASTA(?:\s*FECHA REVISIÓN:)?\s*(?:(\d{1,2}\s+[A-ZÁÉÍÓÚÑ]+\s+\d{4})\s+)?([A-ZÁÉÍÓÚÑ]+\s+\d{4})"
    ).unwrap();

    pub static ref CRT_FOLIO: Regex = Regex::new(
        r"(?i)(N°B\d+)"
    ).unwrap();

    pub static ref CRT_INSPECTION_DATE_SHAPE: Regex = Regex::new(
        r"^\d{1,2}\s+[A-ZÁÉÍÓÚÑ]+\s+\d{4}$"
    ).unwrap();

    pub static ref CRT_PLATE_SHAPE: Regex = Regex::new(
        r"^[A-Z0-9]+$"
    ).unwrap();

    pub static ref CRT_VALID_UNTIL_SHAPE: Regex = Regex::new(
        r"(?i)^[A-ZÁÉÍÓÚÑ]+\s+\d{4}$"
    ).unwrap();

    pub static ref CRT_FOLIO_SHAPE: Regex = Regex::new(
        r"(?i)^N°B\d+$"
    ).unwrap();

    // Compulsory insurance (SOAP)
    pub static ref SOAP_INSCRIPTION: Regex = Regex::new(
        r"(?i)INSCRIPC[ÍI]ON\s*R\s*\.?\s*V\s*\.?\s*M\s*\.?\s*(?::|\-)?\s*([A-Z0-9]+\s*-\s*[A-Z0-9]+)"
    ).unwrap();

    pub static ref SOAP_CODE: Regex = Regex::new(
        r"(?i)Bajo\s+el\s+c[óo]digo\s*[:\-]?\s*([A-Z0-9\-]+)"
    ).unwrap();

    // Group 1 is the number (dotted or plain), group 2 the check character.
    pub static ref SOAP_RUT: Regex = Regex::new(
        r"(?i)RUT\s*[:\-]?\s*((?:\d{1,3}(?:\.\d{3})+)|\d{7,8})\s*-\s*([0-9kK])"
    ).unwrap();

    pub static ref SOAP_VALID_FROM: Regex = Regex::new(
        r"(?i)RIGE\s+DESDE\s*[:\-]?\s*(\d{2}[-/]\d{2}[-/]\d{4})"
    ).unwrap();

    pub static ref SOAP_VALID_TO: Regex = Regex::new(
        r"(?i)HAST(?:\s*A)?\s*[:\-]?\s*(\d{2}[-/]\d{2}[-/]\d{4})"
    ).unwrap();

    pub static ref SOAP_POLICY: Regex = Regex::new(
        r"(?i)POLI[ZS]A\s*N[°º]?\s*[:\-]?\s*([A-Z0-9]+\s*-\s*[A-Z0-9]+)"
    ).unwrap();

    pub static ref SOAP_PREMIUM: Regex = Regex::new(
        r"(?i)PRIMA\s*[:\-]?\s*([\d.]+)"
    ).unwrap();

    pub static ref HYPHEN_SPACING: Regex = Regex::new(
        r"\s*-\s*"
    ).unwrap();

    pub static ref SOAP_INSCRIPTION_SHAPE: Regex = Regex::new(
        r"(?i)^[A-Z0-9]{6,}\s*-\s*[A-Z0-9]$"
    ).unwrap();

    pub static ref SOAP_CODE_SHAPE: Regex = Regex::new(
        r"^[A-Z0-9\-]+$"
    ).unwrap();

    pub static ref SOAP_RUT_SHAPE: Regex = Regex::new(
        r"^(?:\d{7,8}|(?:\d{1,3}(?:\.\d{3})+))-[0-9kK]$"
    ).unwrap();

    pub static ref SOAP_DATE_SHAPE: Regex = Regex::new(
        r"^\d{2}[-/]\d{2}[-/]\d{4}$"
    ).unwrap();

    pub static ref SOAP_POLICY_SHAPE: Regex = Regex::new(
        r"(?i)^\d{6,9}-[A-Z0-9]$"
    ).unwrap();

    pub static ref SOAP_PREMIUM_SHAPE: Regex = Regex::new(
        r"^[\d.]+$"
    ).unwrap();

    // Circulation permit (Permiso de Circulación)
    pub static ref PERMIT_PLATE: Regex = Regex::new(
        r"(?i)Placa\s+Única\s*[:\-]?\s*([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref PERMIT_SII_CODE: Regex = Regex::new(
        r"(?i)Codigo\s+SII\s*[:\-]?\s*([A-Z0-9]+)"
    ).unwrap();

    pub static ref PERMIT_VALUE: Regex = Regex::new(
        r"(?i)Valor\s+Permiso\s*[:\-]?\s*(\d+)"
    ).unwrap();

    // Payment marks capture "X" when ticked and nothing otherwise.
    pub static ref PERMIT_PAID_IN_FULL: Regex = Regex::new(
        r"(?i)Pago\s+total\s*[:\-]?\s*(X)?"
    ).unwrap();

    pub static ref PERMIT_INSTALLMENT_1: Regex = Regex::new(
        r"(?i)Pago\s+cuota\s+1\s*[:\-]?\s*(X)?"
    ).unwrap();

    pub static ref PERMIT_INSTALLMENT_2: Regex = Regex::new(
        r"(?i)Pago\s+cuota\s+2\s*[:\-]?\s*(X)?"
    ).unwrap();

    pub static ref PERMIT_TOTAL_DUE: Regex = Regex::new(
        r"(?i)Total\s+a\s+pagar\s*[:\-]?\s*(\d+)"
    ).unwrap();

    pub static ref PERMIT_ISSUE_DATE: Regex = Regex::new(
        r"(?i)Fecha(?:\s+de)?\s+emisi[oó]n\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref PERMIT_EXPIRY_DATE: Regex = Regex::new(
        r"(?i)Fecha(?:\s+de)?\s+vencimiento\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    // `\w` is Unicode-aware here, so accented words such as "Débito" are kept whole.
    pub static ref PERMIT_PAYMENT_METHOD: Regex = Regex::new(
        r"(?i)Forma\s+de\s+Pago\s*[:\-]?\s*(\w+)"
    ).unwrap();

    // Any non-empty single-line value.
    pub static ref ANY_TEXT_SHAPE: Regex = Regex::new(
        r"^.+$"
    ).unwrap();

    // Markup stripped from error messages before they reach a spreadsheet.
    pub static ref MARKUP_TAG: Regex = Regex::new(
        r"<[^>]*>"
    ).unwrap();
}
