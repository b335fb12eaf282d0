//! Workbook writing with rust_xlsxwriter.

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};

use super::sheet::DataSheet;
use crate::document::patterns::MARKUP_TAG;
use crate::models::config::ExportConfig;
use crate::models::stats::BatchRunStats;

pub const DATA_SHEET: &str = "Data";
pub const STATISTICS_SHEET: &str = "Statistics";

const NO_DATA: &str = "No data was found to build the spreadsheet.";
const SUCCESS_FILL: u32 = 0xC6EFCE;
const FAILURE_FILL: u32 = 0xFFC7CE;

/// Write the data sheet and, with `stats`, the statistics sheet.
pub fn write_workbook(
    sheet: &DataSheet,
    stats: Option<&BatchRunStats>,
    config: &ExportConfig,
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    workbook.push_worksheet(data_worksheet(sheet, config)?);
    if let Some(stats) = stats {
        workbook.push_worksheet(statistics_worksheet(stats)?);
    }

    workbook.save_to_buffer()
}

fn data_worksheet(sheet: &DataSheet, config: &ExportConfig) -> Result<Worksheet, XlsxError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(DATA_SHEET)?;

    if sheet.is_empty() {
        worksheet.write_string(0, 0, NO_DATA)?;
        return Ok(worksheet);
    }

    for (row, col, value) in data_cells(sheet) {
        worksheet.write_string(row, col, value)?;
    }

    for (col, width) in sheet.column_widths(config).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width)?;
    }
    for (row, height) in sheet.row_heights(config).into_iter().enumerate() {
        worksheet.set_row_height(row as u32 + 1, height)?;
    }

    Ok(worksheet)
}

/// Every data sheet cell as (row, column, text): headers on the first row,
/// record `n` on row `n + 1`.
fn data_cells(sheet: &DataSheet) -> impl Iterator<Item = (u32, u16, &str)> {
    let headers = sheet
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| (0, col as u16, header.as_str()));

    let rows = sheet.rows.iter().enumerate().flat_map(|(row, cells)| {
        cells
            .iter()
            .enumerate()
            .map(move |(col, value)| (row as u32 + 1, col as u16, value.as_str()))
    });

    headers.chain(rows)
}

fn statistics_worksheet(stats: &BatchRunStats) -> Result<Worksheet, XlsxError> {
    let bold = Format::new().set_bold();
    let success = Format::new().set_background_color(Color::RGB(SUCCESS_FILL));
    let failure = Format::new().set_background_color(Color::RGB(FAILURE_FILL));

    let mut worksheet = Worksheet::new();
    worksheet.set_name(STATISTICS_SHEET)?;

    worksheet.write_string_with_format(0, 0, "Conversion statistics", &bold)?;
    worksheet.write_string(2, 0, "Total processed:")?;
    worksheet.write_number(2, 1, stats.total() as f64)?;
    worksheet.write_string(3, 0, "Total succeeded:")?;
    worksheet.write_number_with_format(3, 1, stats.succeeded() as f64, &success)?;
    worksheet.write_string(4, 0, "Total failed:")?;
    worksheet.write_number_with_format(4, 1, stats.failed() as f64, &failure)?;

    worksheet.write_string_with_format(6, 0, "Failed files", &bold)?;
    worksheet.write_string(7, 0, "File name")?;
    worksheet.write_string(7, 1, "Error")?;

    for (offset, failed) in stats.failures().iter().enumerate() {
        let row = 8 + offset as u32;
        worksheet.write_string(row, 0, &failed.document_name)?;
        worksheet.write_string(row, 1, strip_markup(&failed.error))?;
    }

    worksheet.set_column_width(0, 30)?;
    worksheet.set_column_width(1, 80)?;

    Ok(worksheet)
}

/// Error messages go into cells as plain text.
pub fn strip_markup(message: &str) -> String {
    MARKUP_TAG.replace_all(message, "").into_owned()
}
