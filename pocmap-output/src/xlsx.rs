use rust_xlsxwriter::{Format, Workbook};

use crate::REPORT_HEADERS;
use crate::traits::{OutputError, OutputFormatter};
use pocmap_types::Finding;

/// Name of the single worksheet in the report workbook.
pub const RESULT_SHEET: &str = "Result";

/// Writes findings to a workbook with one header row.
pub struct XlsxFormatter;

impl OutputFormatter for XlsxFormatter {
    fn format(&self, findings: &[Finding]) -> Result<Vec<u8>, OutputError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(RESULT_SHEET)?;

        let header_format = Format::new().set_bold();
        for (col, header) in REPORT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }
        worksheet.set_column_width(0, 40)?;
        worksheet.set_column_width(1, 28)?;
        worksheet.set_column_width(2, 40)?;
        worksheet.set_column_width(3, 12)?;

        for (i, f) in findings.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_string(row, 0, &f.url)?;
            worksheet.write_string(row, 1, &f.check_id)?;
            worksheet.write_string(row, 2, &f.template)?;
            worksheet.write_string(row, 3, &f.severity)?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}
