use std::path::Path;

use calamine::{Reader, open_workbook_auto};

use crate::traits::OutputError;

/// Sheet read when none is configured.
pub const DEFAULT_INPUT_SHEET: &str = "Sheet1";

/// Read every row of `sheet` as strings, starting at the first row of the
/// sheet. Leading empty rows and columns are preserved as blank cells and
/// trailing blank cells are dropped from each row.
pub fn read_table(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>, OutputError> {
    if !path.is_file() {
        return Err(OutputError::MissingInput(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(OutputError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        });
    }
    let range = workbook.worksheet_range(sheet)?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for cells in range.rows() {
        let mut row: Vec<String> = vec![String::new(); start_col as usize];
        row.extend(cells.iter().map(|c| c.to_string().trim().to_string()));
        while row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }
        rows.push(row);
    }

    tracing::debug!(path = %path.display(), sheet, rows = rows.len(), "read input table");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_sheet(path: &Path, name: &str, rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name(name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    ws.write_string(r as u32, c as u16, *cell).unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn reads_rows_and_trims_trailing_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.xlsx");
        write_sheet(
            &path,
            "Sheet1",
            &[
                &["url", "cms", "server", "title"],
                &["http://a:80", "WordPress", "nginx", ""],
                &["http://b:80", "", "apache", ""],
            ],
        );

        let rows = read_table(&path, DEFAULT_INPUT_SHEET).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ["url", "cms", "server", "title"]);
        assert_eq!(rows[1], ["http://a:80", "WordPress", "nginx"]);
        assert_eq!(rows[2], ["http://b:80", "", "apache"]);
    }

    #[test]
    fn preserves_leading_blank_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");
        write_sheet(&path, "Sheet1", &[&["", "cms", "server"], &["", "x", "y"]]);

        let rows = read_table(&path, "Sheet1").unwrap();
        assert_eq!(rows[1], ["", "x", "y"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_table(&dir.path().join("nope.xlsx"), "Sheet1").unwrap_err();
        assert!(matches!(err, OutputError::MissingInput(_)));
    }

    #[test]
    fn missing_sheet_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.xlsx");
        write_sheet(&path, "Other", &[&["a"]]);
        let err = read_table(&path, "Sheet1").unwrap_err();
        assert!(matches!(err, OutputError::MissingSheet { .. }));
    }
}
