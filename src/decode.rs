//! Workbook decoding.
//!
//! Turns the raw bytes of an uploaded spreadsheet (xlsx, xlsm, xls, xlsb or
//! ods) into the [`Workbook`] model. Everything downstream works on cells
//! and never sees the file format.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Cell, Row, Sheet, Workbook};

/// Decodes a spreadsheet held in memory.
///
/// Sheets keep their workbook order. Rows and columns keep their absolute
/// positions: a sheet whose used range starts at `C4` decodes with three
/// leading empty rows and two leading empty cells per row. Trailing empty
/// cells are dropped from each row.
///
/// Dates stored as date cells decode to their serial number, so they read
/// the same as plain numeric dates.
///
/// # Errors
///
/// Returns `WorkbookDecode` naming `source_name` if the bytes are not a
/// readable spreadsheet or a sheet cannot be read.
pub fn decode_workbook(source_name: &str, bytes: &[u8]) -> EngineResult<Workbook> {
    let mut reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| decode_error(source_name, e))?;

    let names = reader.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = reader
            .worksheet_range(&name)
            .map_err(|e| decode_error(source_name, format!("sheet '{}': {}", name, e)))?;
        let rows = range_to_rows(&range);
        debug!(source = source_name, sheet = %name, rows = rows.len(), "Decoded sheet");
        sheets.push(Sheet::new(name, rows));
    }

    Ok(Workbook::new(sheets))
}

/// Decodes a spreadsheet on the blocking thread pool.
///
/// Dropping the returned future abandons the result; the decode itself
/// runs to completion in the background.
pub async fn decode_workbook_async(source_name: String, bytes: Vec<u8>) -> EngineResult<Workbook> {
    let name = source_name.clone();
    tokio::task::spawn_blocking(move || decode_workbook(&source_name, &bytes))
        .await
        .map_err(|e| decode_error(&name, e))?
}

fn decode_error(source_name: &str, error: impl std::fmt::Display) -> EngineError {
    EngineError::WorkbookDecode {
        source_name: source_name.to_string(),
        message: error.to_string(),
    }
}

fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Row> = vec![Vec::new(); start_row as usize];
    for data_row in range.rows() {
        let mut row: Row = vec![Cell::Empty; start_col as usize];
        row.extend(data_row.iter().map(to_cell));
        while row.last().is_some_and(Cell::is_empty) {
            row.pop();
        }
        rows.push(row);
    }
    rows
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook};

    fn build_xlsx() -> Vec<u8> {
        let mut workbook = XlsxWorkbook::new();

        let cover = workbook.add_worksheet();
        cover.set_name("封面").unwrap();
        cover.write_string(0, 0, "113年度考核").unwrap();

        let roster = workbook.add_worksheet();
        roster.set_name("名冊").unwrap();
        roster.write_string(2, 1, "員工工號").unwrap();
        roster.write_string(2, 2, "到職日期").unwrap();
        roster.write_string(3, 1, "E001").unwrap();
        roster.write_number(3, 2, 45078).unwrap();
        roster.write_string(4, 1, "E002").unwrap();
        let date = ExcelDateTime::from_ymd(2024, 8, 1).unwrap();
        let format = Format::new().set_num_format("yyyy-mm-dd");
        roster.write_datetime_with_format(4, 2, &date, &format).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_decode_keeps_sheet_order() {
        let workbook = decode_workbook("roster.xlsx", &build_xlsx()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["封面", "名冊"]);
    }

    #[test]
    fn test_decode_keeps_absolute_positions() {
        let workbook = decode_workbook("roster.xlsx", &build_xlsx()).unwrap();
        let sheet = &workbook.sheets[1];

        assert!(sheet.rows[0].is_empty());
        assert!(sheet.rows[1].is_empty());
        assert_eq!(sheet.rows[2][0], Cell::Empty);
        assert_eq!(sheet.rows[2][1], Cell::from("員工工號"));
        assert_eq!(sheet.rows[3][2], Cell::Number(45078.0));
    }

    #[test]
    fn test_date_cells_decode_to_serials() {
        let workbook = decode_workbook("roster.xlsx", &build_xlsx()).unwrap();
        assert_eq!(workbook.sheets[1].rows[4][2], Cell::Number(45505.0));
    }

    #[test]
    fn test_garbage_bytes_fail_with_source_name() {
        match decode_workbook("leave.xlsx", b"not a spreadsheet") {
            Err(EngineError::WorkbookDecode { source_name, .. }) => {
                assert_eq!(source_name, "leave.xlsx");
            }
            other => panic!("Expected WorkbookDecode, got {:?}", other),
        }
    }

    #[test]
    fn test_to_cell_conversions() {
        assert_eq!(to_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(to_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(to_cell(&Data::Bool(true)), Cell::from("TRUE"));
        assert_eq!(
            to_cell(&Data::DateTimeIso("2024-08-01".to_string())),
            Cell::from("2024-08-01")
        );
    }

    #[tokio::test]
    async fn test_async_decode_matches_sync() {
        let bytes = build_xlsx();
        let sync = decode_workbook("roster.xlsx", &bytes).unwrap();
        let async_result = decode_workbook_async("roster.xlsx".to_string(), bytes)
            .await
            .unwrap();
        assert_eq!(sync, async_result);
    }
}
