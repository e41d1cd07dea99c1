//! Sheet location.
//!
//! Exports rarely put the data on the first tab: cover pages, notes and
//! pivot summaries come first. This module finds the sheet that actually
//! holds the table by looking for marker keywords near the top.

use crate::config::KeywordMatchMode;
use crate::models::{Cell, Sheet, Workbook};

/// Finds the first sheet whose top rows contain every required keyword.
///
/// Sheets are checked in declared order and only their first `scan_rows`
/// rows are inspected. A sheet matches when a single row holds, for each
/// keyword, at least one cell matching it under `mode`. Scanning stops at
/// the first match, so declared order breaks ties.
///
/// # Returns
///
/// The matching sheet, or `None` if no sheet matched. Whether that is fatal
/// is up to the caller.
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::locate_sheet;
/// use appraisal_engine::config::KeywordMatchMode;
/// use appraisal_engine::models::{Cell, Sheet, Workbook};
///
/// let workbook = Workbook::new(vec![
///     Sheet::new("說明", vec![vec![Cell::from("本表為年度考核用")]]),
///     Sheet::new("名單", vec![vec![Cell::from("員工工號"), Cell::from("姓名")]]),
/// ]);
///
/// let sheet = locate_sheet(&workbook, &["員工工號".to_string()], KeywordMatchMode::Contains, 20);
/// assert_eq!(sheet.unwrap().name, "名單");
/// ```
pub fn locate_sheet<'a>(
    workbook: &'a Workbook,
    keywords: &[String],
    mode: KeywordMatchMode,
    scan_rows: usize,
) -> Option<&'a Sheet> {
    workbook
        .sheets
        .iter()
        .find(|sheet| sheet_has_marker_row(sheet, keywords, mode, scan_rows))
}

fn sheet_has_marker_row(
    sheet: &Sheet,
    keywords: &[String],
    mode: KeywordMatchMode,
    scan_rows: usize,
) -> bool {
    sheet
        .rows
        .iter()
        .take(scan_rows)
        .any(|row| row_has_all(row, keywords, mode))
}

fn row_has_all(row: &[Cell], keywords: &[String], mode: KeywordMatchMode) -> bool {
    !row.is_empty() && keywords.iter().all(|keyword| mode.row_has(row, keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn padded_sheet(name: &str, leading_rows: usize, marker: &[&str]) -> Sheet {
        let mut rows = vec![text_row(&["備註"]); leading_rows];
        rows.push(text_row(marker));
        Sheet::new(name, rows)
    }

    #[test]
    fn test_skips_sheets_without_markers() {
        let workbook = Workbook::new(vec![
            Sheet::new("封面", vec![text_row(&["113年度考核"])]),
            padded_sheet("名單", 3, &["員工工號", "中文姓名"]),
        ]);

        let sheet = locate_sheet(
            &workbook,
            &keywords(&["員工工號"]),
            KeywordMatchMode::Contains,
            20,
        );
        assert_eq!(sheet.unwrap().name, "名單");
    }

    #[test]
    fn test_first_matching_sheet_wins() {
        let workbook = Workbook::new(vec![
            padded_sheet("名單A", 0, &["員工工號"]),
            padded_sheet("名單B", 0, &["員工工號"]),
        ]);

        let sheet = locate_sheet(
            &workbook,
            &keywords(&["員工工號"]),
            KeywordMatchMode::Contains,
            20,
        );
        assert_eq!(sheet.unwrap().name, "名單A");
    }

    #[test]
    fn test_all_keywords_must_share_a_row() {
        let workbook = Workbook::new(vec![Sheet::new(
            "分散",
            vec![text_row(&["工號"]), text_row(&["合計"])],
        )]);

        let sheet = locate_sheet(
            &workbook,
            &keywords(&["工號", "合計"]),
            KeywordMatchMode::Contains,
            20,
        );
        assert!(sheet.is_none());
    }

    #[test]
    fn test_marker_beyond_scan_window_is_ignored() {
        let workbook = Workbook::new(vec![padded_sheet("名單", 20, &["員工工號"])]);

        let found = locate_sheet(
            &workbook,
            &keywords(&["員工工號"]),
            KeywordMatchMode::Contains,
            20,
        );
        assert!(found.is_none());

        let found = locate_sheet(
            &workbook,
            &keywords(&["員工工號"]),
            KeywordMatchMode::Contains,
            21,
        );
        assert!(found.is_some());
    }

    #[test]
    fn test_exact_mode_rejects_substring_matches() {
        let workbook = Workbook::new(vec![
            padded_sheet("說明", 0, &["請填寫員工工號欄位"]),
            padded_sheet("名單", 0, &["員工工號"]),
        ]);

        let contains = locate_sheet(
            &workbook,
            &keywords(&["員工工號"]),
            KeywordMatchMode::Contains,
            20,
        );
        assert_eq!(contains.unwrap().name, "說明");

        let exact = locate_sheet(
            &workbook,
            &keywords(&["員工工號"]),
            KeywordMatchMode::Exact,
            20,
        );
        assert_eq!(exact.unwrap().name, "名單");
    }

    #[test]
    fn test_numeric_cells_are_matched_by_text() {
        let workbook = Workbook::new(vec![Sheet::new(
            "年度",
            vec![vec![Cell::Number(2024.0), Cell::from("員工工號")]],
        )]);

        let sheet = locate_sheet(
            &workbook,
            &keywords(&["2024", "員工工號"]),
            KeywordMatchMode::Contains,
            20,
        );
        assert!(sheet.is_some());
    }

    #[test]
    fn test_empty_workbook_returns_none() {
        let workbook = Workbook::default();
        assert!(
            locate_sheet(
                &workbook,
                &keywords(&["員工工號"]),
                KeywordMatchMode::Contains,
                20
            )
            .is_none()
        );
    }
}
