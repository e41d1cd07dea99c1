//! Header row detection and column resolution.
//!
//! The header row of an export is not at a fixed position: titles, report
//! dates and blank rows often come first, and column labels vary between
//! exports ("中文姓名" in one, "員工姓名" in another). This module finds the
//! header row by keyword and maps each logical [`Field`] to a column index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{Field, FieldSpec, KeywordMatchMode, SheetSpec};
use crate::error::{EngineError, EngineResult};
use crate::models::{Cell, Sheet};

/// Number of leading rows quoted in `HeaderNotFound` errors.
pub const HEADER_SAMPLE_ROWS: usize = 5;

static EMPTY_CELL: Cell = Cell::Empty;

/// Mapping from logical field to column index for one sheet.
///
/// Every stored index is within the bounds of the header row. Fields that
/// were not resolved are absent and read as [`Cell::Empty`] on every row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderMap {
    columns: BTreeMap<Field, usize>,
}

impl HeaderMap {
    /// Returns the column index of `field`, or `None` when it is absent.
    pub fn index(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Returns the cell for `field` in `row`.
    ///
    /// Absent fields and rows shorter than the resolved index both read as
    /// an empty cell.
    pub fn cell<'a>(&self, row: &'a [Cell], field: Field) -> &'a Cell {
        self.index(field)
            .and_then(|index| row.get(index))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Returns the trimmed text for `field` in `row`.
    pub fn text(&self, row: &[Cell], field: Field) -> String {
        self.cell(row, field).text()
    }

    /// Returns the resolved columns, ordered by field.
    pub fn columns(&self) -> &BTreeMap<Field, usize> {
        &self.columns
    }
}

/// The outcome of header resolution for one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader {
    /// 0-based index of the header row within the sheet.
    pub row_index: usize,
    /// The field-to-column mapping.
    pub header: HeaderMap,
    /// Fields that were resolved by position rather than by keyword.
    pub positional_fallbacks: Vec<Field>,
}

/// Finds the header row of `sheet` and resolves every configured field.
///
/// The header row is the first of the first `scan_rows` rows on which each
/// field marked `detect` has a cell matching one of its keywords. Each field
/// is then resolved on that row by trying its keywords in priority order;
/// the first keyword that matches any cell wins, and within a keyword the
/// leftmost cell wins. A field with a `positional_fallback` index resolves
/// to that index when no keyword matches and the header row is wider than
/// the index.
///
/// # Errors
///
/// - `HeaderNotFound` when no row in the window satisfies the detection fields
/// - `MissingMandatoryColumn` when a mandatory field cannot be resolved
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::resolve_header;
/// use appraisal_engine::config::{Field, FieldSpec, KeywordMatchMode, SheetSpec};
/// use appraisal_engine::models::{Cell, Sheet};
///
/// let spec = SheetSpec {
///     sheet_keywords: vec!["工號".to_string()],
///     match_mode: KeywordMatchMode::Contains,
///     optional: false,
///     fields: vec![
///         FieldSpec { field: Field::Id, keywords: vec!["工號".to_string()], detect: true, mandatory: true, positional_fallback: None },
///         FieldSpec { field: Field::LeaveTotal, keywords: vec!["合計".to_string()], detect: true, mandatory: true, positional_fallback: None },
///     ],
/// };
/// let sheet = Sheet::new("請假", vec![
///     vec![Cell::from("113年請假統計")],
///     vec![Cell::from("員工工號"), Cell::from("事假"), Cell::from("合計")],
/// ]);
///
/// let resolved = resolve_header(&sheet, &spec, 20).unwrap();
/// assert_eq!(resolved.row_index, 1);
/// assert_eq!(resolved.header.index(Field::LeaveTotal), Some(2));
/// ```
pub fn resolve_header(
    sheet: &Sheet,
    spec: &SheetSpec,
    scan_rows: usize,
) -> EngineResult<ResolvedHeader> {
    let mode = spec.match_mode;

    let row_index = sheet
        .rows
        .iter()
        .take(scan_rows)
        .position(|row| is_header_row(row, spec, mode))
        .ok_or_else(|| EngineError::HeaderNotFound {
            sheet: sheet.name.clone(),
            keywords: spec.detection_keywords(),
            sample_rows: sheet.sample_rows(HEADER_SAMPLE_ROWS),
        })?;
    let header_row = &sheet.rows[row_index];

    let mut columns = BTreeMap::new();
    let mut positional_fallbacks = Vec::new();

    for field_spec in &spec.fields {
        if let Some(index) = find_by_keywords(header_row, &field_spec.keywords, mode) {
            columns.insert(field_spec.field, index);
            continue;
        }

        match field_spec.positional_fallback {
            Some(index) if index < header_row.len() => {
                warn!(
                    sheet = %sheet.name,
                    field = %field_spec.field,
                    column = index,
                    "Header keyword not found, using positional fallback"
                );
                columns.insert(field_spec.field, index);
                positional_fallbacks.push(field_spec.field);
            }
            _ if field_spec.mandatory => {
                return Err(missing_column(sheet, field_spec));
            }
            _ => {}
        }
    }

    Ok(ResolvedHeader {
        row_index,
        header: HeaderMap { columns },
        positional_fallbacks,
    })
}

fn is_header_row(row: &[Cell], spec: &SheetSpec, mode: KeywordMatchMode) -> bool {
    !row.is_empty()
        && spec.detection_fields().all(|field_spec| {
            field_spec
                .keywords
                .iter()
                .any(|keyword| mode.row_has(row, keyword))
        })
}

fn find_by_keywords(row: &[Cell], keywords: &[String], mode: KeywordMatchMode) -> Option<usize> {
    keywords
        .iter()
        .find_map(|keyword| row.iter().position(|cell| mode.matches(cell, keyword)))
}

fn missing_column(sheet: &Sheet, field_spec: &FieldSpec) -> EngineError {
    EngineError::MissingMandatoryColumn {
        sheet: sheet.name.clone(),
        field: field_spec.field.to_string(),
        keywords: field_spec.keywords.clone(),
    }
}
