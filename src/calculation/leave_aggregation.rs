//! Leave report aggregation.
//!
//! Builds the identifier → total leave hours mapping that is merged into
//! the roster during classification.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::Field;
use crate::models::{AuditWarning, Row, WARNING_NUMBER_PARSE_FAILURE};

use super::header_resolver::ResolvedHeader;

/// Total leave hours keyed by employee identifier.
pub type LeaveTotals = BTreeMap<String, Decimal>;

/// The result of reading a leave sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaveAggregation {
    /// Leave hours per employee identifier.
    pub totals: LeaveTotals,
    /// Data rows that carried an identifier.
    pub rows_read: usize,
    /// Rows whose identifier had already been seen and replaced the earlier value.
    pub duplicates_replaced: usize,
    /// Unreadable hour values that were counted as zero.
    pub warnings: Vec<AuditWarning>,
}

impl LeaveAggregation {
    /// Returns the hours for `employee_id`, or zero when the report has no entry.
    pub fn hours_for(&self, employee_id: &str) -> Decimal {
        self.totals
            .get(employee_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Reads every data row below the header into a [`LeaveTotals`] mapping.
///
/// Rows without an identifier are skipped. The leave-total cell is read with
/// [`Cell::hours`](crate::models::Cell::hours); empty cells count as zero
/// silently, other unreadable values count as zero with a warning. When an
/// identifier repeats, the later row replaces the earlier one.
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::{aggregate_leave, resolve_header};
/// use appraisal_engine::config::{Field, FieldSpec, KeywordMatchMode, SheetSpec};
/// use appraisal_engine::models::{Cell, Sheet};
/// use rust_decimal::Decimal;
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
///     vec![Cell::from("工號"), Cell::from("合計")],
///     vec![Cell::from("E001"), Cell::Number(16.0)],
/// ]);
/// let resolved = resolve_header(&sheet, &spec, 20).unwrap();
///
/// let leave = aggregate_leave(&sheet.rows, &resolved);
/// assert_eq!(leave.hours_for("E001"), Decimal::new(16, 0));
/// assert_eq!(leave.hours_for("E999"), Decimal::ZERO);
/// ```
pub fn aggregate_leave(rows: &[Row], resolved: &ResolvedHeader) -> LeaveAggregation {
    let header = &resolved.header;
    let mut aggregation = LeaveAggregation::default();

    for (row_index, row) in rows.iter().enumerate().skip(resolved.row_index + 1) {
        let employee_id = header.text(row, Field::Id);
        if employee_id.is_empty() {
            debug!(row = row_index + 1, "Skipping leave row without identifier");
            continue;
        }

        let cell = header.cell(row, Field::LeaveTotal);
        let hours = match cell.hours() {
            Some(hours) => hours,
            None => {
                if !cell.is_empty() {
                    aggregation.warnings.push(AuditWarning::at_row(
                        WARNING_NUMBER_PARSE_FAILURE,
                        format!(
                            "Leave total '{}' for employee {} is not a valid hour count; using 0",
                            cell.text(),
                            employee_id
                        ),
                        "low",
                        row_index,
                    ));
                }
                Decimal::ZERO
            }
        };

        aggregation.rows_read += 1;
        if aggregation.totals.insert(employee_id, hours).is_some() {
            aggregation.duplicates_replaced += 1;
        }
    }

    aggregation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::resolve_header;
    use crate::config::{FieldSpec, KeywordMatchMode, SheetSpec};
    use crate::models::{Cell, Sheet};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn leave_spec() -> SheetSpec {
        SheetSpec {
            sheet_keywords: vec!["員工工號".to_string()],
            match_mode: KeywordMatchMode::Contains,
            optional: false,
            fields: vec![
                FieldSpec {
                    field: Field::Id,
                    keywords: vec!["工號".to_string()],
                    detect: true,
                    mandatory: true,
                    positional_fallback: None,
                },
                FieldSpec {
                    field: Field::LeaveTotal,
                    keywords: vec!["合計".to_string()],
                    detect: true,
                    mandatory: true,
                    positional_fallback: None,
                },
            ],
        }
    }

    fn aggregate(data: Vec<Vec<Cell>>) -> LeaveAggregation {
        let mut rows = vec![
            vec![Cell::from("113年度請假統計")],
            vec![Cell::from("員工工號"), Cell::from("事假"), Cell::from("合計")],
        ];
        rows.extend(data);
        let sheet = Sheet::new("請假", rows);
        let resolved = resolve_header(&sheet, &leave_spec(), 20).unwrap();
        aggregate_leave(&sheet.rows, &resolved)
    }

    #[test]
    fn test_reads_numeric_and_text_totals() {
        let leave = aggregate(vec![
            vec![Cell::from("E001"), Cell::Number(8.0), Cell::Number(16.0)],
            vec![Cell::from("E002"), Cell::Empty, Cell::from("4.5")],
        ]);

        assert_eq!(leave.hours_for("E001"), dec("16"));
        assert_eq!(leave.hours_for("E002"), dec("4.5"));
        assert_eq!(leave.rows_read, 2);
        assert!(leave.warnings.is_empty());
    }

    #[test]
    fn test_later_duplicate_wins() {
        let leave = aggregate(vec![
            vec![Cell::from("E001"), Cell::Empty, Cell::Number(16.0)],
            vec![Cell::from("E001"), Cell::Empty, Cell::Number(4.0)],
        ]);

        assert_eq!(leave.hours_for("E001"), dec("4"));
        assert_eq!(leave.totals.len(), 1);
        assert_eq!(leave.duplicates_replaced, 1);
    }

    #[test]
    fn test_rows_without_identifier_are_skipped() {
        let leave = aggregate(vec![
            vec![Cell::Empty, Cell::Empty, Cell::Number(99.0)],
            vec![Cell::from("  "), Cell::Empty, Cell::Number(99.0)],
            vec![],
            vec![Cell::from("E003"), Cell::Empty, Cell::Number(2.0)],
        ]);

        assert_eq!(leave.totals.len(), 1);
        assert_eq!(leave.rows_read, 1);
    }

    #[test]
    fn test_unparseable_total_defaults_to_zero_with_warning() {
        let leave = aggregate(vec![vec![
            Cell::from("E004"),
            Cell::Empty,
            Cell::from("待補"),
        ]]);

        assert_eq!(leave.hours_for("E004"), Decimal::ZERO);
        assert_eq!(leave.warnings.len(), 1);
        assert_eq!(leave.warnings[0].code, WARNING_NUMBER_PARSE_FAILURE);
        assert_eq!(leave.warnings[0].row, Some(3));
    }

    #[test]
    fn test_empty_total_defaults_to_zero_silently() {
        let leave = aggregate(vec![vec![Cell::from("E005")]]);

        assert_eq!(leave.totals.get("E005"), Some(&Decimal::ZERO));
        assert!(leave.warnings.is_empty());
    }

    #[test]
    fn test_numeric_identifier_matches_text_form() {
        let leave = aggregate(vec![vec![Cell::Number(1001.0), Cell::Empty, Cell::Number(8.0)]]);
        assert_eq!(leave.hours_for("1001"), dec("8"));
    }
}
