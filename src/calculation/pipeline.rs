//! The end-to-end reconciliation run.
//!
//! Wires sheet location, header resolution, leave aggregation,
//! classification and quota allocation in order and collects every decision
//! into a numbered audit trace.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::config::{AppraisalConfig, SheetSpec};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AppraisalReport, AuditStep, AuditTrace, AuditWarning, Sheet, Workbook,
    WARNING_POSITIONAL_FALLBACK, WARNING_SHEET_MISSING, WARNING_UNMATCHED_LEAVE,
};

use super::appraisal_window::AppraisalWindow;
use super::classification::{build_rule, classify_employees};
use super::header_resolver::{ResolvedHeader, resolve_header};
use super::leave_aggregation::{LeaveAggregation, aggregate_leave};
use super::quota_allocation::allocate_quotas;
use super::sheet_locator::locate_sheet;

/// Number of unmatched leave identifiers quoted in the warning message.
const UNMATCHED_SAMPLE: usize = 10;

/// Runs the full reconciliation over a roster workbook and a leave workbook.
///
/// The result depends only on the two workbooks and `config`; running it
/// twice yields identical reports.
///
/// # Errors
///
/// - `InvalidConfig` if the configured year is out of range
/// - `SheetNotFound` if the roster sheet, or a non-optional leave sheet, is missing
/// - `HeaderNotFound` / `MissingMandatoryColumn` if a located sheet has no usable header
///
/// Row-level problems never fail the run; they are reported as warnings.
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::run_appraisal;
/// use appraisal_engine::config::ConfigLoader;
/// use appraisal_engine::models::{AppraisalType, Cell, Sheet, Workbook};
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let roster = Workbook::new(vec![Sheet::new("名單", vec![
///     vec![Cell::from("員工工號"), Cell::from("中文姓名"), Cell::from("到職日期")],
///     vec![Cell::from("E001"), Cell::from("王小明"), Cell::from("2023-06-01")],
/// ])]);
/// let leave = Workbook::new(vec![Sheet::new("請假", vec![
///     vec![Cell::from("員工工號"), Cell::from("合計")],
///     vec![Cell::from("E001"), Cell::Number(8.0)],
/// ])]);
///
/// let report = run_appraisal(&roster, &leave, loader.config()).unwrap();
/// assert_eq!(report.employees[0].appraisal_type, AppraisalType::AnnualReview);
/// assert_eq!(report.quotas.len(), 5);
/// ```
pub fn run_appraisal(
    employees: &Workbook,
    leave: &Workbook,
    config: &AppraisalConfig,
) -> EngineResult<AppraisalReport> {
    let window = AppraisalWindow::for_year(config.appraisal_year())?;
    let sheets = config.sheets();
    let rule = build_rule(config.settings());

    let mut trace = AuditTrace::default();
    let mut step_number: u32 = 1;

    // Roster sheet and header
    let employee_sheet = locate_required(employees, &sheets.employee, sheets.scan_rows)?;
    let employee_header = resolve_header(employee_sheet, &sheets.employee, sheets.scan_rows)?;
    info!(
        sheet = %employee_sheet.name,
        header_row = employee_header.row_index + 1,
        "Located roster sheet"
    );
    trace.steps.push(header_step(
        step_number,
        "employee_sheet",
        "Roster Sheet Resolution",
        employee_sheet,
        &employee_header,
    ));
    step_number += 1;
    push_fallback_warnings(&mut trace, employee_sheet, &employee_header);

    // Leave sheet, header and totals
    let (leave_sheet_name, leave_totals) = match locate_sheet(
        leave,
        &sheets.leave.sheet_keywords,
        sheets.leave.match_mode,
        sheets.scan_rows,
    ) {
        Some(leave_sheet) => {
            let leave_header = resolve_header(leave_sheet, &sheets.leave, sheets.scan_rows)?;
            info!(
                sheet = %leave_sheet.name,
                header_row = leave_header.row_index + 1,
                "Located leave sheet"
            );
            trace.steps.push(header_step(
                step_number,
                "leave_sheet",
                "Leave Sheet Resolution",
                leave_sheet,
                &leave_header,
            ));
            step_number += 1;
            push_fallback_warnings(&mut trace, leave_sheet, &leave_header);

            let totals = aggregate_leave(&leave_sheet.rows, &leave_header);
            (Some(leave_sheet.name.clone()), totals)
        }
        None if sheets.leave.optional => {
            warn!(
                sheets = ?leave.sheet_names(),
                "Leave sheet not found; continuing with no leave hours"
            );
            trace.warnings.push(AuditWarning::new(
                WARNING_SHEET_MISSING,
                format!(
                    "No leave sheet contains [{}]; every employee is treated as having 0 leave hours",
                    sheets.leave.sheet_keywords.join(", ")
                ),
                "high",
            ));
            (None, LeaveAggregation::default())
        }
        None => return Err(sheet_not_found(leave, &sheets.leave)),
    };

    trace.steps.push(AuditStep {
        step_number,
        rule_id: "leave_aggregation".to_string(),
        rule_name: "Leave Hours Aggregation".to_string(),
        input: serde_json::json!({
            "sheet": leave_sheet_name,
            "rows_read": leave_totals.rows_read,
        }),
        output: serde_json::json!({
            "employees": leave_totals.totals.len(),
            "duplicates_replaced": leave_totals.duplicates_replaced,
        }),
        reasoning: format!(
            "Read leave totals for {} employees from {} rows; {} later rows replaced earlier ones",
            leave_totals.totals.len(),
            leave_totals.rows_read,
            leave_totals.duplicates_replaced
        ),
    });
    step_number += 1;
    trace.warnings.extend(leave_totals.warnings.iter().cloned());

    // Classification
    let classified = classify_employees(
        &employee_sheet.rows,
        &employee_header,
        &leave_totals,
        rule.as_ref(),
        &window,
        step_number,
    );
    step_number += classified.audit_steps.len() as u32;
    trace.steps.extend(classified.audit_steps);
    trace.warnings.extend(classified.warnings);

    let roster_ids: BTreeSet<&str> = classified
        .employees
        .iter()
        .map(|e| e.employee_id.as_str())
        .collect();
    let unmatched: Vec<&str> = leave_totals
        .totals
        .keys()
        .map(String::as_str)
        .filter(|id| !roster_ids.contains(id))
        .collect();
    if !unmatched.is_empty() {
        warn!(count = unmatched.len(), "Leave records without a roster entry");
        trace.warnings.push(AuditWarning::new(
            WARNING_UNMATCHED_LEAVE,
            format!(
                "{} leave records have no roster entry: {}",
                unmatched.len(),
                unmatched
                    .iter()
                    .take(UNMATCHED_SAMPLE)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            "low",
        ));
    }

    // Quotas
    let quotas = allocate_quotas(&classified.employees);
    let counted: u32 = quotas.iter().map(|q| q.total_evaluated).sum();
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "quota_allocation".to_string(),
        rule_name: "Category Quota Allocation".to_string(),
        input: serde_json::json!({
            "employees": classified.employees.len(),
            "in_categories": counted,
        }),
        output: serde_json::to_value(&quotas).unwrap_or_default(),
        reasoning: format!(
            "Allocated tier seats for {} of {} employees across categories 1-5",
            counted,
            classified.employees.len()
        ),
    });

    info!(
        year = window.year,
        rule = rule.id(),
        employees = classified.employees.len(),
        skipped_rows = classified.rows_skipped,
        warnings = trace.warnings.len(),
        "Appraisal run completed"
    );

    Ok(AppraisalReport {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        appraisal_year: window.year,
        rule_id: rule.id().to_string(),
        employee_sheet: employee_sheet.name.clone(),
        leave_sheet: leave_sheet_name,
        employees: classified.employees,
        quotas,
        audit_trace: trace,
    })
}

fn locate_required<'a>(
    workbook: &'a Workbook,
    spec: &SheetSpec,
    scan_rows: usize,
) -> EngineResult<&'a Sheet> {
    locate_sheet(workbook, &spec.sheet_keywords, spec.match_mode, scan_rows)
        .ok_or_else(|| sheet_not_found(workbook, spec))
}

fn sheet_not_found(workbook: &Workbook, spec: &SheetSpec) -> EngineError {
    EngineError::SheetNotFound {
        keywords: spec.sheet_keywords.clone(),
        sheets_inspected: workbook.sheet_names(),
    }
}

fn header_step(
    step_number: u32,
    rule_id: &str,
    rule_name: &str,
    sheet: &Sheet,
    resolved: &ResolvedHeader,
) -> AuditStep {
    let columns: serde_json::Map<String, serde_json::Value> = resolved
        .header
        .columns()
        .iter()
        .map(|(field, index)| (field.to_string(), serde_json::json!(index)))
        .collect();

    AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "sheet": sheet.name,
            "rows": sheet.rows.len(),
        }),
        output: serde_json::json!({
            "header_row": resolved.row_index + 1,
            "columns": columns,
        }),
        reasoning: format!(
            "Sheet '{}' has its header on row {} with {} resolved columns",
            sheet.name,
            resolved.row_index + 1,
            resolved.header.columns().len()
        ),
    }
}

fn push_fallback_warnings(trace: &mut AuditTrace, sheet: &Sheet, resolved: &ResolvedHeader) {
    for field in &resolved.positional_fallbacks {
        let column = resolved.header.index(*field).unwrap_or_default();
        trace.warnings.push(AuditWarning::at_row(
            WARNING_POSITIONAL_FALLBACK,
            format!(
                "No header matched '{}' in sheet '{}'; using column {} by position",
                field,
                sheet.name,
                column + 1
            ),
            "medium",
            resolved.row_index,
        ));
    }
}
