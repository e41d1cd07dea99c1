//! Appraisal report models.
//!
//! This module contains the [`AppraisalReport`] type and the audit structures
//! that record every decision made while reconciling the roster with the
//! leave report.

use serde::{Deserialize, Serialize};

use super::employee::EmployeeRecord;
use super::quota::CategoryQuota;

/// Warning code: a date cell held a value that could not be read as a date.
pub const WARNING_DATE_PARSE_FAILURE: &str = "DATE_PARSE_FAILURE";
/// Warning code: a leave-hours cell held a value that could not be read as hours.
pub const WARNING_NUMBER_PARSE_FAILURE: &str = "NUMBER_PARSE_FAILURE";
/// Warning code: a column was resolved by position instead of by header text.
pub const WARNING_POSITIONAL_FALLBACK: &str = "POSITIONAL_FALLBACK";
/// Warning code: an optional sheet was not found and an empty default was used.
pub const WARNING_SHEET_MISSING: &str = "SHEET_MISSING";
/// Warning code: the leave report lists identifiers absent from the roster.
pub const WARNING_UNMATCHED_LEAVE: &str = "UNMATCHED_LEAVE_RECORDS";

/// A single step in the audit trace recording a pipeline decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated while processing.
///
/// Warnings record per-row degradations that do not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
    /// The 1-based sheet row the warning refers to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl AuditWarning {
    /// Creates a warning that is not tied to a row.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
            row: None,
        }
    }

    /// Creates a warning for a given 0-based row index of a sheet.
    pub fn at_row(code: &str, message: impl Into<String>, severity: &str, row_index: usize) -> Self {
        Self {
            row: Some(row_index + 1),
            ..Self::new(code, message, severity)
        }
    }
}

/// The complete audit trace for a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of pipeline steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated while processing.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of one reconciliation run.
///
/// The report is a pure function of the two workbooks and the configuration;
/// it carries no timestamps or generated identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalReport {
    /// The version of the engine that produced the report.
    pub engine_version: String,
    /// The calendar year that was appraised.
    pub appraisal_year: i32,
    /// Identifier of the classification rule that was active.
    pub rule_id: String,
    /// Name of the roster sheet that was used.
    pub employee_sheet: String,
    /// Name of the leave sheet that was used, if one was found.
    pub leave_sheet: Option<String>,
    /// Classified employees, in roster order.
    pub employees: Vec<EmployeeRecord>,
    /// Quota rows for categories "1" through "5".
    pub quotas: Vec<CategoryQuota>,
    /// Complete audit trace of decisions.
    pub audit_trace: AuditTrace,
}
