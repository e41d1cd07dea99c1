//! Request types for the Appraisal Reconciliation Engine API.
//!
//! The `/appraisals` endpoint takes its workbooks as multipart file fields
//! and its per-run overrides from the query string.

use serde::{Deserialize, Serialize};

use crate::config::RuleSetKind;

/// Multipart field carrying the employee roster workbook.
pub const EMPLOYEES_FIELD: &str = "employees";

/// Multipart field carrying the leave report workbook.
pub const LEAVE_FIELD: &str = "leave";

/// Query parameters for `POST /appraisals`.
///
/// Both parameters override the loaded configuration for this run only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppraisalQuery {
    /// Appraisal year to use instead of the configured one.
    #[serde(default)]
    pub year: Option<i32>,
    /// Classification rule to use instead of the configured one.
    #[serde(default)]
    pub rule: Option<RuleSetKind>,
}

/// The uploaded files of one request.
#[derive(Debug, Clone, Default)]
pub struct AppraisalUpload {
    /// File name and bytes of the roster workbook.
    pub employees: Option<(String, Vec<u8>)>,
    /// File name and bytes of the leave workbook.
    pub leave: Option<(String, Vec<u8>)>,
}
