//! Core data models for the Appraisal Reconciliation Engine.
//!
//! This module contains the decoded workbook model, the classified employee
//! records, the quota table rows and the report that bundles them.

mod cell;
mod employee;
mod quota;
mod report;
mod workbook;

pub use cell::{Cell, Row};
pub use employee::{AppraisalType, EmployeeRecord};
pub use quota::{CategoryCounts, CategoryQuota, format_headcount};
pub use report::{
    AppraisalReport, AuditStep, AuditTrace, AuditWarning, WARNING_DATE_PARSE_FAILURE,
    WARNING_NUMBER_PARSE_FAILURE, WARNING_POSITIONAL_FALLBACK, WARNING_SHEET_MISSING,
    WARNING_UNMATCHED_LEAVE,
};
pub use workbook::{Sheet, Workbook};
