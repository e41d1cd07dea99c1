//! Calculation logic for the Appraisal Reconciliation Engine.
//!
//! This module contains the reconciliation pipeline and its stages: sheet
//! location, header resolution, leave aggregation, appraisal classification
//! against the appraisal year, and quota allocation per job category.

mod appraisal_window;
mod classification;
mod date_parsing;
mod header_resolver;
mod leave_aggregation;
mod pipeline;
mod quota_allocation;
mod sheet_locator;

pub use appraisal_window::AppraisalWindow;
pub use classification::{
    ClassificationResult, ClassificationRule, EmployeeFacts, LeaveHoursRule, RuleOutcome,
    ServiceDaysRule, build_rule, classify_employees,
};
pub use date_parsing::{CellDate, parse_cell_date, parse_date_text, serial_epoch, serial_to_date};
pub use header_resolver::{HEADER_SAMPLE_ROWS, HeaderMap, ResolvedHeader, resolve_header};
pub use leave_aggregation::{LeaveAggregation, LeaveTotals, aggregate_leave};
pub use pipeline::run_appraisal;
pub use quota_allocation::{QUOTA_CATEGORIES, allocate_quotas, compute_quota};
pub use sheet_locator::locate_sheet;
