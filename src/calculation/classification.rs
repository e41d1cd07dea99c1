//! Appraisal type classification.
//!
//! Each roster row is reduced to a set of [`EmployeeFacts`] (hire date,
//! leave-without-pay days inside the year, leave hours) and handed to the
//! active [`ClassificationRule`]. Two rule sets exist because the appraisal
//! regulations changed between revisions; which one runs is decided by
//! configuration through [`build_rule`].

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{
    AppraisalSettings, Field, LeaveHoursRuleConfig, RuleSetKind, ServiceDaysRuleConfig,
};
use crate::models::{
    AppraisalType, AuditStep, AuditWarning, Cell, EmployeeRecord, Row,
    WARNING_DATE_PARSE_FAILURE,
};

use super::appraisal_window::AppraisalWindow;
use super::date_parsing::{CellDate, parse_cell_date};
use super::header_resolver::ResolvedHeader;
use super::leave_aggregation::LeaveAggregation;

/// The date and leave facts a rule needs to classify one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeFacts {
    /// The hire date, if it could be read.
    pub hire_date: Option<NaiveDate>,
    /// Leave-without-pay days that fall inside the appraisal year.
    pub lwop_days: i64,
    /// Total leave hours from the leave report.
    pub leave_hours: Decimal,
}

/// The decision of a rule for one employee.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    /// The assigned appraisal type.
    pub appraisal_type: AppraisalType,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
    /// Intermediate values the decision was based on.
    pub details: serde_json::Value,
}

/// A classification rule set.
pub trait ClassificationRule: Send + Sync {
    /// Stable identifier of the rule set, recorded on the report.
    fn id(&self) -> &'static str;

    /// Human-readable name of the rule set.
    fn name(&self) -> &'static str;

    /// Classifies one employee for the year described by `window`.
    fn classify(&self, facts: &EmployeeFacts, window: &AppraisalWindow) -> RuleOutcome;

    /// Whether the rule reads leave-without-pay days. When false the LWOP
    /// cells are never parsed and `lwop_days` is zero.
    fn uses_lwop(&self) -> bool {
        true
    }
}

/// Builds the rule set selected by `settings.active_rule`.
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::build_rule;
/// use appraisal_engine::config::{ConfigLoader, RuleSetKind};
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let config = loader.config().with_rule(RuleSetKind::LeaveHours);
/// let rule = build_rule(config.settings());
/// assert_eq!(rule.id(), "leave_hours");
/// ```
pub fn build_rule(settings: &AppraisalSettings) -> Box<dyn ClassificationRule> {
    match settings.active_rule {
        RuleSetKind::ServiceDays => Box::new(ServiceDaysRule::new(settings.service_days.clone())),
        RuleSetKind::LeaveHours => Box::new(LeaveHoursRule::new(settings.leave_hours.clone())),
    }
}

/// Classification by service days in the year, net of leave without pay.
///
/// - Hired before the year with no leave without pay: annual review.
/// - Otherwise service days are counted inclusively from the later of the
///   hire date and January 1 to December 31, minus leave-without-pay days.
///   At least `min_service_days` gives a supplemental review, fewer gives
///   `short_service_type`.
/// - Missing hire date: `missing_hire_date_type`.
#[derive(Debug, Clone)]
pub struct ServiceDaysRule {
    config: ServiceDaysRuleConfig,
}

impl ServiceDaysRule {
    /// Creates the rule with the given thresholds.
    pub fn new(config: ServiceDaysRuleConfig) -> Self {
        Self { config }
    }
}

impl ClassificationRule for ServiceDaysRule {
    fn id(&self) -> &'static str {
        RuleSetKind::ServiceDays.as_str()
    }

    fn name(&self) -> &'static str {
        "Service Days Classification"
    }

    fn classify(&self, facts: &EmployeeFacts, window: &AppraisalWindow) -> RuleOutcome {
        let Some(hire_date) = facts.hire_date else {
            return RuleOutcome {
                appraisal_type: self.config.missing_hire_date_type,
                reasoning: format!(
                    "No readable hire date; assigned {}",
                    self.config.missing_hire_date_type
                ),
                details: serde_json::json!({}),
            };
        };

        if hire_date < window.start && facts.lwop_days == 0 {
            return RuleOutcome {
                appraisal_type: AppraisalType::AnnualReview,
                reasoning: format!(
                    "Hired {} before {} with no leave without pay: full year of service",
                    hire_date, window.start
                ),
                details: serde_json::json!({ "service_days": window.days_remaining_from(window.start) }),
            };
        }

        let base_date = hire_date.max(window.start);
        let potential_days = window.days_remaining_from(base_date);
        let service_days = potential_days - facts.lwop_days;

        let appraisal_type = if service_days >= self.config.min_service_days {
            AppraisalType::SupplementalReview
        } else {
            self.config.short_service_type
        };

        RuleOutcome {
            appraisal_type,
            reasoning: format!(
                "{} days from {} to {} minus {} days without pay = {} service days (threshold {}): {}",
                potential_days,
                base_date,
                window.end,
                facts.lwop_days,
                service_days,
                self.config.min_service_days,
                appraisal_type
            ),
            details: serde_json::json!({
                "base_date": base_date.to_string(),
                "potential_days": potential_days,
                "service_days": service_days,
                "min_service_days": self.config.min_service_days,
            }),
        }
    }
}

/// Classification by accumulated leave hours after a probation period.
///
/// - Leave hours at or above `ineligible_leave_hours`: not eligible.
/// - Missing hire date: `missing_hire_date_type`.
/// - Otherwise the period runs from the later of probation end and
///   January 1 to December 31 (exclusive day count). Leave hours divided by
///   `leave_hours_per_day` are subtracted; the remaining work days decide
///   between annual review, supplemental review and not evaluated.
#[derive(Debug, Clone)]
pub struct LeaveHoursRule {
    config: LeaveHoursRuleConfig,
}

impl LeaveHoursRule {
    /// Creates the rule with the given thresholds.
    pub fn new(config: LeaveHoursRuleConfig) -> Self {
        Self { config }
    }
}

impl ClassificationRule for LeaveHoursRule {
    fn id(&self) -> &'static str {
        RuleSetKind::LeaveHours.as_str()
    }

    fn name(&self) -> &'static str {
        "Leave Hours Classification"
    }

    fn uses_lwop(&self) -> bool {
        false
    }

    fn classify(&self, facts: &EmployeeFacts, window: &AppraisalWindow) -> RuleOutcome {
        let hours = facts.leave_hours;

        if hours >= self.config.ineligible_leave_hours {
            return RuleOutcome {
                appraisal_type: AppraisalType::NotEligible,
                reasoning: format!(
                    "{} leave hours reach the limit of {}",
                    hours.normalize(),
                    self.config.ineligible_leave_hours.normalize()
                ),
                details: serde_json::json!({
                    "leave_hours": hours.normalize().to_string(),
                    "ineligible_leave_hours": self.config.ineligible_leave_hours.normalize().to_string(),
                }),
            };
        }

        let Some(hire_date) = facts.hire_date else {
            return RuleOutcome {
                appraisal_type: self.config.missing_hire_date_type,
                reasoning: format!(
                    "No readable hire date; assigned {}",
                    self.config.missing_hire_date_type
                ),
                details: serde_json::json!({}),
            };
        };

        let probation_end = hire_date
            .checked_add_months(Months::new(self.config.probation_months))
            .unwrap_or(NaiveDate::MAX);
        let effective_start = probation_end.max(window.start);
        let period_days = (window.end - effective_start).num_days();
        let leave_days = hours
            .checked_div(self.config.leave_hours_per_day)
            .unwrap_or(hours);
        let work_days = Decimal::from(period_days) - leave_days;

        let appraisal_type = if work_days >= self.config.annual_min_days {
            AppraisalType::AnnualReview
        } else if work_days >= self.config.supplemental_min_days {
            AppraisalType::SupplementalReview
        } else {
            AppraisalType::NotEvaluated
        };

        RuleOutcome {
            appraisal_type,
            reasoning: format!(
                "Probation ends {}; {} days from {} to {} minus {} leave days = {} work days: {}",
                probation_end,
                period_days,
                effective_start,
                window.end,
                leave_days.normalize(),
                work_days.normalize(),
                appraisal_type
            ),
            details: serde_json::json!({
                "probation_end": probation_end.to_string(),
                "effective_start": effective_start.to_string(),
                "period_days": period_days,
                "leave_days": leave_days.normalize().to_string(),
                "work_days": work_days.normalize().to_string(),
            }),
        }
    }
}

/// The classified roster together with its audit records.
#[derive(Debug, Clone, Default)]
pub struct ClassificationResult {
    /// One record per roster row with an identifier, in row order.
    pub employees: Vec<EmployeeRecord>,
    /// One audit step per classified employee.
    pub audit_steps: Vec<AuditStep>,
    /// Unreadable dates encountered along the way.
    pub warnings: Vec<AuditWarning>,
    /// Rows below the header that were skipped for lack of an identifier.
    pub rows_skipped: usize,
}

/// Classifies every roster row below the header.
///
/// Rows without an identifier are skipped. Audit steps are numbered from
/// `first_step` upwards.
///
/// # Arguments
///
/// * `rows` - All rows of the roster sheet, header included
/// * `resolved` - The resolved roster header
/// * `leave` - Leave hours per employee identifier
/// * `rule` - The active rule set
/// * `window` - The appraisal year
/// * `first_step` - Step number of the first audit step emitted
pub fn classify_employees(
    rows: &[Row],
    resolved: &ResolvedHeader,
    leave: &LeaveAggregation,
    rule: &dyn ClassificationRule,
    window: &AppraisalWindow,
    first_step: u32,
) -> ClassificationResult {
    let header = &resolved.header;
    let mut result = ClassificationResult::default();
    let mut step_number = first_step;

    for (row_index, row) in rows.iter().enumerate().skip(resolved.row_index + 1) {
        let employee_id = header.text(row, Field::Id);
        if employee_id.is_empty() {
            debug!(row = row_index + 1, "Skipping roster row without identifier");
            result.rows_skipped += 1;
            continue;
        }

        let hire_date = read_date(
            header.cell(row, Field::HireDate),
            "hire date",
            &employee_id,
            row_index,
            &mut result.warnings,
        );
        // Without a hire date no date arithmetic runs, so LWOP cells are not read
        let lwop_days = if hire_date.is_some() && rule.uses_lwop() {
            lwop_days_for_row(
                row,
                resolved,
                window,
                &employee_id,
                row_index,
                &mut result.warnings,
            )
        } else {
            0
        };
        let facts = EmployeeFacts {
            hire_date,
            lwop_days,
            leave_hours: leave.hours_for(&employee_id),
        };

        let outcome = rule.classify(&facts, window);

        result.audit_steps.push(AuditStep {
            step_number,
            rule_id: rule.id().to_string(),
            rule_name: rule.name().to_string(),
            input: serde_json::json!({
                "employee_id": employee_id,
                "hire_date": facts.hire_date.map(|d| d.to_string()),
                "lwop_days": facts.lwop_days,
                "leave_hours": facts.leave_hours.normalize().to_string(),
            }),
            output: serde_json::json!({
                "appraisal_type": outcome.appraisal_type,
                "label": outcome.appraisal_type.label(),
                "details": outcome.details,
            }),
            reasoning: outcome.reasoning,
        });
        step_number += 1;

        result.employees.push(EmployeeRecord {
            name: header.text(row, Field::Name),
            department: header.text(row, Field::Department),
            job_title: header.text(row, Field::JobTitle),
            hire_date: facts.hire_date,
            total_leave: facts.leave_hours,
            appraisal_type: outcome.appraisal_type,
            level: header.text(row, Field::Level),
            item_category: header.text(row, Field::ItemCategory),
            employee_id,
        });
    }

    result
}

/// Computes leave-without-pay days for one roster row.
///
/// Nothing is counted unless the start cell holds a value. An empty end
/// cell means the leave is still running. If either present value cannot
/// be read the row counts zero days.
fn lwop_days_for_row(
    row: &[Cell],
    resolved: &ResolvedHeader,
    window: &AppraisalWindow,
    employee_id: &str,
    row_index: usize,
    warnings: &mut Vec<AuditWarning>,
) -> i64 {
    let header = &resolved.header;
    let Some(start) = read_date(
        header.cell(row, Field::LwopStart),
        "leave-without-pay start",
        employee_id,
        row_index,
        warnings,
    ) else {
        return 0;
    };

    let end_cell = header.cell(row, Field::LwopEnd);
    let end = match parse_cell_date(end_cell) {
        CellDate::Empty => None,
        CellDate::Date(end) => Some(end),
        CellDate::Unparseable(raw) => {
            push_date_warning(warnings, "leave-without-pay end", &raw, employee_id, row_index);
            return 0;
        }
    };

    window.lwop_days(start, end)
}

fn read_date(
    cell: &Cell,
    what: &str,
    employee_id: &str,
    row_index: usize,
    warnings: &mut Vec<AuditWarning>,
) -> Option<NaiveDate> {
    match parse_cell_date(cell) {
        CellDate::Date(date) => Some(date),
        CellDate::Empty => None,
        CellDate::Unparseable(raw) => {
            push_date_warning(warnings, what, &raw, employee_id, row_index);
            None
        }
    }
}

fn push_date_warning(
    warnings: &mut Vec<AuditWarning>,
    what: &str,
    raw: &str,
    employee_id: &str,
    row_index: usize,
) {
    warn!(employee_id, row = row_index + 1, value = raw, "Unreadable {}", what);
    warnings.push(AuditWarning::at_row(
        WARNING_DATE_PARSE_FAILURE,
        format!("Unreadable {} '{}' for employee {}", what, raw, employee_id),
        "medium",
        row_index,
    ));
}
