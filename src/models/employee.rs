//! Employee record and appraisal type.
//!
//! This module defines the [`EmployeeRecord`] produced for every roster row
//! with an identifier, and the closed [`AppraisalType`] enum it is classified
//! into.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The appraisal category an employee is placed in for the year.
///
/// Which variants a run can produce depends on the active classification
/// rule: the service-days rule yields the first three (or `NotEvaluated` in
/// place of `SpecialReview`), the leave-hours rule yields `AnnualReview`,
/// `SupplementalReview`, `NotEvaluated` and `NotEligible`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppraisalType {
    /// Full-year appraisal (年考).
    AnnualReview,
    /// Appraisal for a partial year of at least the service threshold (另考).
    SupplementalReview,
    /// Special appraisal for short service (特考).
    SpecialReview,
    /// Not appraised this year (不列考).
    NotEvaluated,
    /// Excluded by accumulated leave (不予考核).
    NotEligible,
}

impl AppraisalType {
    /// Returns the label used on the roster reports.
    ///
    /// # Example
    ///
    /// ```
    /// use appraisal_engine::models::AppraisalType;
    ///
    /// assert_eq!(AppraisalType::AnnualReview.label(), "年考");
    /// assert_eq!(AppraisalType::SpecialReview.label(), "特考");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            AppraisalType::AnnualReview => "年考",
            AppraisalType::SupplementalReview => "另考",
            AppraisalType::SpecialReview => "特考",
            AppraisalType::NotEvaluated => "不列考",
            AppraisalType::NotEligible => "不予考核",
        }
    }
}

impl std::fmt::Display for AppraisalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One classified employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Employee identifier (工號), never empty.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Job title.
    pub job_title: String,
    /// Hire date; serialises as `YYYY-MM-DD`, or null when absent.
    pub hire_date: Option<NaiveDate>,
    /// Total leave hours from the leave report, zero when the employee has no entry.
    /// Serialises as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_leave: Decimal,
    /// The assigned appraisal category.
    pub appraisal_type: AppraisalType,
    /// Grade or class tag, read verbatim.
    pub level: String,
    /// Quota category tag ("1".."5" when it takes part in allocation), read verbatim.
    pub item_category: String,
}

impl EmployeeRecord {
    /// Returns the hire date as `YYYY-MM-DD`, or an empty string.
    pub fn formatted_hire_date(&self) -> String {
        self.hire_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Returns true if the employee took any leave.
    pub fn has_leave(&self) -> bool {
        !self.total_leave.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record(hire_date: Option<NaiveDate>, total_leave: Decimal) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: "E001".to_string(),
            name: "王小明".to_string(),
            department: "總務處".to_string(),
            job_title: "專員".to_string(),
            hire_date,
            total_leave,
            appraisal_type: AppraisalType::AnnualReview,
            level: "A".to_string(),
            item_category: "3".to_string(),
        }
    }

    #[test]
    fn test_formatted_hire_date_is_iso() {
        let record = create_test_record(NaiveDate::from_ymd_opt(2023, 6, 1), Decimal::ZERO);
        assert_eq!(record.formatted_hire_date(), "2023-06-01");
    }

    #[test]
    fn test_formatted_hire_date_empty_when_absent() {
        let record = create_test_record(None, Decimal::ZERO);
        assert_eq!(record.formatted_hire_date(), "");
    }

    #[test]
    fn test_has_leave() {
        assert!(!create_test_record(None, Decimal::ZERO).has_leave());
        assert!(create_test_record(None, Decimal::new(8, 0)).has_leave());
    }

    #[test]
    fn test_appraisal_type_serialization() {
        assert_eq!(
            serde_json::to_string(&AppraisalType::SupplementalReview).unwrap(),
            "\"supplemental_review\""
        );
        assert_eq!(
            serde_json::to_string(&AppraisalType::NotEligible).unwrap(),
            "\"not_eligible\""
        );
    }

    #[test]
    fn test_serialized_hire_date_is_iso() {
        let record = create_test_record(NaiveDate::from_ymd_opt(2024, 8, 1), Decimal::ZERO);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["hire_date"], "2024-08-01");
        assert_eq!(json["total_leave"], 0.0);
    }

    #[test]
    fn test_total_leave_serializes_as_number() {
        let record = create_test_record(None, Decimal::new(125, 1));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["total_leave"].is_number());
        assert_eq!(json["total_leave"].as_f64(), Some(12.5));

        let back: EmployeeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.total_leave, Decimal::new(125, 1));
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(AppraisalType::SupplementalReview.to_string(), "另考");
    }
}
