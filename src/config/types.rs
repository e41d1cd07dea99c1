//! Configuration types for appraisal reconciliation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AppraisalType, Cell};

/// A logical column the engine reads from a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Employee identifier (工號).
    Id,
    /// Employee name.
    Name,
    /// Department.
    Department,
    /// Job title.
    JobTitle,
    /// Hire date.
    HireDate,
    /// Grade or class tag.
    Level,
    /// First day of leave without pay.
    LwopStart,
    /// Return date from leave without pay.
    LwopEnd,
    /// Quota category tag.
    ItemCategory,
    /// Total leave hours on the leave report.
    LeaveTotal,
}

impl Field {
    /// Returns the field's configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Department => "department",
            Field::JobTitle => "job_title",
            Field::HireDate => "hire_date",
            Field::Level => "level",
            Field::LwopStart => "lwop_start",
            Field::LwopEnd => "lwop_end",
            Field::ItemCategory => "item_category",
            Field::LeaveTotal => "leave_total",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a keyword is compared against a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatchMode {
    /// The cell's text contains the keyword as a substring.
    #[default]
    Contains,
    /// The cell's trimmed text equals the keyword.
    Exact,
}

impl KeywordMatchMode {
    /// Returns true if `cell` matches `keyword` under this mode.
    ///
    /// # Example
    ///
    /// ```
    /// use appraisal_engine::config::KeywordMatchMode;
    /// use appraisal_engine::models::Cell;
    ///
    /// let cell = Cell::from("員工工號");
    /// assert!(KeywordMatchMode::Contains.matches(&cell, "工號"));
    /// assert!(!KeywordMatchMode::Exact.matches(&cell, "工號"));
    /// ```
    pub fn matches(&self, cell: &Cell, keyword: &str) -> bool {
        match self {
            KeywordMatchMode::Contains => cell.contains(keyword),
            KeywordMatchMode::Exact => cell.equals(keyword),
        }
    }

    /// Returns true if any cell of `row` matches `keyword`.
    pub fn row_has(&self, row: &[Cell], keyword: &str) -> bool {
        row.iter().any(|cell| self.matches(cell, keyword))
    }
}

/// How to find one logical column in a header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// The logical field.
    pub field: Field,
    /// Header keywords in priority order.
    pub keywords: Vec<String>,
    /// Whether this field must appear on a row for it to count as the header row.
    #[serde(default)]
    pub detect: bool,
    /// Whether the sheet is unusable without this column.
    #[serde(default)]
    pub mandatory: bool,
    /// Column index to use when no keyword matches and the header row is wide enough.
    #[serde(default)]
    pub positional_fallback: Option<usize>,
}

/// Layout description for one of the input sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    /// Keywords that must all appear on one row near the top of the sheet.
    pub sheet_keywords: Vec<String>,
    /// Keyword comparison used for both sheet location and header detection.
    #[serde(default)]
    pub match_mode: KeywordMatchMode,
    /// Whether a missing sheet falls back to empty data instead of failing the run.
    #[serde(default)]
    pub optional: bool,
    /// Columns to resolve.
    pub fields: Vec<FieldSpec>,
}

impl SheetSpec {
    /// Returns the spec for `field`, if configured.
    pub fn field(&self, field: Field) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Returns the fields used to detect the header row.
    pub fn detection_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.detect)
    }

    /// Returns every detection keyword, flattened, for diagnostics.
    pub fn detection_keywords(&self) -> Vec<String> {
        self.detection_fields()
            .flat_map(|f| f.keywords.iter().cloned())
            .collect()
    }
}

fn default_scan_rows() -> usize {
    20
}

/// Sheet layout configuration from sheets.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// How many rows from the top are inspected for markers and headers.
    #[serde(default = "default_scan_rows")]
    pub scan_rows: usize,
    /// The employee roster layout.
    pub employee: SheetSpec,
    /// The leave report layout.
    pub leave: SheetSpec,
}

/// The available classification rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetKind {
    /// Service days since hire, reduced by leave without pay.
    ServiceDays,
    /// Accumulated leave hours plus a probation period.
    LeaveHours,
}

impl RuleSetKind {
    /// Returns the rule set's configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSetKind::ServiceDays => "service_days",
            RuleSetKind::LeaveHours => "leave_hours",
        }
    }
}

impl std::fmt::Display for RuleSetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the service-days rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDaysRuleConfig {
    /// Minimum service days in the year for a supplemental review.
    pub min_service_days: i64,
    /// Type assigned when service falls short of the minimum.
    pub short_service_type: AppraisalType,
    /// Type assigned when the hire date is missing or unreadable.
    pub missing_hire_date_type: AppraisalType,
}

/// Parameters of the leave-hours rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveHoursRuleConfig {
    /// Leave hours at or above which the employee is not eligible.
    pub ineligible_leave_hours: Decimal,
    /// Probation length in months, counted from the hire date.
    pub probation_months: u32,
    /// Minimum work days for an annual review.
    pub annual_min_days: Decimal,
    /// Minimum work days for a supplemental review.
    pub supplemental_min_days: Decimal,
    /// Divisor converting leave hours into the day count subtracted from the
    /// period. `1` subtracts hours directly.
    pub leave_hours_per_day: Decimal,
    /// Type assigned when the hire date is missing or unreadable.
    pub missing_hire_date_type: AppraisalType,
}

/// Appraisal settings from appraisal.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalSettings {
    /// The calendar year being appraised.
    pub appraisal_year: i32,
    /// Which rule set classifies employees.
    pub active_rule: RuleSetKind,
    /// Service-days rule parameters.
    pub service_days: ServiceDaysRuleConfig,
    /// Leave-hours rule parameters.
    pub leave_hours: LeaveHoursRuleConfig,
}

/// The complete configuration for a run.
///
/// Each run works on its own copy; the `with_*` methods return an adjusted
/// clone and leave `self` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AppraisalConfig {
    settings: AppraisalSettings,
    sheets: SheetsConfig,
}

impl AppraisalConfig {
    /// Creates a configuration from its component parts.
    pub fn new(settings: AppraisalSettings, sheets: SheetsConfig) -> Self {
        Self { settings, sheets }
    }

    /// Returns the appraisal settings.
    pub fn settings(&self) -> &AppraisalSettings {
        &self.settings
    }

    /// Returns the sheet layout configuration.
    pub fn sheets(&self) -> &SheetsConfig {
        &self.sheets
    }

    /// Returns the appraised year.
    pub fn appraisal_year(&self) -> i32 {
        self.settings.appraisal_year
    }

    /// Returns the active rule set.
    pub fn active_rule(&self) -> RuleSetKind {
        self.settings.active_rule
    }

    /// Returns a copy appraising `year` instead.
    pub fn with_year(&self, year: i32) -> Self {
        let mut config = self.clone();
        config.settings.appraisal_year = year;
        config
    }

    /// Returns a copy classifying with `rule` instead.
    pub fn with_rule(&self, rule: RuleSetKind) -> Self {
        let mut config = self.clone();
        config.settings.active_rule = rule;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_field_spec_defaults() {
        let yaml = "field: name\nkeywords: [中文姓名, 姓名]\n";
        let spec: FieldSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.field, Field::Name);
        assert_eq!(spec.keywords, vec!["中文姓名", "姓名"]);
        assert!(!spec.detect);
        assert!(!spec.mandatory);
        assert_eq!(spec.positional_fallback, None);
    }

    #[test]
    fn test_deserialize_sheet_spec_defaults_to_contains() {
        let yaml = r#"
sheet_keywords: [員工工號]
fields:
  - field: id
    keywords: [工號]
    detect: true
    mandatory: true
"#;
        let spec: SheetSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.match_mode, KeywordMatchMode::Contains);
        assert!(!spec.optional);
        assert_eq!(spec.detection_keywords(), vec!["工號"]);
        assert!(spec.field(Field::Id).unwrap().mandatory);
        assert!(spec.field(Field::Name).is_none());
    }

    #[test]
    fn test_exact_mode_requires_whole_cell() {
        let cell = Cell::from(" 合計 ");
        assert!(KeywordMatchMode::Exact.matches(&cell, "合計"));
        assert!(!KeywordMatchMode::Exact.matches(&Cell::from("請假合計"), "合計"));
        assert!(KeywordMatchMode::Contains.matches(&Cell::from("請假合計"), "合計"));
    }

    #[test]
    fn test_rule_set_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&RuleSetKind::LeaveHours).unwrap(),
            "\"leave_hours\""
        );
        assert_eq!(RuleSetKind::ServiceDays.to_string(), "service_days");
    }

    #[test]
    fn test_field_names_match_serde() {
        for field in [Field::Id, Field::HireDate, Field::LwopEnd, Field::ItemCategory] {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }
}
