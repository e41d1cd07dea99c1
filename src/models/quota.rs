//! Quota table models.
//!
//! A [`CategoryQuota`] is one row of the allocation table: how many employees
//! of a job category are appraised, and how many seats each tier (2 through 5)
//! receives.

use serde::{Deserialize, Serialize};

/// Appraisal-type counters for one category, split by whether the employee
/// took any leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// Annual review, no leave.
    pub annual: u32,
    /// Annual review, some leave.
    pub annual_with_leave: u32,
    /// Supplemental review, no leave.
    pub supplemental: u32,
    /// Supplemental review, some leave.
    pub supplemental_with_leave: u32,
    /// Special review, no leave.
    pub special: u32,
    /// Special review, some leave.
    pub special_with_leave: u32,
}

impl CategoryCounts {
    /// Returns the number of counted employees who took leave.
    pub fn with_leave(&self) -> u32 {
        self.annual_with_leave + self.supplemental_with_leave + self.special_with_leave
    }
}

/// One row of the quota table.
///
/// # Example
///
/// ```
/// use appraisal_engine::models::{CategoryCounts, CategoryQuota};
///
/// let quota = CategoryQuota {
///     category: "3".to_string(),
///     counts: CategoryCounts::default(),
///     total_evaluated: 10,
///     leave_adjusted: 2,
///     tier2_base: 8,
///     tier2: 2,
///     tier3_base: 6,
///     tier3: 3,
///     tier4: 4,
///     tier5: 1,
/// };
/// assert_eq!(quota.headcount_labels(), ["2 人", "3 人", "4 人", "1 人"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuota {
    /// Category label, "1" through "5".
    pub category: String,
    /// Per appraisal-type counters.
    pub counts: CategoryCounts,
    /// Employees appraised in this category (D).
    pub total_evaluated: u32,
    /// Employees with leave (d).
    pub leave_adjusted: u32,
    /// Base for the tier-2 quota (E = D - d).
    pub tier2_base: u32,
    /// Tier-2 seats (F).
    pub tier2: u32,
    /// Base for the tier-3 quota (G = E - F).
    pub tier3_base: u32,
    /// Tier-3 seats (H).
    pub tier3: u32,
    /// Tier-4 seats (I).
    pub tier4: u32,
    /// Tier-5 seats (J), absorbs rounding and never negative.
    pub tier5: u32,
}

impl CategoryQuota {
    /// Renders the tier 2..5 seat counts as headcount labels.
    pub fn headcount_labels(&self) -> [String; 4] {
        [self.tier2, self.tier3, self.tier4, self.tier5].map(format_headcount)
    }
}

/// Formats a seat count with the headcount unit, e.g. `"3 人"`.
pub fn format_headcount(count: u32) -> String {
    format!("{} 人", count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_leave_sums_leave_counters() {
        let counts = CategoryCounts {
            annual: 5,
            annual_with_leave: 1,
            supplemental: 2,
            supplemental_with_leave: 2,
            special: 0,
            special_with_leave: 3,
        };
        assert_eq!(counts.with_leave(), 6);
    }

    #[test]
    fn test_format_headcount() {
        assert_eq!(format_headcount(0), "0 人");
        assert_eq!(format_headcount(12), "12 人");
    }
}
