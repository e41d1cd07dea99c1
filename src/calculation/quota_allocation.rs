//! Quota allocation per job category.
//!
//! Employees are bucketed by item category and appraisal type; each category
//! then receives tier 2..5 seats from a fixed proportional formula:
//!
//! ```text
//! E = D - d
//! F = floor(E * 0.25)
//! G = E - F
//! H = floor(G * 0.60)
//! I = ceil((G - H) + d / 2)
//! J = max(D - F - H - I, 0)
//! ```
//!
//! where `D` is every employee tagged with the category and `d` those among
//! the counted appraisal types who took leave.

use crate::models::{AppraisalType, CategoryCounts, CategoryQuota, EmployeeRecord};

/// The categories that take part in allocation, in output order.
pub const QUOTA_CATEGORIES: [&str; 5] = ["1", "2", "3", "4", "5"];

const TIER2_SHARE: f64 = 0.25;
const TIER3_SHARE: f64 = 0.60;

/// Buckets `employees` by category and computes the quota table.
///
/// Employees whose trimmed item category is not one of
/// [`QUOTA_CATEGORIES`] are ignored. Every employee in a category counts
/// toward its total; only annual, supplemental and special reviews fill the
/// per-type counters. All five categories are always returned, in order,
/// even when empty.
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::allocate_quotas;
///
/// let quotas = allocate_quotas(&[]);
/// assert_eq!(quotas.len(), 5);
/// assert_eq!(quotas[0].category, "1");
/// assert_eq!(quotas[0].tier5, 0);
/// ```
pub fn allocate_quotas(employees: &[EmployeeRecord]) -> Vec<CategoryQuota> {
    let mut buckets = [(CategoryCounts::default(), 0u32); QUOTA_CATEGORIES.len()];

    for employee in employees {
        let category = employee.item_category.trim();
        let Some(slot) = QUOTA_CATEGORIES.iter().position(|c| *c == category) else {
            continue;
        };
        let (counts, total) = &mut buckets[slot];
        let with_leave = employee.has_leave();

        match (employee.appraisal_type, with_leave) {
            (AppraisalType::AnnualReview, false) => counts.annual += 1,
            (AppraisalType::AnnualReview, true) => counts.annual_with_leave += 1,
            (AppraisalType::SupplementalReview, false) => counts.supplemental += 1,
            (AppraisalType::SupplementalReview, true) => counts.supplemental_with_leave += 1,
            (AppraisalType::SpecialReview, false) => counts.special += 1,
            (AppraisalType::SpecialReview, true) => counts.special_with_leave += 1,
            (AppraisalType::NotEvaluated | AppraisalType::NotEligible, _) => {}
        }
        *total += 1;
    }

    QUOTA_CATEGORIES
        .iter()
        .zip(buckets)
        .map(|(category, (counts, total))| compute_quota(category, counts, total))
        .collect()
}

/// Applies the allocation formula to one category.
///
/// `total_evaluated` is `D`; `d` is taken from `counts`. A `d` larger than
/// `D` is capped at `D`.
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::compute_quota;
/// use appraisal_engine::models::CategoryCounts;
///
/// let counts = CategoryCounts { annual: 8, annual_with_leave: 2, ..Default::default() };
/// let quota = compute_quota("1", counts, 10);
/// assert_eq!((quota.tier2, quota.tier3, quota.tier4, quota.tier5), (2, 3, 4, 1));
/// ```
pub fn compute_quota(category: &str, counts: CategoryCounts, total_evaluated: u32) -> CategoryQuota {
    let d_total = total_evaluated as f64;
    let d_leave = counts.with_leave().min(total_evaluated) as f64;

    let tier2_base = d_total - d_leave;
    let tier2 = (tier2_base * TIER2_SHARE).floor();
    let tier3_base = tier2_base - tier2;
    let tier3 = (tier3_base * TIER3_SHARE).floor();
    let tier4 = ((tier3_base - tier3) + d_leave / 2.0).ceil();
    let tier5 = (d_total - tier2 - tier3 - tier4).max(0.0);

    CategoryQuota {
        category: category.to_string(),
        counts,
        total_evaluated,
        leave_adjusted: d_leave as u32,
        tier2_base: tier2_base as u32,
        tier2: tier2 as u32,
        tier3_base: tier3_base as u32,
        tier3: tier3 as u32,
        tier4: tier4 as u32,
        tier5: tier5 as u32,
    }
}
