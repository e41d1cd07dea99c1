//! The appraisal year window and leave-without-pay overlap.
//!
//! Every date computation is anchored to an explicit appraisal year. The
//! [`AppraisalWindow`] holds its first and last day and clips
//! leave-without-pay intervals to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::validate_year;
use crate::error::EngineResult;

/// The inclusive date range of an appraisal year.
///
/// # Example
///
/// ```
/// use appraisal_engine::calculation::AppraisalWindow;
/// use chrono::NaiveDate;
///
/// let window = AppraisalWindow::for_year(2024).unwrap();
/// assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppraisalWindow {
    /// The appraised year.
    pub year: i32,
    /// January 1 of the year.
    pub start: NaiveDate,
    /// December 31 of the year.
    pub end: NaiveDate,
}

impl AppraisalWindow {
    /// Builds the window for `year`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for years outside 1900..=9999.
    pub fn for_year(year: i32) -> EngineResult<Self> {
        validate_year(year)?;
        // validate_year guarantees both dates exist
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
        Ok(Self { year, start, end })
    }

    /// Returns the number of leave-without-pay days that fall inside the year.
    ///
    /// A missing `end` means the employee is still on leave, so the interval
    /// runs to the last day of the year. Both ends are clipped to the window;
    /// the count is inclusive of both clipped ends, and zero when the
    /// clipped interval is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use appraisal_engine::calculation::AppraisalWindow;
    /// use chrono::NaiveDate;
    ///
    /// let window = AppraisalWindow::for_year(2024).unwrap();
    /// let start = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    /// assert_eq!(window.lwop_days(start, None), 31);
    /// ```
    pub fn lwop_days(&self, start: NaiveDate, end: Option<NaiveDate>) -> i64 {
        let end = end.unwrap_or(self.end);
        let clipped_start = start.max(self.start);
        let clipped_end = end.min(self.end);

        if clipped_end >= clipped_start {
            (clipped_end - clipped_start).num_days() + 1
        } else {
            0
        }
    }

    /// Returns the inclusive number of days from `from` to the end of the year.
    ///
    /// Negative when `from` is after the year.
    pub fn days_remaining_from(&self, from: NaiveDate) -> i64 {
        (self.end - from).num_days() + 1
    }
}
