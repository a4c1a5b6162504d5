//! Inclusive date ranges used to scope queries and reports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// An inclusive `[from, to]` calendar range.
///
/// # Example
///
/// ```
/// use shift_planner::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
/// )
/// .unwrap();
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
/// assert!(range.overlaps(day(8), day(11)));
/// assert!(!range.overlaps(day(21), day(22)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range (inclusive).
    pub from: NaiveDate,
    /// Last day of the range (inclusive).
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting one whose end precedes its start.
    pub fn new(from: NaiveDate, to: NaiveDate) -> PlannerResult<Self> {
        if to < from {
            return Err(PlannerError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Checks if `day` falls within the range (inclusive on both ends).
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.from && day <= self.to
    }

    /// Checks if `[start, end]` shares at least one day with the range.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        end >= self.from && start <= self.to
    }
}
