//! Shift model.
//!
//! A shift is one scheduled work interval for one employee on one date.
//! Start and end always fall on the shift's own date.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calculation::{hhmm, minutes_between, planned_minutes};
use crate::error::{PlannerError, PlannerResult};

use super::employee::EmployeeId;

/// A scheduled work interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// The calendar date of the shift.
    pub date: NaiveDate,
    /// The employee working the shift.
    pub employee_id: EmployeeId,
    /// Start time, same day.
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// End time, same day.
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Unpaid break in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Whether this shift covers for a colleague.
    #[serde(default)]
    pub replacement: bool,
    /// The colleague being covered, if any.
    #[serde(default)]
    pub replaces_employee_id: Option<EmployeeId>,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
}

impl Shift {
    /// Creates a plain (non-replacement) shift with an empty comment.
    pub fn new(
        date: NaiveDate,
        employee_id: EmployeeId,
        start_time: NaiveTime,
        end_time: NaiveTime,
        break_minutes: u32,
    ) -> Self {
        Self {
            date,
            employee_id,
            start_time,
            end_time,
            break_minutes,
            replacement: false,
            replaces_employee_id: None,
            comment: String::new(),
        }
    }

    /// Scheduled minutes minus the break, floored at zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_planner::models::Shift;
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let shift = Shift::new(
    ///     NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
    ///     1,
    ///     NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
    ///     60,
    /// );
    /// assert_eq!(shift.planned_minutes(), 480);
    /// ```
    pub fn planned_minutes(&self) -> i64 {
        planned_minutes(self.start_time, self.end_time, self.break_minutes)
    }

    /// Checks the same-day and break invariants.
    pub fn validate(&self) -> PlannerResult<()> {
        let span = minutes_between(self.start_time, self.end_time);
        if span <= 0 {
            return Err(PlannerError::InvalidRecord {
                kind: "shift",
                message: format!(
                    "shift of employee {} on {}: end time must be after start time",
                    self.employee_id, self.date
                ),
            });
        }
        if i64::from(self.break_minutes) > span {
            return Err(PlannerError::InvalidRecord {
                kind: "shift",
                message: format!(
                    "shift of employee {} on {}: break of {} minutes exceeds the {} minute span",
                    self.employee_id, self.date, self.break_minutes, span
                ),
            });
        }
        if self.replaces_employee_id == Some(self.employee_id) {
            return Err(PlannerError::InvalidRecord {
                kind: "shift",
                message: format!(
                    "employee {} cannot replace themselves on {}",
                    self.employee_id, self.date
                ),
            });
        }
        Ok(())
    }
}
