//! Lateness and overtime models.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calculation::{hhmm, late_minutes};

use super::employee::EmployeeId;

/// A late arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lateness {
    /// The day of the late arrival.
    pub date: NaiveDate,
    /// The late employee.
    pub employee_id: EmployeeId,
    /// When the employee was due.
    #[serde(with = "hhmm")]
    pub scheduled_time: NaiveTime,
    /// When the employee actually arrived.
    #[serde(with = "hhmm")]
    pub arrival_time: NaiveTime,
    /// Whether the lateness was justified.
    #[serde(default)]
    pub justified: bool,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
}

impl Lateness {
    /// Minutes late, never negative.
    ///
    /// ```
    /// use shift_planner::models::Lateness;
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let late = Lateness {
    ///     date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
    ///     employee_id: 1,
    ///     scheduled_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    ///     arrival_time: NaiveTime::from_hms_opt(8, 17, 0).unwrap(),
    ///     justified: false,
    ///     comment: String::new(),
    /// };
    /// assert_eq!(late.minutes_late(), 17);
    /// ```
    pub fn minutes_late(&self) -> i64 {
        late_minutes(self.scheduled_time, self.arrival_time)
    }
}

/// Extra minutes worked on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overtime {
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// The employee who worked it.
    pub employee_id: EmployeeId,
    /// Extra minutes worked.
    pub minutes: u32,
    /// Why the overtime was worked.
    #[serde(default)]
    pub reason: String,
}
