//! Hours report models.
//!
//! This module contains the [`HoursReport`] produced by the aggregator and
//! its per-employee [`EmployeeHours`] rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::employee::EmployeeId;
use super::period::DateRange;

/// Converts whole minutes to hours rounded to two decimal places.
///
/// # Example
///
/// ```
/// use shift_planner::models::minutes_to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(minutes_to_hours(2325), Decimal::new(3875, 2)); // 38.75
/// assert_eq!(minutes_to_hours(20), Decimal::new(33, 2)); // 0.33
/// ```
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(2)
}

/// Minute totals and derived hours for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeHours {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The employee's display name.
    pub name: String,
    /// Scheduled minutes net of breaks.
    pub planned_minutes: i64,
    /// Scheduled minutes falling on absence days.
    pub absence_minutes: i64,
    /// Minutes of late arrival.
    pub lateness_minutes: i64,
    /// Logged overtime minutes.
    pub overtime_minutes: i64,
    /// `planned_minutes` in hours.
    pub planned_hours: Decimal,
    /// `absence_minutes` in hours.
    pub absence_hours: Decimal,
    /// `lateness_minutes` in hours.
    pub lateness_hours: Decimal,
    /// `overtime_minutes` in hours.
    pub overtime_hours: Decimal,
    /// `(planned - absence - lateness + overtime) / 60`, rounded to 2 places.
    pub remaining_hours: Decimal,
}

impl EmployeeHours {
    /// Builds a row from minute totals, deriving every hour figure.
    pub fn from_minutes(
        employee_id: EmployeeId,
        name: impl Into<String>,
        planned_minutes: i64,
        absence_minutes: i64,
        lateness_minutes: i64,
        overtime_minutes: i64,
    ) -> Self {
        // Overtime adds to the balance; absence and lateness draw it down.
        let remaining = planned_minutes - absence_minutes - lateness_minutes + overtime_minutes;
        Self {
            employee_id,
            name: name.into(),
            planned_minutes,
            absence_minutes,
            lateness_minutes,
            overtime_minutes,
            planned_hours: minutes_to_hours(planned_minutes),
            absence_hours: minutes_to_hours(absence_minutes),
            lateness_hours: minutes_to_hours(lateness_minutes),
            overtime_hours: minutes_to_hours(overtime_minutes),
            remaining_hours: minutes_to_hours(remaining),
        }
    }
}

/// The aggregated hours report for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursReport {
    /// The reported range.
    pub range: DateRange,
    /// One row per active employee, ordered by employee id.
    pub rows: Vec<EmployeeHours>,
    /// Records left out because their data could not be used.
    pub skipped_records: usize,
}

impl HoursReport {
    /// Looks up the row of one employee.
    pub fn row(&self, employee_id: EmployeeId) -> Option<&EmployeeHours> {
        self.rows.iter().find(|r| r.employee_id == employee_id)
    }
}
