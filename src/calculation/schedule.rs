//! Recurring weekly schedule generation.
//!
//! A generated week runs Monday through Saturday. Each active employee works
//! every one of those days except their weekly rest day and, on Saturdays,
//! the one Saturday of the month matching their off-Saturday rank.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use crate::config::ScheduleSettings;
use crate::models::{Employee, EmployeeId, Shift};

use super::time_utils::{nth_saturday_of_month, weekday_name};

/// Number of auto-scheduled days in a week; Sunday is never scheduled.
pub const SCHEDULED_DAYS: i64 = 6;

/// Computes the shifts still missing for the week starting at `week_start`.
///
/// `week_start` is expected to be a Monday; the caller rejects anything else
/// before getting here. Inactive employees are ignored. A shift is only
/// emitted for a (date, employee) pair with no shift among
/// `existing_shifts`, so running the generator again over its own output
/// yields nothing new.
///
/// # Example
///
/// ```
/// use shift_planner::calculation::generate_week;
/// use shift_planner::config::{ScheduleSettings, SeedConfig};
/// use shift_planner::models::Employee;
/// use chrono::NaiveDate;
///
/// let settings = ScheduleSettings::from_map(&SeedConfig::default().settings).unwrap();
/// let team = vec![Employee::new(1, "Employé A")];
/// let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
///
/// let first = generate_week(monday, &settings, &team, &[]);
/// // Wednesday is the rest day and Saturday 16th is the 3rd Saturday, which is off.
/// assert_eq!(first.len(), 4);
///
/// let second = generate_week(monday, &settings, &team, &first);
/// assert!(second.is_empty());
/// ```
pub fn generate_week(
    week_start: NaiveDate,
    settings: &ScheduleSettings,
    active_employees: &[Employee],
    existing_shifts: &[Shift],
) -> Vec<Shift> {
    let mut occupied: HashSet<(NaiveDate, EmployeeId)> = existing_shifts
        .iter()
        .map(|s| (s.date, s.employee_id))
        .collect();

    let mut generated = Vec::new();

    for offset in 0..SCHEDULED_DAYS {
        let day = week_start + Duration::days(offset);
        let weekday = day.weekday();

        for employee in active_employees.iter().filter(|e| e.active) {
            if weekday == settings.rest_day(employee.id) {
                debug!(
                    employee_id = employee.id,
                    date = %day,
                    rest_day = weekday_name(weekday),
                    "Skipping weekly rest day"
                );
                continue;
            }

            let hours = if weekday == Weekday::Sat {
                let rank = nth_saturday_of_month(day);
                if rank == settings.off_saturday_rank(employee.id) {
                    debug!(
                        employee_id = employee.id,
                        date = %day,
                        rank,
                        "Skipping off Saturday"
                    );
                    continue;
                }
                settings.saturday
            } else {
                settings.weekday
            };

            if !occupied.insert((day, employee.id)) {
                continue;
            }

            generated.push(Shift::new(
                day,
                employee.id,
                hours.start,
                hours.end,
                hours.break_minutes,
            ));
        }
    }

    generated
}
