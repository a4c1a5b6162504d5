//! Hours aggregation for reports.
//!
//! Reconciles planned shift minutes against absences, late arrivals and
//! logged overtime, producing one [`EmployeeHours`] row per active employee.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{
    Absence, DateRange, Employee, EmployeeHours, EmployeeId, HoursReport, Lateness, Overtime,
    Shift,
};

/// The records a report is built from.
///
/// Records outside the report range are tolerated and ignored, so callers
/// may pass wider sets than strictly needed.
#[derive(Debug, Clone, Copy)]
pub struct ReportSources<'a> {
    /// Every known employee; only active ones get a row.
    pub employees: &'a [Employee],
    /// Shifts, at least those dated within the range.
    pub shifts: &'a [Shift],
    /// Absences, at least those overlapping the range.
    pub absences: &'a [Absence],
    /// Late arrivals, at least those dated within the range.
    pub lateness: &'a [Lateness],
    /// Overtime entries, at least those dated within the range.
    pub overtime: &'a [Overtime],
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    planned: i64,
    absence: i64,
    lateness: i64,
    overtime: i64,
}

/// Builds the hours report for `range`.
///
/// # Behavior
///
/// - Planned minutes sum `max(0, end - start - break)` over shifts in range.
/// - Absence minutes walk every day of each overlapping absence's own span
///   and add the planned minutes of that employee's in-range shifts on that
///   day. A day without a shift adds nothing, and a day covered by two
///   absences is counted for each of them.
/// - Lateness minutes sum `max(0, arrival - scheduled)` over records in range.
/// - Overtime minutes sum the logged minutes over records in range.
/// - Shifts and absences breaking their invariants are skipped and counted
///   in [`HoursReport::skipped_records`].
///
/// # Example
///
/// ```
/// use shift_planner::calculation::{build_report, ReportSources};
/// use shift_planner::models::{DateRange, Employee, Shift};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
/// let employees = vec![Employee::new(1, "Employé A")];
/// let shifts = vec![Shift::new(
///     day,
///     1,
///     NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
///     NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
///     60,
/// )];
///
/// let report = build_report(
///     DateRange::new(day, day).unwrap(),
///     ReportSources {
///         employees: &employees,
///         shifts: &shifts,
///         absences: &[],
///         lateness: &[],
///         overtime: &[],
///     },
/// );
/// assert_eq!(report.rows[0].planned_hours, Decimal::from(8));
/// ```
pub fn build_report(range: DateRange, sources: ReportSources<'_>) -> HoursReport {
    let mut totals: BTreeMap<EmployeeId, Totals> = sources
        .employees
        .iter()
        .filter(|e| e.active)
        .map(|e| (e.id, Totals::default()))
        .collect();
    let mut skipped_records = 0;

    // Planned minutes per (employee, day), used again for absence accrual.
    let mut planned_by_day: HashMap<(EmployeeId, NaiveDate), i64> = HashMap::new();

    for shift in sources.shifts.iter().filter(|s| range.contains(s.date)) {
        if let Err(err) = shift.validate() {
            warn!(error = %err, "Skipping unusable shift in report");
            skipped_records += 1;
            continue;
        }
        let minutes = shift.planned_minutes();
        *planned_by_day
            .entry((shift.employee_id, shift.date))
            .or_insert(0) += minutes;
        if let Some(t) = totals.get_mut(&shift.employee_id) {
            t.planned += minutes;
        }
    }

    // Each absence record accrues on its own; overlapping records count a day twice.
    for absence in sources
        .absences
        .iter()
        .filter(|a| range.overlaps(a.start_date, a.end_date))
    {
        if let Err(err) = absence.validate() {
            warn!(error = %err, "Skipping unusable absence in report");
            skipped_records += 1;
            continue;
        }
        let Some(t) = totals.get_mut(&absence.employee_id) else {
            debug!(
                employee_id = absence.employee_id,
                "Ignoring absence of inactive or unknown employee"
            );
            continue;
        };
        for day in absence.days() {
            if let Some(minutes) = planned_by_day.get(&(absence.employee_id, day)) {
                t.absence += minutes;
            }
        }
    }

    for late in sources.lateness.iter().filter(|l| range.contains(l.date)) {
        if let Some(t) = totals.get_mut(&late.employee_id) {
            t.lateness += late.minutes_late();
        }
    }

    for extra in sources.overtime.iter().filter(|o| range.contains(o.date)) {
        if let Some(t) = totals.get_mut(&extra.employee_id) {
            t.overtime += i64::from(extra.minutes);
        }
    }

    let names: HashMap<EmployeeId, &str> = sources
        .employees
        .iter()
        .map(|e| (e.id, e.name.as_str()))
        .collect();

    let rows = totals
        .into_iter()
        .map(|(id, t)| {
            EmployeeHours::from_minutes(
                id,
                names.get(&id).copied().unwrap_or_default(),
                t.planned,
                t.absence,
                t.lateness,
                t.overtime,
            )
        })
        .collect();

    HoursReport {
        range,
        rows,
        skipped_records,
    }
}
