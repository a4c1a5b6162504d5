//! The planner service.
//!
//! [`Planner`] is the one entry point the HTTP API and the CLI go through. It
//! loads schedule settings fresh for every operation, feeds the generator and
//! the aggregator from the database, and runs bulk edits as replace-range saves.

mod rows;

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use tracing::{info, warn};

use crate::calculation::{self, ReportSources, SCHEDULED_DAYS};
use crate::config::ScheduleSettings;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    Absence, DateRange, Employee, EmployeeId, HoursReport, Lateness, Overtime, Shift, Stored,
};
use crate::store::Database;

pub use rows::{AbsenceRow, EditableRow, LatenessRow, OvertimeRow, ShiftRow};

/// Result of a bulk save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome<T> {
    /// The rows now stored for the range, with their fresh ids.
    pub saved: Vec<Stored<T>>,
    /// Submitted rows dropped for missing a required field.
    pub skipped: usize,
}

/// Changes to an existing employee. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
}

/// Coordinates the database, the schedule generator and the hours aggregator.
///
/// # Example
///
/// ```
/// use shift_planner::config::SeedConfig;
/// use shift_planner::planner::Planner;
/// use shift_planner::store::Database;
/// use chrono::NaiveDate;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let db = Database::in_memory(&SeedConfig::default()).await.unwrap();
/// let mut planner = Planner::new(db);
/// let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
///
/// let created = planner.generate_week(monday).await.unwrap();
/// assert_eq!(created.len(), 14);
/// assert!(planner.generate_week(monday).await.unwrap().is_empty());
/// # }
/// ```
#[derive(Debug)]
pub struct Planner {
    db: Database,
}

impl Planner {
    /// Wraps a database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Lists employees ordered by id.
    pub async fn employees(&self, active_only: bool) -> PlannerResult<Vec<Employee>> {
        self.db.employees(active_only).await
    }

    /// Adds an employee after validating it.
    pub async fn create_employee(&mut self, employee: Employee) -> PlannerResult<Employee> {
        employee.validate()?;
        self.db.insert_employee(&employee).await?;
        info!(employee_id = employee.id, name = %employee.name, "Employee created");
        Ok(employee)
    }

    /// Renames and/or (de)activates an employee.
    pub async fn update_employee(
        &mut self,
        id: EmployeeId,
        update: EmployeeUpdate,
    ) -> PlannerResult<Employee> {
        let mut employee = self
            .db
            .employee(id)
            .await?
            .ok_or(PlannerError::EmployeeNotFound { id })?;
        if let Some(name) = update.name {
            employee.name = name;
        }
        if let Some(active) = update.active {
            employee.active = active;
        }
        employee.validate()?;
        self.db.update_employee(&employee).await?;
        info!(employee_id = id, active = employee.active, "Employee updated");
        Ok(employee)
    }

    /// The raw settings map.
    pub async fn settings(&self) -> PlannerResult<BTreeMap<String, String>> {
        self.db.settings().await
    }

    /// The settings as the generator reads them.
    pub async fn schedule_settings(&self) -> PlannerResult<ScheduleSettings> {
        ScheduleSettings::from_map(&self.db.settings().await?)
    }

    /// Upserts settings keys.
    ///
    /// The merged map must still form valid schedule settings, otherwise
    /// nothing is written. Known keys are stored in their canonical form
    /// (`07:30`, `MONDAY`); unknown keys are stored as given.
    pub async fn save_settings(
        &mut self,
        updates: BTreeMap<String, String>,
    ) -> PlannerResult<ScheduleSettings> {
        let mut merged = self.db.settings().await?;
        merged.extend(updates.clone());
        let settings = ScheduleSettings::from_map(&merged)?;

        let canonical = settings.to_map();
        let updates: BTreeMap<String, String> = updates
            .into_iter()
            .map(|(key, value)| {
                let value = canonical.get(&key).cloned().unwrap_or(value);
                (key, value)
            })
            .collect();

        self.db.save_settings(&updates).await?;
        info!(keys = updates.len(), "Settings saved");
        Ok(settings)
    }

    /// Generates and stores the missing shifts of the week starting at
    /// `week_start`, returning the rows created.
    ///
    /// `week_start` must be a Monday; nothing is written otherwise.
    pub async fn generate_week(
        &mut self,
        week_start: NaiveDate,
    ) -> PlannerResult<Vec<Stored<Shift>>> {
        if week_start.weekday() != Weekday::Mon {
            return Err(PlannerError::InvalidWeekStart { date: week_start });
        }

        let settings = self.schedule_settings().await?;
        let employees = self.db.employees(true).await?;
        let week = DateRange::new(
            week_start,
            week_start + Duration::days(SCHEDULED_DAYS - 1),
        )?;
        let existing = records(self.db.shifts(week).await?);

        let generated = calculation::generate_week(week_start, &settings, &employees, &existing);
        let created = if generated.is_empty() {
            Vec::new()
        } else {
            self.db.insert_shifts(generated).await?
        };

        info!(
            week_start = %week_start,
            existing = existing.len(),
            created = created.len(),
            "Week generated"
        );
        Ok(created)
    }

    /// Builds the hours report for `range` from the stored records.
    pub async fn build_report(&self, range: DateRange) -> PlannerResult<HoursReport> {
        let employees = self.db.employees(false).await?;
        let shifts = records(self.db.shifts(range).await?);
        let absences = records(self.db.absences(range).await?);
        let lateness = records(self.db.lateness(range).await?);
        let overtime = records(self.db.overtime(range).await?);

        let report = calculation::build_report(
            range,
            ReportSources {
                employees: &employees,
                shifts: &shifts,
                absences: &absences,
                lateness: &lateness,
                overtime: &overtime,
            },
        );
        if report.skipped_records > 0 {
            warn!(
                from = %range.from,
                to = %range.to,
                skipped = report.skipped_records,
                "Report left out unusable records"
            );
        }
        info!(
            from = %range.from,
            to = %range.to,
            rows = report.rows.len(),
            "Report built"
        );
        Ok(report)
    }

    /// Shifts dated within `range`.
    pub async fn shifts(&self, range: DateRange) -> PlannerResult<Vec<Stored<Shift>>> {
        self.db.shifts(range).await
    }

    /// Absences overlapping `range`.
    pub async fn absences(&self, range: DateRange) -> PlannerResult<Vec<Stored<Absence>>> {
        self.db.absences(range).await
    }

    /// Late arrivals dated within `range`.
    pub async fn lateness(&self, range: DateRange) -> PlannerResult<Vec<Stored<Lateness>>> {
        self.db.lateness(range).await
    }

    /// Overtime entries dated within `range`.
    pub async fn overtime(&self, range: DateRange) -> PlannerResult<Vec<Stored<Overtime>>> {
        self.db.overtime(range).await
    }

    /// Replaces the shifts dated within `range` with `rows`.
    pub async fn save_shifts(
        &mut self,
        range: DateRange,
        rows: Vec<ShiftRow>,
    ) -> PlannerResult<SaveOutcome<Shift>> {
        let (records, skipped) = self.accept_rows(rows).await?;
        ensure_in_range(range, &records, |s| (s.date, s.date), ShiftRow::KIND)?;
        let saved = self.db.replace_shifts(range, records).await?;
        log_save(ShiftRow::KIND, range, saved.len(), skipped);
        Ok(SaveOutcome { saved, skipped })
    }

    /// Replaces the absences overlapping `range` with `rows`.
    ///
    /// Every submitted absence must overlap the range.
    pub async fn save_absences(
        &mut self,
        range: DateRange,
        rows: Vec<AbsenceRow>,
    ) -> PlannerResult<SaveOutcome<Absence>> {
        let (records, skipped) = self.accept_rows(rows).await?;
        ensure_in_range(
            range,
            &records,
            |a| (a.start_date, a.end_date),
            AbsenceRow::KIND,
        )?;
        let saved = self.db.replace_absences(range, records).await?;
        log_save(AbsenceRow::KIND, range, saved.len(), skipped);
        Ok(SaveOutcome { saved, skipped })
    }

    /// Replaces the late arrivals dated within `range` with `rows`.
    pub async fn save_lateness(
        &mut self,
        range: DateRange,
        rows: Vec<LatenessRow>,
    ) -> PlannerResult<SaveOutcome<Lateness>> {
        let (records, skipped) = self.accept_rows(rows).await?;
        ensure_in_range(range, &records, |l| (l.date, l.date), LatenessRow::KIND)?;
        let saved = self.db.replace_lateness(range, records).await?;
        log_save(LatenessRow::KIND, range, saved.len(), skipped);
        Ok(SaveOutcome { saved, skipped })
    }

    /// Replaces the overtime entries dated within `range` with `rows`.
    pub async fn save_overtime(
        &mut self,
        range: DateRange,
        rows: Vec<OvertimeRow>,
    ) -> PlannerResult<SaveOutcome<Overtime>> {
        let (records, skipped) = self.accept_rows(rows).await?;
        ensure_in_range(range, &records, |o| (o.date, o.date), OvertimeRow::KIND)?;
        let saved = self.db.replace_overtime(range, records).await?;
        log_save(OvertimeRow::KIND, range, saved.len(), skipped);
        Ok(SaveOutcome { saved, skipped })
    }

    /// Converts submitted rows, counting the ones dropped for a blank
    /// required field. Any other problem rejects the batch.
    async fn accept_rows<R: EditableRow>(
        &self,
        rows: Vec<R>,
    ) -> PlannerResult<(Vec<R::Record>, usize)> {
        let known: HashSet<EmployeeId> = self
            .db
            .employees(false)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0;
        for (index, row) in rows.into_iter().enumerate() {
            if let Some(id) = row.employee_refs().into_iter().find(|id| !known.contains(id)) {
                return Err(PlannerError::EmployeeNotFound { id });
            }
            match row.into_record()? {
                Some(record) => records.push(record),
                None => {
                    warn!(kind = R::KIND, index, "Skipping row with a blank required field");
                    skipped += 1;
                }
            }
        }
        Ok((records, skipped))
    }
}

fn records<T>(stored: Vec<Stored<T>>) -> Vec<T> {
    stored.into_iter().map(|s| s.record).collect()
}

/// Every record of a replace-range save must touch the range: `span_of`
/// gives its first and last day.
fn ensure_in_range<T>(
    range: DateRange,
    records: &[T],
    span_of: impl Fn(&T) -> (NaiveDate, NaiveDate),
    kind: &'static str,
) -> PlannerResult<()> {
    match records
        .iter()
        .map(span_of)
        .find(|(start, end)| !range.overlaps(*start, *end))
    {
        Some((start, end)) => {
            let dates = if start == end {
                format!("date {}", start)
            } else {
                format!("dates {}..{}", start, end)
            };
            Err(PlannerError::InvalidRecord {
                kind,
                message: format!("{} outside {}..{}", dates, range.from, range.to),
            })
        }
        None => Ok(()),
    }
}

fn log_save(kind: &'static str, range: DateRange, saved: usize, skipped: usize) {
    info!(
        kind,
        from = %range.from,
        to = %range.to,
        saved,
        skipped,
        "Rows saved"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedConfig;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn range(from: &str, to: &str) -> DateRange {
        DateRange::new(make_date(from), make_date(to)).unwrap()
    }

    async fn planner() -> Planner {
        let db = Database::in_memory(&SeedConfig::default())
            .await
            .expect("Failed to create in-memory database");
        Planner::new(db)
    }

    fn shift_row(date: &str, employee_id: EmployeeId) -> ShiftRow {
        ShiftRow {
            date: Some(make_date(date)),
            employee_id: Some(employee_id),
            start_time: "07:30".to_string(),
            end_time: "16:30".to_string(),
            break_minutes: 60,
            ..ShiftRow::default()
        }
    }

    fn absence_row(start: &str, end: &str, employee_id: EmployeeId) -> AbsenceRow {
        AbsenceRow {
            start_date: Some(make_date(start)),
            end_date: Some(make_date(end)),
            employee_id: Some(employee_id),
            kind: "Maladie".to_string(),
            justified: true,
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_generate_week_rejects_non_monday() {
        let mut planner = planner().await;
        match planner.generate_week(make_date("2024-03-13")).await {
            Err(PlannerError::InvalidWeekStart { date }) => {
                assert_eq!(date, make_date("2024-03-13"));
            }
            _ => panic!("Expected InvalidWeekStart error"),
        }
        let shifts = planner.shifts(range("2024-03-01", "2024-03-31")).await.unwrap();
        assert!(shifts.is_empty());
    }

    #[tokio::test]
    async fn test_generate_week_is_idempotent() {
        let mut planner = planner().await;
        let created = planner.generate_week(make_date("2024-03-11")).await.unwrap();
        assert_eq!(created.len(), 14);
        assert!(
            planner
                .generate_week(make_date("2024-03-11"))
                .await
                .unwrap()
                .is_empty()
        );
        let shifts = planner.shifts(range("2024-03-11", "2024-03-17")).await.unwrap();
        assert_eq!(shifts.len(), 14);
    }

    #[tokio::test]
    async fn test_generate_week_reads_current_settings() {
        let mut planner = planner().await;
        planner
            .save_settings(BTreeMap::from([(
                "rest_emp_1".to_string(),
                "MONDAY".to_string(),
            )]))
            .await
            .unwrap();
        let created = planner.generate_week(make_date("2024-03-11")).await.unwrap();
        assert!(
            !created
                .iter()
                .any(|s| s.employee_id == 1 && s.date == make_date("2024-03-11"))
        );
        assert!(
            created
                .iter()
                .any(|s| s.employee_id == 1 && s.date == make_date("2024-03-13"))
        );
    }

    #[tokio::test]
    async fn test_generate_week_skips_inactive_employee() {
        let mut planner = planner().await;
        planner
            .update_employee(
                2,
                EmployeeUpdate {
                    active: Some(false),
                    ..EmployeeUpdate::default()
                },
            )
            .await
            .unwrap();
        let created = planner.generate_week(make_date("2024-03-11")).await.unwrap();
        assert!(created.iter().all(|s| s.employee_id != 2));
    }

    #[tokio::test]
    async fn test_invalid_settings_are_not_saved() {
        let mut planner = planner().await;
        let result = planner
            .save_settings(BTreeMap::from([(
                "sat_off_emp_1".to_string(),
                "6".to_string(),
            )]))
            .await;
        assert!(matches!(result, Err(PlannerError::InvalidSetting { .. })));
        assert_eq!(planner.settings().await.unwrap()["sat_off_emp_1"], "3");
    }

    #[tokio::test]
    async fn test_settings_are_stored_in_canonical_form() {
        let mut planner = planner().await;
        planner
            .save_settings(BTreeMap::from([
                ("weekday_start".to_string(), "08:00:00".to_string()),
                ("rest_emp_2".to_string(), " FRIDAY ".to_string()),
                ("team_label".to_string(), "Boutique".to_string()),
            ]))
            .await
            .unwrap();

        let settings = planner.settings().await.unwrap();
        assert_eq!(settings["weekday_start"], "08:00");
        assert_eq!(settings["rest_emp_2"], "FRIDAY");
        assert_eq!(settings["team_label"], "Boutique");
        assert_eq!(settings["weekday_end"], "16:30");
    }

    #[tokio::test]
    async fn test_create_duplicate_employee_is_rejected() {
        let mut planner = planner().await;
        assert!(matches!(
            planner.create_employee(Employee::new(1, "Again")).await,
            Err(PlannerError::DuplicateEmployee { id: 1 })
        ));
        let created = planner
            .create_employee(Employee::new(4, "Employé D"))
            .await
            .unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(planner.employees(true).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_employee_renames() {
        let mut planner = planner().await;
        let updated = planner
            .update_employee(
                3,
                EmployeeUpdate {
                    name: Some("Claire".to_string()),
                    ..EmployeeUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Claire");
        assert!(updated.active);
    }

    #[tokio::test]
    async fn test_save_shifts_skips_blank_rows() {
        let mut planner = planner().await;
        let rows = vec![
            shift_row("2024-03-11", 1),
            ShiftRow {
                employee_id: None,
                ..shift_row("2024-03-12", 1)
            },
        ];
        let outcome = planner
            .save_shifts(range("2024-03-11", "2024-03-17"), rows)
            .await
            .unwrap();
        assert_eq!(outcome.saved.len(), 1);
        assert_eq!(outcome.skipped, 1);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_store_unchanged() {
        let mut planner = planner().await;
        planner.generate_week(make_date("2024-03-11")).await.unwrap();

        let rows = vec![
            shift_row("2024-03-11", 1),
            ShiftRow {
                end_time: "25:99".to_string(),
                ..shift_row("2024-03-12", 1)
            },
        ];
        let result = planner
            .save_shifts(range("2024-03-11", "2024-03-17"), rows)
            .await;
        assert!(matches!(result, Err(PlannerError::InvalidTime { .. })));
        let shifts = planner.shifts(range("2024-03-11", "2024-03-17")).await.unwrap();
        assert_eq!(shifts.len(), 14);
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_employee() {
        let mut planner = planner().await;
        let result = planner
            .save_shifts(
                range("2024-03-11", "2024-03-17"),
                vec![shift_row("2024-03-11", 9)],
            )
            .await;
        assert!(matches!(result, Err(PlannerError::EmployeeNotFound { id: 9 })));
    }

    #[tokio::test]
    async fn test_save_rejects_row_outside_range() {
        let mut planner = planner().await;
        let result = planner
            .save_shifts(
                range("2024-03-11", "2024-03-17"),
                vec![shift_row("2024-03-18", 1)],
            )
            .await;
        assert!(matches!(
            result,
            Err(PlannerError::InvalidRecord { kind: "shift", .. })
        ));
    }

    #[tokio::test]
    async fn test_save_absences_rejects_absence_outside_range() {
        let mut planner = planner().await;
        planner
            .save_absences(
                range("2024-03-11", "2024-03-17"),
                vec![absence_row("2024-03-12", "2024-03-13", 2)],
            )
            .await
            .unwrap();

        let result = planner
            .save_absences(
                range("2024-03-11", "2024-03-17"),
                vec![
                    absence_row("2024-03-08", "2024-03-11", 1),
                    absence_row("2024-03-20", "2024-03-22", 1),
                ],
            )
            .await;
        assert!(matches!(
            result,
            Err(PlannerError::InvalidRecord { kind: "absence", .. })
        ));

        // The earlier save is untouched.
        let kept = planner.absences(range("2024-03-01", "2024-03-31")).await.unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].employee_id, 2);
    }

    #[tokio::test]
    async fn test_resaving_listed_shifts_keeps_rows_and_renews_ids() {
        let mut planner = planner().await;
        let week = range("2024-03-11", "2024-03-17");
        planner.generate_week(make_date("2024-03-11")).await.unwrap();
        let before = planner.shifts(week).await.unwrap();

        let rows: Vec<ShiftRow> = before
            .iter()
            .map(|s| ShiftRow {
                date: Some(s.date),
                employee_id: Some(s.employee_id),
                start_time: s.start_time.format("%H:%M").to_string(),
                end_time: s.end_time.format("%H:%M").to_string(),
                break_minutes: s.break_minutes,
                replacement: s.replacement,
                replaces_employee_id: s.replaces_employee_id,
                comment: Some(s.comment.clone()),
            })
            .collect();
        let outcome = planner.save_shifts(week, rows).await.unwrap();
        assert_eq!(outcome.skipped, 0);

        let after = planner.shifts(week).await.unwrap();
        let records = |shifts: &[Stored<Shift>]| -> Vec<Shift> {
            shifts.iter().map(|s| s.record.clone()).collect()
        };
        assert_eq!(records(&after), records(&before));
        assert!(
            after
                .iter()
                .all(|s| before.iter().all(|old| old.id != s.id))
        );
    }

    #[tokio::test]
    async fn test_report_after_generation() {
        let mut planner = planner().await;
        planner.generate_week(make_date("2024-03-11")).await.unwrap();

        planner
            .save_absences(
                range("2024-03-11", "2024-03-17"),
                vec![absence_row("2024-03-10", "2024-03-12", 1)],
            )
            .await
            .unwrap();
        planner
            .save_lateness(
                range("2024-03-11", "2024-03-17"),
                vec![LatenessRow {
                    date: Some(make_date("2024-03-14")),
                    employee_id: Some(2),
                    scheduled_time: "07:30".to_string(),
                    arrival_time: "07:45".to_string(),
                    ..LatenessRow::default()
                }],
            )
            .await
            .unwrap();
        planner
            .save_overtime(
                range("2024-03-11", "2024-03-17"),
                vec![OvertimeRow {
                    date: Some(make_date("2024-03-15")),
                    employee_id: Some(3),
                    minutes: 60,
                    reason: Some("inventory".to_string()),
                }],
            )
            .await
            .unwrap();

        let report = planner
            .build_report(range("2024-03-11", "2024-03-17"))
            .await
            .unwrap();
        assert_eq!(report.rows.len(), 3);

        // Employee 1: Mon, Tue, Thu, Fri at 8h; absent Mon and Tue.
        let first = report.row(1).unwrap();
        assert_eq!(first.planned_hours, dec("32"));
        assert_eq!(first.absence_hours, dec("16"));
        assert_eq!(first.remaining_hours, dec("16"));

        // Employee 2: four weekdays at 8h plus Saturday 5h, 15 minutes late.
        let second = report.row(2).unwrap();
        assert_eq!(second.planned_hours, dec("37"));
        assert_eq!(second.remaining_hours, dec("36.75"));

        // Employee 3: four weekdays plus Saturday, one hour overtime.
        let third = report.row(3).unwrap();
        assert_eq!(third.remaining_hours, dec("38"));
    }
}
