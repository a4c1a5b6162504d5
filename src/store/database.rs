//! SQLite-backed planner tables.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::info;

use crate::calculation::format_hhmm;
use crate::config::SeedConfig;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    Absence, DateRange, Employee, EmployeeId, Lateness, Overtime, RecordId, Shift, Stored,
};

use super::records::{
    AbsenceRecord, EmployeeRecord, LatenessRecord, OvertimeRecord, ShiftRecord, TableRow,
    decode_rows,
};

/// The planner tables over an SQLite connection pool.
///
/// Every write runs in its own transaction: when a method returns an error
/// nothing it did is kept.
///
/// # Example
///
/// ```
/// use shift_planner::config::SeedConfig;
/// use shift_planner::store::Database;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let db = Database::in_memory(&SeedConfig::default()).await.unwrap();
/// assert_eq!(db.employees(true).await.unwrap().len(), 3);
/// let settings = db.settings().await.unwrap();
/// assert_eq!(settings.get("sat_end").map(String::as_str), Some("12:30"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Creates a database that lives only as long as this handle, seeded
    /// from `seed`.
    pub async fn in_memory(seed: &SeedConfig) -> PlannerResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(storage_error)?
            .foreign_keys(true);
        // Each in-memory connection is its own database, so keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(storage_error)?;
        Self::prepare(pool, seed).await
    }

    /// Opens the database file at `path`, creating it when missing.
    ///
    /// Empty employee and settings tables are seeded from `seed`.
    pub async fn open<P: AsRef<Path>>(path: P, seed: &SeedConfig) -> PlannerResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(storage_error)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        let db = Self::prepare(pool, seed).await?;
        info!(path = %path.display(), "Opened database");
        Ok(db)
    }

    async fn prepare(pool: SqlitePool, seed: &SeedConfig) -> PlannerResult<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(storage_error)?;
        let db = Self { pool };
        db.seed(seed).await?;
        Ok(db)
    }

    /// Fills the employee and settings tables from the seed, each only when
    /// it is empty.
    async fn seed(&self, seed: &SeedConfig) -> PlannerResult<()> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_error)?;
        let seed_employees = employees == 0;
        if seed_employees {
            for employee in &seed.employees {
                insert_employee_row(&mut tx, employee).await?;
            }
        }

        let settings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_error)?;
        let seed_settings = settings == 0;
        if seed_settings {
            for (key, value) in &seed.settings {
                upsert_setting(&mut tx, key, value).await?;
            }
        }

        tx.commit().await.map_err(storage_error)?;

        if seed_employees || seed_settings {
            info!(
                employees = seed_employees,
                settings = seed_settings,
                "Seeded empty tables"
            );
        }
        Ok(())
    }

    /// Lists employees ordered by id, optionally only the active ones.
    pub async fn employees(&self, active_only: bool) -> PlannerResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT id, name, active FROM employees WHERE active = 1 OR ?1 = 0 ORDER BY id",
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(decode_rows(rows))
    }

    /// Looks up one employee.
    pub async fn employee(&self, id: EmployeeId) -> PlannerResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT id, name, active FROM employees WHERE id = ?1",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.and_then(|r| decode_rows(vec![r]).pop()))
    }

    /// Adds an employee; fails with `DuplicateEmployee` when the id is taken.
    pub async fn insert_employee(&self, employee: &Employee) -> PlannerResult<()> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM employees WHERE id = ?1")
            .bind(i64::from(employee.id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error)?;
        if taken.is_some() {
            return Err(PlannerError::DuplicateEmployee { id: employee.id });
        }

        insert_employee_row(&mut tx, employee).await?;
        tx.commit().await.map_err(storage_error)
    }

    /// Overwrites an existing employee; fails with `EmployeeNotFound` otherwise.
    pub async fn update_employee(&self, employee: &Employee) -> PlannerResult<()> {
        let result = sqlx::query("UPDATE employees SET name = ?1, active = ?2 WHERE id = ?3")
            .bind(&employee.name)
            .bind(employee.active)
            .bind(i64::from(employee.id))
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            return Err(PlannerError::EmployeeNotFound { id: employee.id });
        }
        Ok(())
    }

    /// The raw settings map.
    pub async fn settings(&self) -> PlannerResult<BTreeMap<String, String>> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().collect())
    }

    /// Upserts the given keys, leaving every other key untouched.
    pub async fn save_settings(&self, updates: &BTreeMap<String, String>) -> PlannerResult<()> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        for (key, value) in updates {
            upsert_setting(&mut tx, key, value).await?;
        }
        tx.commit().await.map_err(storage_error)
    }

    /// Shifts dated within `range`, ordered by date then employee.
    pub async fn shifts(&self, range: DateRange) -> PlannerResult<Vec<Stored<Shift>>> {
        self.fetch_range::<ShiftRecord>(
            "SELECT id, shift_date, employee_id, start_time, end_time, break_minutes,
                    replacement, replaces_employee_id, comment
             FROM shifts
             WHERE shift_date BETWEEN ?1 AND ?2
             ORDER BY shift_date, employee_id, id",
            range,
        )
        .await
    }

    /// Absences overlapping `range`, ordered by start date.
    pub async fn absences(&self, range: DateRange) -> PlannerResult<Vec<Stored<Absence>>> {
        self.fetch_range::<AbsenceRecord>(
            "SELECT id, start_date, end_date, employee_id, type, justified, comment
             FROM absences
             WHERE end_date >= ?1 AND start_date <= ?2
             ORDER BY start_date, employee_id, id",
            range,
        )
        .await
    }

    /// Late arrivals dated within `range`.
    pub async fn lateness(&self, range: DateRange) -> PlannerResult<Vec<Stored<Lateness>>> {
        self.fetch_range::<LatenessRecord>(
            "SELECT id, late_date, employee_id, scheduled_time, arrival_time, justified, comment
             FROM lateness
             WHERE late_date BETWEEN ?1 AND ?2
             ORDER BY late_date, employee_id, id",
            range,
        )
        .await
    }

    /// Overtime entries dated within `range`.
    pub async fn overtime(&self, range: DateRange) -> PlannerResult<Vec<Stored<Overtime>>> {
        self.fetch_range::<OvertimeRecord>(
            "SELECT id, overtime_date, employee_id, minutes, reason
             FROM overtime
             WHERE overtime_date BETWEEN ?1 AND ?2
             ORDER BY overtime_date, employee_id, id",
            range,
        )
        .await
    }

    async fn fetch_range<R>(&self, sql: &str, range: DateRange) -> PlannerResult<Vec<R::Record>>
    where
        R: TableRow + for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let rows = sqlx::query_as::<_, R>(sql)
            .bind(iso(range.from))
            .bind(iso(range.to))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(decode_rows(rows))
    }

    /// Appends shifts, assigning fresh ids.
    pub async fn insert_shifts(&self, shifts: Vec<Shift>) -> PlannerResult<Vec<Stored<Shift>>> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        let mut saved = Vec::with_capacity(shifts.len());
        for shift in shifts {
            saved.push(insert_shift(&mut tx, shift).await?);
        }
        tx.commit().await.map_err(storage_error)?;
        Ok(saved)
    }

    /// Deletes the shifts dated within `range` and inserts `shifts` in their place.
    pub async fn replace_shifts(
        &self,
        range: DateRange,
        shifts: Vec<Shift>,
    ) -> PlannerResult<Vec<Stored<Shift>>> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        delete_range(
            &mut tx,
            "DELETE FROM shifts WHERE shift_date BETWEEN ?1 AND ?2",
            range,
        )
        .await?;
        let mut saved = Vec::with_capacity(shifts.len());
        for shift in shifts {
            saved.push(insert_shift(&mut tx, shift).await?);
        }
        tx.commit().await.map_err(storage_error)?;
        Ok(saved)
    }

    /// Deletes the absences overlapping `range` and inserts `absences` in their place.
    pub async fn replace_absences(
        &self,
        range: DateRange,
        absences: Vec<Absence>,
    ) -> PlannerResult<Vec<Stored<Absence>>> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        delete_range(
            &mut tx,
            "DELETE FROM absences WHERE end_date >= ?1 AND start_date <= ?2",
            range,
        )
        .await?;
        let mut saved = Vec::with_capacity(absences.len());
        for absence in absences {
            saved.push(insert_absence(&mut tx, absence).await?);
        }
        tx.commit().await.map_err(storage_error)?;
        Ok(saved)
    }

    /// Deletes the late arrivals dated within `range` and inserts `lateness`.
    pub async fn replace_lateness(
        &self,
        range: DateRange,
        lateness: Vec<Lateness>,
    ) -> PlannerResult<Vec<Stored<Lateness>>> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        delete_range(
            &mut tx,
            "DELETE FROM lateness WHERE late_date BETWEEN ?1 AND ?2",
            range,
        )
        .await?;
        let mut saved = Vec::with_capacity(lateness.len());
        for late in lateness {
            saved.push(insert_lateness(&mut tx, late).await?);
        }
        tx.commit().await.map_err(storage_error)?;
        Ok(saved)
    }

    /// Deletes the overtime entries dated within `range` and inserts `overtime`.
    pub async fn replace_overtime(
        &self,
        range: DateRange,
        overtime: Vec<Overtime>,
    ) -> PlannerResult<Vec<Stored<Overtime>>> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        delete_range(
            &mut tx,
            "DELETE FROM overtime WHERE overtime_date BETWEEN ?1 AND ?2",
            range,
        )
        .await?;
        let mut saved = Vec::with_capacity(overtime.len());
        for extra in overtime {
            saved.push(insert_overtime(&mut tx, extra).await?);
        }
        tx.commit().await.map_err(storage_error)?;
        Ok(saved)
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn storage_error(err: impl std::fmt::Display) -> PlannerError {
    PlannerError::StorageError {
        message: err.to_string(),
    }
}

fn stored_id(rowid: i64) -> PlannerResult<RecordId> {
    RecordId::try_from(rowid).map_err(storage_error)
}

async fn delete_range(conn: &mut SqliteConnection, sql: &str, range: DateRange) -> PlannerResult<()> {
    sqlx::query(sql)
        .bind(iso(range.from))
        .bind(iso(range.to))
        .execute(&mut *conn)
        .await
        .map_err(storage_error)?;
    Ok(())
}

async fn insert_employee_row(conn: &mut SqliteConnection, employee: &Employee) -> PlannerResult<()> {
    sqlx::query("INSERT INTO employees (id, name, active) VALUES (?1, ?2, ?3)")
        .bind(i64::from(employee.id))
        .bind(&employee.name)
        .bind(employee.active)
        .execute(&mut *conn)
        .await
        .map_err(storage_error)?;
    Ok(())
}

async fn upsert_setting(conn: &mut SqliteConnection, key: &str, value: &str) -> PlannerResult<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(&mut *conn)
    .await
    .map_err(storage_error)?;
    Ok(())
}

async fn insert_shift(conn: &mut SqliteConnection, shift: Shift) -> PlannerResult<Stored<Shift>> {
    let rowid = sqlx::query(
        "INSERT INTO shifts (
            shift_date,
            employee_id,
            start_time,
            end_time,
            break_minutes,
            replacement,
            replaces_employee_id,
            comment
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(iso(shift.date))
    .bind(i64::from(shift.employee_id))
    .bind(format_hhmm(shift.start_time))
    .bind(format_hhmm(shift.end_time))
    .bind(i64::from(shift.break_minutes))
    .bind(shift.replacement)
    .bind(shift.replaces_employee_id.map(i64::from))
    .bind(&shift.comment)
    .execute(&mut *conn)
    .await
    .map_err(storage_error)?
    .last_insert_rowid();
    Ok(Stored::new(stored_id(rowid)?, shift))
}

async fn insert_absence(
    conn: &mut SqliteConnection,
    absence: Absence,
) -> PlannerResult<Stored<Absence>> {
    let rowid = sqlx::query(
        "INSERT INTO absences (start_date, end_date, employee_id, type, justified, comment)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(iso(absence.start_date))
    .bind(iso(absence.end_date))
    .bind(i64::from(absence.employee_id))
    .bind(absence.kind.as_str())
    .bind(absence.justified)
    .bind(&absence.comment)
    .execute(&mut *conn)
    .await
    .map_err(storage_error)?
    .last_insert_rowid();
    Ok(Stored::new(stored_id(rowid)?, absence))
}

async fn insert_lateness(
    conn: &mut SqliteConnection,
    lateness: Lateness,
) -> PlannerResult<Stored<Lateness>> {
    let rowid = sqlx::query(
        "INSERT INTO lateness (late_date, employee_id, scheduled_time, arrival_time, justified, comment)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(iso(lateness.date))
    .bind(i64::from(lateness.employee_id))
    .bind(format_hhmm(lateness.scheduled_time))
    .bind(format_hhmm(lateness.arrival_time))
    .bind(lateness.justified)
    .bind(&lateness.comment)
    .execute(&mut *conn)
    .await
    .map_err(storage_error)?
    .last_insert_rowid();
    Ok(Stored::new(stored_id(rowid)?, lateness))
}

async fn insert_overtime(
    conn: &mut SqliteConnection,
    overtime: Overtime,
) -> PlannerResult<Stored<Overtime>> {
    let rowid = sqlx::query(
        "INSERT INTO overtime (overtime_date, employee_id, minutes, reason)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(iso(overtime.date))
    .bind(i64::from(overtime.employee_id))
    .bind(i64::from(overtime.minutes))
    .bind(&overtime.reason)
    .execute(&mut *conn)
    .await
    .map_err(storage_error)?
    .last_insert_rowid();
    Ok(Stored::new(stored_id(rowid)?, overtime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AbsenceKind;
    use chrono::NaiveTime;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_time(time_str: &str) -> NaiveTime {
        NaiveTime::parse_from_str(time_str, "%H:%M").unwrap()
    }

    fn range(from: &str, to: &str) -> DateRange {
        DateRange::new(make_date(from), make_date(to)).unwrap()
    }

    fn shift(date: &str, employee_id: EmployeeId) -> Shift {
        Shift::new(
            make_date(date),
            employee_id,
            make_time("07:30"),
            make_time("16:30"),
            60,
        )
    }

    fn absence(start: &str, end: &str) -> Absence {
        Absence {
            start_date: make_date(start),
            end_date: make_date(end),
            employee_id: 1,
            kind: AbsenceKind::Leave,
            justified: true,
            comment: String::new(),
        }
    }

    async fn seeded() -> Database {
        Database::in_memory(&SeedConfig::default())
            .await
            .expect("Failed to create in-memory database")
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("shift-planner-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_in_memory_is_seeded() {
        let db = seeded().await;
        let employees = db.employees(false).await.unwrap();
        assert_eq!(employees.len(), 3);
        assert_eq!(employees[0].name, "Employé A");
        assert_eq!(db.settings().await.unwrap()["rest_emp_3"], "TUESDAY");
    }

    #[tokio::test]
    async fn test_insert_duplicate_employee_is_rejected() {
        let db = seeded().await;
        let result = db.insert_employee(&Employee::new(2, "Again")).await;
        assert!(matches!(result, Err(PlannerError::DuplicateEmployee { id: 2 })));
        assert_eq!(db.employee(2).await.unwrap().unwrap().name, "Employé B");
    }

    #[tokio::test]
    async fn test_update_unknown_employee_is_rejected() {
        let db = seeded().await;
        let result = db.update_employee(&Employee::new(9, "Nobody")).await;
        assert!(matches!(result, Err(PlannerError::EmployeeNotFound { id: 9 })));
    }

    #[tokio::test]
    async fn test_active_only_filter() {
        let db = seeded().await;
        let mut second = db.employee(2).await.unwrap().unwrap();
        second.active = false;
        db.update_employee(&second).await.unwrap();

        let active: Vec<EmployeeId> = db
            .employees(true)
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(active, vec![1, 3]);
        assert_eq!(db.employees(false).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_save_settings_upserts() {
        let db = seeded().await;
        let updates = BTreeMap::from([
            ("weekday_break".to_string(), "45".to_string()),
            ("rest_emp_4".to_string(), "FRIDAY".to_string()),
        ]);
        db.save_settings(&updates).await.unwrap();

        let settings = db.settings().await.unwrap();
        assert_eq!(settings["weekday_break"], "45");
        assert_eq!(settings["rest_emp_4"], "FRIDAY");
        assert_eq!(settings["weekday_start"], "07:30");
    }

    #[tokio::test]
    async fn test_insert_shifts_assigns_increasing_ids() {
        let db = seeded().await;
        let stored = db
            .insert_shifts(vec![shift("2024-03-11", 1), shift("2024-03-11", 2)])
            .await
            .unwrap();
        assert!(stored[0].id < stored[1].id);

        let read = db.shifts(range("2024-03-11", "2024-03-11")).await.unwrap();
        assert_eq!(read, stored);
    }

    #[tokio::test]
    async fn test_replace_shifts_only_touches_range() {
        let db = seeded().await;
        db.insert_shifts(vec![
            shift("2024-03-10", 1),
            shift("2024-03-11", 1),
            shift("2024-03-12", 1),
        ])
        .await
        .unwrap();

        db.replace_shifts(range("2024-03-11", "2024-03-12"), vec![shift("2024-03-12", 2)])
            .await
            .unwrap();

        let all = db.shifts(range("2024-03-01", "2024-03-31")).await.unwrap();
        let pairs: Vec<_> = all.iter().map(|s| (s.date, s.employee_id)).collect();
        assert_eq!(
            pairs,
            vec![(make_date("2024-03-10"), 1), (make_date("2024-03-12"), 2)]
        );
    }

    #[tokio::test]
    async fn test_replace_absences_uses_overlap() {
        let db = seeded().await;
        db.replace_absences(
            range("2024-03-01", "2024-03-31"),
            vec![absence("2024-03-08", "2024-03-12"), absence("2024-03-20", "2024-03-21")],
        )
        .await
        .unwrap();

        assert_eq!(db.absences(range("2024-03-11", "2024-03-15")).await.unwrap().len(), 1);

        db.replace_absences(range("2024-03-11", "2024-03-15"), vec![])
            .await
            .unwrap();
        let left = db.absences(range("2024-03-01", "2024-03-31")).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].start_date, make_date("2024-03-20"));
    }

    #[tokio::test]
    async fn test_failed_replace_rolls_back() {
        let db = seeded().await;
        db.insert_shifts(vec![shift("2024-03-11", 1)]).await.unwrap();

        // Employee 99 breaks the foreign key after the delete already ran.
        let result = db
            .replace_shifts(
                range("2024-03-11", "2024-03-17"),
                vec![shift("2024-03-12", 2), shift("2024-03-13", 99)],
            )
            .await;
        assert!(matches!(result, Err(PlannerError::StorageError { .. })));

        let kept = db.shifts(range("2024-03-11", "2024-03-17")).await.unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, make_date("2024-03-11"));
    }

    #[tokio::test]
    async fn test_unreadable_rows_are_skipped() {
        let db = seeded().await;
        sqlx::query(
            "INSERT INTO lateness (late_date, employee_id, scheduled_time, arrival_time)
             VALUES ('2024-03-11', 1, '08:00', '08:20'), ('2024-03-12', 1, '08:00', 'late')",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        let lateness = db.lateness(range("2024-03-11", "2024-03-17")).await.unwrap();
        assert_eq!(lateness.len(), 1);
        assert_eq!(lateness[0].minutes_late(), 20);
    }

    #[tokio::test]
    async fn test_open_creates_and_reloads_file() {
        let dir = temp_dir();
        let path = dir.join("planner.db");
        {
            let db = Database::open(&path, &SeedConfig::default()).await.unwrap();
            db.insert_shifts(vec![shift("2024-03-11", 3)]).await.unwrap();
            db.pool.close().await;
        }

        let db = Database::open(&path, &SeedConfig::default()).await.unwrap();
        assert_eq!(db.employees(true).await.unwrap().len(), 3);
        let shifts = db.shifts(range("2024-03-11", "2024-03-11")).await.unwrap();
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].employee_id, 3);

        db.pool.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_reopen_does_not_reseed_edited_tables() {
        let dir = temp_dir();
        let path = dir.join("planner.db");
        {
            let db = Database::open(&path, &SeedConfig::default()).await.unwrap();
            db.update_employee(&Employee::new(1, "Alice")).await.unwrap();
            db.pool.close().await;
        }

        let db = Database::open(&path, &SeedConfig::default()).await.unwrap();
        assert_eq!(db.employee(1).await.unwrap().unwrap().name, "Alice");
        assert_eq!(db.employees(false).await.unwrap().len(), 3);

        db.pool.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }
}
