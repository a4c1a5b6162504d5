//! Table rows as SQLite hands them back, and their conversion to models.
//!
//! Dates and times are stored as text. A row whose text no longer parses is
//! dropped with a warning instead of failing the whole read.

use chrono::NaiveDate;
use sqlx::FromRow;
use tracing::warn;

use crate::calculation::parse_hhmm;
use crate::models::{
    Absence, AbsenceKind, Employee, EmployeeId, Lateness, Overtime, RecordId, Shift, Stored,
};

/// A raw table row that converts into a model.
pub(super) trait TableRow {
    type Record;

    const TABLE: &'static str;

    fn id(&self) -> i64;

    fn decode(self) -> Result<Self::Record, String>;
}

/// Converts fetched rows, dropping and logging the unreadable ones.
pub(super) fn decode_rows<R: TableRow>(rows: Vec<R>) -> Vec<R::Record> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id();
            match row.decode() {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(table = R::TABLE, id, error = %error, "Skipping unreadable row");
                    None
                }
            }
        })
        .collect()
}

fn date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", value))
}

fn employee_id(value: i64) -> Result<EmployeeId, String> {
    EmployeeId::try_from(value).map_err(|_| format!("{} is not an employee id", value))
}

fn record_id(value: i64) -> Result<RecordId, String> {
    RecordId::try_from(value).map_err(|_| format!("{} is not a record id", value))
}

fn minutes(value: i64) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("{} is not a number of minutes", value))
}

#[derive(Debug, FromRow)]
pub(super) struct EmployeeRecord {
    id: i64,
    name: String,
    active: bool,
}

impl TableRow for EmployeeRecord {
    type Record = Employee;

    const TABLE: &'static str = "employees";

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(self) -> Result<Employee, String> {
        Ok(Employee {
            id: employee_id(self.id)?,
            name: self.name,
            active: self.active,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ShiftRecord {
    id: i64,
    shift_date: String,
    employee_id: i64,
    start_time: String,
    end_time: String,
    break_minutes: i64,
    replacement: bool,
    replaces_employee_id: Option<i64>,
    comment: Option<String>,
}

impl TableRow for ShiftRecord {
    type Record = Stored<Shift>;

    const TABLE: &'static str = "shifts";

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(self) -> Result<Stored<Shift>, String> {
        let shift = Shift {
            date: date(&self.shift_date)?,
            employee_id: employee_id(self.employee_id)?,
            start_time: parse_hhmm(&self.start_time).map_err(|e| e.to_string())?,
            end_time: parse_hhmm(&self.end_time).map_err(|e| e.to_string())?,
            break_minutes: minutes(self.break_minutes)?,
            replacement: self.replacement,
            replaces_employee_id: self.replaces_employee_id.map(employee_id).transpose()?,
            comment: self.comment.unwrap_or_default(),
        };
        Ok(Stored::new(record_id(self.id)?, shift))
    }
}

#[derive(Debug, FromRow)]
pub(super) struct AbsenceRecord {
    id: i64,
    start_date: String,
    end_date: String,
    employee_id: i64,
    #[sqlx(rename = "type")]
    kind: String,
    justified: bool,
    comment: Option<String>,
}

impl TableRow for AbsenceRecord {
    type Record = Stored<Absence>;

    const TABLE: &'static str = "absences";

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(self) -> Result<Stored<Absence>, String> {
        let kind = AbsenceKind::from_label(&self.kind)
            .ok_or_else(|| format!("unknown absence type '{}'", self.kind))?;
        let absence = Absence {
            start_date: date(&self.start_date)?,
            end_date: date(&self.end_date)?,
            employee_id: employee_id(self.employee_id)?,
            kind,
            justified: self.justified,
            comment: self.comment.unwrap_or_default(),
        };
        Ok(Stored::new(record_id(self.id)?, absence))
    }
}

#[derive(Debug, FromRow)]
pub(super) struct LatenessRecord {
    id: i64,
    late_date: String,
    employee_id: i64,
    scheduled_time: String,
    arrival_time: String,
    justified: bool,
    comment: Option<String>,
}

impl TableRow for LatenessRecord {
    type Record = Stored<Lateness>;

    const TABLE: &'static str = "lateness";

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(self) -> Result<Stored<Lateness>, String> {
        let lateness = Lateness {
            date: date(&self.late_date)?,
            employee_id: employee_id(self.employee_id)?,
            scheduled_time: parse_hhmm(&self.scheduled_time).map_err(|e| e.to_string())?,
            arrival_time: parse_hhmm(&self.arrival_time).map_err(|e| e.to_string())?,
            justified: self.justified,
            comment: self.comment.unwrap_or_default(),
        };
        Ok(Stored::new(record_id(self.id)?, lateness))
    }
}

#[derive(Debug, FromRow)]
pub(super) struct OvertimeRecord {
    id: i64,
    overtime_date: String,
    employee_id: i64,
    minutes: i64,
    reason: Option<String>,
}

impl TableRow for OvertimeRecord {
    type Record = Stored<Overtime>;

    const TABLE: &'static str = "overtime";

    fn id(&self) -> i64 {
        self.id
    }

    fn decode(self) -> Result<Stored<Overtime>, String> {
        let overtime = Overtime {
            date: date(&self.overtime_date)?,
            employee_id: employee_id(self.employee_id)?,
            minutes: minutes(self.minutes)?,
            reason: self.reason.unwrap_or_default(),
        };
        Ok(Stored::new(record_id(self.id)?, overtime))
    }
}
