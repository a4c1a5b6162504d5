//! Editable rows submitted for bulk saves.
//!
//! Rows arrive loosely typed, as they would from a spreadsheet-like grid:
//! dates and employees may be blank and times are plain text. A row missing
//! one of its required fields is dropped; a row that is present but wrong
//! rejects the whole save.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::parse_hhmm;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{Absence, AbsenceKind, EmployeeId, Lateness, Overtime, Shift};

/// A submitted row that converts into a stored record.
pub trait EditableRow {
    /// The record the row turns into.
    type Record;

    /// Record kind used in error messages and logs.
    const KIND: &'static str;

    /// Converts the row.
    ///
    /// Returns `Ok(None)` when a required field is blank, and an error when
    /// a present field is malformed or the record breaks an invariant.
    fn into_record(self) -> PlannerResult<Option<Self::Record>>;

    /// Employees referenced by the row.
    fn employee_refs(&self) -> Vec<EmployeeId>;
}

/// An editable shift row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftRow {
    /// Shift date; the row is skipped when blank.
    pub date: Option<NaiveDate>,
    /// Employee working; the row is skipped when blank.
    pub employee_id: Option<EmployeeId>,
    /// `HH:MM` start.
    pub start_time: String,
    /// `HH:MM` end.
    pub end_time: String,
    /// Unpaid break in minutes.
    pub break_minutes: u32,
    /// Whether the shift covers for a colleague.
    pub replacement: bool,
    /// The colleague covered.
    pub replaces_employee_id: Option<EmployeeId>,
    /// Free-text comment.
    pub comment: Option<String>,
}

impl EditableRow for ShiftRow {
    type Record = Shift;
    const KIND: &'static str = "shift";

    fn into_record(self) -> PlannerResult<Option<Shift>> {
        let (Some(date), Some(employee_id)) = (self.date, self.employee_id) else {
            return Ok(None);
        };
        let shift = Shift {
            date,
            employee_id,
            start_time: parse_hhmm(&self.start_time)?,
            end_time: parse_hhmm(&self.end_time)?,
            break_minutes: self.break_minutes,
            replacement: self.replacement,
            replaces_employee_id: self.replaces_employee_id,
            comment: self.comment.unwrap_or_default(),
        };
        shift.validate()?;
        Ok(Some(shift))
    }

    fn employee_refs(&self) -> Vec<EmployeeId> {
        self.employee_id
            .into_iter()
            .chain(self.replaces_employee_id)
            .collect()
    }
}

/// An editable absence row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsenceRow {
    /// First day; the row is skipped when blank.
    pub start_date: Option<NaiveDate>,
    /// Last day (inclusive); the row is skipped when blank.
    pub end_date: Option<NaiveDate>,
    /// Absent employee; the row is skipped when blank.
    pub employee_id: Option<EmployeeId>,
    /// Category label, e.g. `"Maladie"` or `"sick"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the absence is justified.
    pub justified: bool,
    /// Free-text comment.
    pub comment: Option<String>,
}

impl EditableRow for AbsenceRow {
    type Record = Absence;
    const KIND: &'static str = "absence";

    fn into_record(self) -> PlannerResult<Option<Absence>> {
        let (Some(start_date), Some(end_date), Some(employee_id)) =
            (self.start_date, self.end_date, self.employee_id)
        else {
            return Ok(None);
        };
        let kind = AbsenceKind::from_label(&self.kind).ok_or_else(|| PlannerError::InvalidRecord {
            kind: Self::KIND,
            message: format!("unknown absence type '{}'", self.kind),
        })?;
        let absence = Absence {
            start_date,
            end_date,
            employee_id,
            kind,
            justified: self.justified,
            comment: self.comment.unwrap_or_default(),
        };
        absence.validate()?;
        Ok(Some(absence))
    }

    fn employee_refs(&self) -> Vec<EmployeeId> {
        self.employee_id.into_iter().collect()
    }
}

/// An editable late-arrival row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatenessRow {
    /// Day of the late arrival; the row is skipped when blank.
    pub date: Option<NaiveDate>,
    /// Late employee; the row is skipped when blank.
    pub employee_id: Option<EmployeeId>,
    /// `HH:MM` the employee was due.
    pub scheduled_time: String,
    /// `HH:MM` the employee arrived.
    pub arrival_time: String,
    /// Whether the lateness was justified.
    pub justified: bool,
    /// Free-text comment.
    pub comment: Option<String>,
}

impl EditableRow for LatenessRow {
    type Record = Lateness;
    const KIND: &'static str = "lateness";

    fn into_record(self) -> PlannerResult<Option<Lateness>> {
        let (Some(date), Some(employee_id)) = (self.date, self.employee_id) else {
            return Ok(None);
        };
        Ok(Some(Lateness {
            date,
            employee_id,
            scheduled_time: parse_hhmm(&self.scheduled_time)?,
            arrival_time: parse_hhmm(&self.arrival_time)?,
            justified: self.justified,
            comment: self.comment.unwrap_or_default(),
        }))
    }

    fn employee_refs(&self) -> Vec<EmployeeId> {
        self.employee_id.into_iter().collect()
    }
}

/// An editable overtime row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvertimeRow {
    /// Day worked; the row is skipped when blank.
    pub date: Option<NaiveDate>,
    /// Employee; the row is skipped when blank.
    pub employee_id: Option<EmployeeId>,
    /// Extra minutes worked.
    pub minutes: u32,
    /// Reason for the overtime.
    pub reason: Option<String>,
}

impl EditableRow for OvertimeRow {
    type Record = Overtime;
    const KIND: &'static str = "overtime";

    fn into_record(self) -> PlannerResult<Option<Overtime>> {
        let (Some(date), Some(employee_id)) = (self.date, self.employee_id) else {
            return Ok(None);
        };
        if self.minutes == 0 {
            return Err(PlannerError::InvalidRecord {
                kind: Self::KIND,
                message: "minutes must be positive".to_string(),
            });
        }
        Ok(Some(Overtime {
            date,
            employee_id,
            minutes: self.minutes,
            reason: self.reason.unwrap_or_default(),
        }))
    }

    fn employee_refs(&self) -> Vec<EmployeeId> {
        self.employee_id.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn shift_row() -> ShiftRow {
        ShiftRow {
            date: Some(make_date("2024-03-11")),
            employee_id: Some(1),
            start_time: "07:30".to_string(),
            end_time: "16:30".to_string(),
            break_minutes: 60,
            ..ShiftRow::default()
        }
    }

    #[test]
    fn test_shift_row_converts() {
        let shift = shift_row().into_record().unwrap().unwrap();
        assert_eq!(shift.planned_minutes(), 480);
        assert_eq!(shift.start_time, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert!(shift.comment.is_empty());
    }

    #[test]
    fn test_shift_row_without_date_is_skipped() {
        let row = ShiftRow {
            date: None,
            ..shift_row()
        };
        assert!(row.into_record().unwrap().is_none());
    }

    #[test]
    fn test_shift_row_with_bad_time_is_rejected() {
        let row = ShiftRow {
            start_time: "7h30".to_string(),
            ..shift_row()
        };
        match row.into_record() {
            Err(PlannerError::InvalidTime { value }) => assert_eq!(value, "7h30"),
            _ => panic!("Expected InvalidTime error"),
        }
    }

    #[test]
    fn test_shift_row_with_end_before_start_is_rejected() {
        let row = ShiftRow {
            end_time: "07:00".to_string(),
            ..shift_row()
        };
        assert!(matches!(
            row.into_record(),
            Err(PlannerError::InvalidRecord { kind: "shift", .. })
        ));
    }

    #[test]
    fn test_shift_row_refs_include_replaced_employee() {
        let row = ShiftRow {
            replacement: true,
            replaces_employee_id: Some(3),
            ..shift_row()
        };
        assert_eq!(row.employee_refs(), vec![1, 3]);
    }

    #[test]
    fn test_absence_row_accepts_french_label() {
        let row: AbsenceRow = serde_json::from_str(
            r#"{ "start_date": "2024-03-10", "end_date": "2024-03-12",
                 "employee_id": 1, "type": "Maladie", "justified": true }"#,
        )
        .unwrap();
        let absence = row.into_record().unwrap().unwrap();
        assert_eq!(absence.kind, AbsenceKind::Sick);
        assert_eq!(absence.days().count(), 3);
    }

    #[test]
    fn test_absence_row_missing_end_is_skipped() {
        let row = AbsenceRow {
            start_date: Some(make_date("2024-03-10")),
            employee_id: Some(1),
            kind: "Congé".to_string(),
            ..AbsenceRow::default()
        };
        assert!(row.into_record().unwrap().is_none());
    }

    #[test]
    fn test_absence_row_unknown_type_is_rejected() {
        let row = AbsenceRow {
            start_date: Some(make_date("2024-03-10")),
            end_date: Some(make_date("2024-03-10")),
            employee_id: Some(1),
            kind: "Vacances".to_string(),
            ..AbsenceRow::default()
        };
        assert!(matches!(
            row.into_record(),
            Err(PlannerError::InvalidRecord { kind: "absence", .. })
        ));
    }

    #[test]
    fn test_lateness_row_converts() {
        let row = LatenessRow {
            date: Some(make_date("2024-03-11")),
            employee_id: Some(2),
            scheduled_time: "08:00".to_string(),
            arrival_time: "08:17".to_string(),
            ..LatenessRow::default()
        };
        assert_eq!(row.into_record().unwrap().unwrap().minutes_late(), 17);
    }

    #[test]
    fn test_overtime_row_zero_minutes_is_rejected() {
        let row = OvertimeRow {
            date: Some(make_date("2024-03-11")),
            employee_id: Some(2),
            ..OvertimeRow::default()
        };
        assert!(row.into_record().is_err());
    }
}
