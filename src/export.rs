//! CSV rendering of the hours report.

use serde::Serialize;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{EmployeeHours, EmployeeId, HoursReport};

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    employee_id: EmployeeId,
    name: &'a str,
    heures_prevues: String,
    absences_h: String,
    retards_h: String,
    heures_sup_h: String,
    heures_restantes: String,
}

impl<'a> From<&'a EmployeeHours> for CsvRow<'a> {
    fn from(row: &'a EmployeeHours) -> Self {
        Self {
            employee_id: row.employee_id,
            name: &row.name,
            heures_prevues: format!("{:.2}", row.planned_hours),
            absences_h: format!("{:.2}", row.absence_hours),
            retards_h: format!("{:.2}", row.lateness_hours),
            heures_sup_h: format!("{:.2}", row.overtime_hours),
            heures_restantes: format!("{:.2}", row.remaining_hours),
        }
    }
}

/// Renders the report as CSV, one line per employee row after the header.
///
/// Hours are written with two decimals.
///
/// # Example
///
/// ```
/// use shift_planner::export::report_to_csv;
/// use shift_planner::models::{DateRange, EmployeeHours, HoursReport};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
/// let report = HoursReport {
///     range: DateRange::new(day, day).unwrap(),
///     rows: vec![EmployeeHours::from_minutes(1, "Employé A", 480, 0, 0, 0)],
///     skipped_records: 0,
/// };
///
/// let csv = report_to_csv(&report).unwrap();
/// assert!(csv.ends_with("1,Employé A,8.00,0.00,0.00,0.00,8.00\n"));
/// ```
pub fn report_to_csv(report: &HoursReport) -> PlannerResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if report.rows.is_empty() {
        writer
            .write_record([
                "employee_id",
                "name",
                "heures_prevues",
                "absences_h",
                "retards_h",
                "heures_sup_h",
                "heures_restantes",
            ])
            .map_err(export_error)?;
    }
    for row in &report.rows {
        writer.serialize(CsvRow::from(row)).map_err(export_error)?;
    }
    let bytes = writer.into_inner().map_err(export_error)?;
    String::from_utf8(bytes).map_err(export_error)
}

fn export_error(err: impl std::fmt::Display) -> PlannerError {
    PlannerError::ExportError {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;
    use chrono::NaiveDate;

    fn report(rows: Vec<EmployeeHours>) -> HoursReport {
        let day = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        HoursReport {
            range: DateRange::new(day, day).unwrap(),
            rows,
            skipped_records: 0,
        }
    }

    const HEADER: &str =
        "employee_id,name,heures_prevues,absences_h,retards_h,heures_sup_h,heures_restantes";

    #[test]
    fn test_header_and_one_line_per_row() {
        let csv = report_to_csv(&report(vec![
            EmployeeHours::from_minutes(1, "Employé A", 2400, 120, 15, 60),
            EmployeeHours::from_minutes(2, "Employé B", 0, 0, 0, 0),
        ]))
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1,Employé A,40.00,2.00,0.25,1.00,38.75");
        assert_eq!(lines[2], "2,Employé B,0.00,0.00,0.00,0.00,0.00");
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let csv = report_to_csv(&report(vec![])).unwrap();
        assert_eq!(csv.trim_end(), HEADER);
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let csv = report_to_csv(&report(vec![EmployeeHours::from_minutes(
            7,
            "Martin, Jeanne",
            60,
            0,
            0,
            0,
        )]))
        .unwrap();
        assert!(csv.contains("7,\"Martin, Jeanne\",1.00"));
    }

    #[test]
    fn test_negative_remaining_hours() {
        let csv = report_to_csv(&report(vec![EmployeeHours::from_minutes(
            3, "Employé C", 0, 0, 17, 0,
        )]))
        .unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",0.28,0.00,-0.28"));
    }
}
