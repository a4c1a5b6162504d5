//! Absence model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::days_inclusive;
use crate::error::{PlannerError, PlannerResult};

use super::employee::EmployeeId;

/// Category of an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    /// Paid leave.
    Leave,
    /// Sick leave.
    Sick,
    /// Unpaid leave.
    Unpaid,
    /// Anything else.
    Other,
}

impl AbsenceKind {
    /// Reads a category label. Accepts the snake_case names and the French
    /// labels `Congé`, `Maladie`, `Sans solde` and `Autre`, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "leave" | "congé" | "conge" => Some(Self::Leave),
            "sick" | "maladie" => Some(Self::Sick),
            "unpaid" | "sans solde" => Some(Self::Unpaid),
            "other" | "autre" => Some(Self::Other),
            _ => None,
        }
    }

    /// The snake_case name, as stored.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Leave => "leave",
            Self::Sick => "sick",
            Self::Unpaid => "unpaid",
            Self::Other => "other",
        }
    }
}

/// An employee's absence over an inclusive date span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    /// First day absent (inclusive).
    pub start_date: NaiveDate,
    /// Last day absent (inclusive).
    pub end_date: NaiveDate,
    /// The absent employee.
    pub employee_id: EmployeeId,
    /// Category of the absence.
    pub kind: AbsenceKind,
    /// Whether the absence was justified.
    #[serde(default)]
    pub justified: bool,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
}

impl Absence {
    /// Every day covered by the absence.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        days_inclusive(self.start_date, self.end_date)
    }

    /// Checks that the span is not inverted.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.start_date > self.end_date {
            return Err(PlannerError::InvalidRecord {
                kind: "absence",
                message: format!(
                    "absence of employee {} starts {} after it ends {}",
                    self.employee_id, self.start_date, self.end_date
                ),
            });
        }
        Ok(())
    }
}
