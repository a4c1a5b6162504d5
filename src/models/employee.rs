//! Employee model.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Integer identity of an employee.
pub type EmployeeId = u32;

/// A member of the team.
///
/// Inactive employees keep their historical records but are left out of
/// week generation and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Whether the employee is currently scheduled.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Creates an active employee.
    pub fn new(id: EmployeeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
        }
    }

    /// Checks the record before it is stored.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.id == 0 {
            return Err(PlannerError::InvalidRecord {
                kind: "employee",
                message: "id must be a positive integer".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(PlannerError::InvalidRecord {
                kind: "employee",
                message: format!("employee {} needs a name", self.id),
            });
        }
        Ok(())
    }
}
