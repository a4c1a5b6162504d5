//! Request types for the shift planner API.
//!
//! Bulk saves take the editable row types from [`crate::planner`] directly
//! as a JSON array body; this module holds the query strings and the
//! remaining request bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlannerResult;
use crate::models::{DateRange, Employee, EmployeeId};
use crate::planner::EmployeeUpdate;

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD` query string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangeQuery {
    /// First day (inclusive).
    pub from: NaiveDate,
    /// Last day (inclusive).
    pub to: NaiveDate,
}

impl RangeQuery {
    /// Validates the query into a range.
    pub fn range(&self) -> PlannerResult<DateRange> {
        DateRange::new(self.from, self.to)
    }
}

/// Query string of `GET /employees`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EmployeeListQuery {
    /// List only active employees.
    #[serde(default)]
    pub active_only: bool,
}

/// Request body for `POST /weeks/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateWeekRequest {
    /// The Monday starting the week.
    pub week_start: NaiveDate,
}

/// Request body for `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Id of the new employee.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Whether the employee starts active.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Request body for `PUT /employees/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New active flag.
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<CreateEmployeeRequest> for Employee {
    fn from(req: CreateEmployeeRequest) -> Self {
        Employee {
            id: req.id,
            name: req.name,
            active: req.active,
        }
    }
}

impl From<UpdateEmployeeRequest> for EmployeeUpdate {
    fn from(req: UpdateEmployeeRequest) -> Self {
        EmployeeUpdate {
            name: req.name,
            active: req.active,
        }
    }
}
