//! Core data models for the shift planner.
//!
//! This module contains all the domain records the planner stores and reports on.

mod absence;
mod employee;
mod lateness;
mod period;
mod record;
mod report;
mod shift;

pub use absence::{Absence, AbsenceKind};
pub use employee::{Employee, EmployeeId};
pub use lateness::{Lateness, Overtime};
pub use period::DateRange;
pub use record::{RecordId, Stored};
pub use report::{EmployeeHours, HoursReport, minutes_to_hours};
pub use shift::Shift;
