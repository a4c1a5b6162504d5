//! HTTP API module for the shift planner.
//!
//! This module provides the JSON endpoints over the planner service plus a
//! CSV download of the hours report.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{REPORT_FILE_NAME, create_router};
pub use request::{
    CreateEmployeeRequest, EmployeeListQuery, GenerateWeekRequest, RangeQuery,
    UpdateEmployeeRequest,
};
pub use response::{ApiError, GenerateWeekResponse, LatenessView};
pub use state::AppState;
