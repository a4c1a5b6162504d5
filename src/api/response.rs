//! Response types for the shift planner API.
//!
//! This module defines the error response structures, the mapping from
//! [`PlannerError`] to HTTP statuses, and the few response bodies that are
//! not plain models.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::{Lateness, Shift, Stored};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid query string error response.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PlannerError> for ApiErrorResponse {
    fn from(error: PlannerError) -> Self {
        let message = error.to_string();
        let (status, code, details) = match &error {
            PlannerError::ConfigNotFound { .. } | PlannerError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "The planner configuration could not be loaded",
            ),
            PlannerError::InvalidWeekStart { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_WEEK_START",
                "Weeks are generated from a Monday",
            ),
            PlannerError::InvalidTime { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_TIME",
                "Times are written as zero-padded HH:MM",
            ),
            PlannerError::InvalidSetting { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_SETTING",
                "The settings were left unchanged",
            ),
            PlannerError::DuplicateEmployee { .. } => (
                StatusCode::CONFLICT,
                "DUPLICATE_EMPLOYEE",
                "Choose an unused employee id",
            ),
            PlannerError::EmployeeNotFound { .. } => (
                StatusCode::NOT_FOUND,
                "EMPLOYEE_NOT_FOUND",
                "The employee id is not known to the planner",
            ),
            PlannerError::InvalidRecord { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_RECORD",
                "No rows were saved",
            ),
            PlannerError::InvalidRange { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_RANGE",
                "The range end must not precede its start",
            ),
            PlannerError::StorageError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "The data file could not be read or written",
            ),
            PlannerError::ExportError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXPORT_ERROR",
                "The report could not be rendered",
            ),
        };
        ApiErrorResponse {
            status,
            error: ApiError::with_details(code, message, details),
        }
    }
}

/// A stored late arrival with its derived lateness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatenessView {
    /// The stored record.
    #[serde(flatten)]
    pub lateness: Stored<Lateness>,
    /// Minutes late, never negative.
    pub late_minutes: i64,
}

impl From<Stored<Lateness>> for LatenessView {
    fn from(lateness: Stored<Lateness>) -> Self {
        let late_minutes = lateness.minutes_late();
        Self {
            lateness,
            late_minutes,
        }
    }
}

/// Response body of `POST /weeks/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateWeekResponse {
    /// The Monday the week starts on.
    pub week_start: NaiveDate,
    /// The shifts created; empty when the week was already complete.
    pub created: Vec<Stored<Shift>>,
}
