//! Error types for the shift planner.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every rejected operation: bad user input, broken configuration and
//! storage failures.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the shift planner.
///
/// # Example
///
/// ```
/// use shift_planner::error::PlannerError;
///
/// let error = PlannerError::ConfigNotFound {
///     path: "/missing/planner.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/planner.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Week generation was requested for a date that is not a Monday.
    #[error("Week start {date} is not a Monday")]
    InvalidWeekStart {
        /// The rejected date.
        date: NaiveDate,
    },

    /// A time of day could not be read as zero-padded `HH:MM`.
    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime {
        /// The rejected input.
        value: String,
    },

    /// A schedule setting is missing or holds an unusable value.
    #[error("Invalid setting '{key}': {message}")]
    InvalidSetting {
        /// The settings key.
        key: String,
        /// What is wrong with the value.
        message: String,
    },

    /// An employee with this id already exists.
    #[error("Employee {id} already exists")]
    DuplicateEmployee {
        /// The duplicated id.
        id: u32,
    },

    /// No employee with this id exists.
    #[error("Employee {id} not found")]
    EmployeeNotFound {
        /// The unknown id.
        id: u32,
    },

    /// A submitted record breaks one of its invariants.
    #[error("Invalid {kind} record: {message}")]
    InvalidRecord {
        /// The record kind (shift, absence, lateness, overtime, employee).
        kind: &'static str,
        /// A description of the violation.
        message: String,
    },

    /// A date range whose end precedes its start.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Range start.
        from: NaiveDate,
        /// Range end.
        to: NaiveDate,
    },

    /// The database could not be opened, read or written.
    #[error("Storage error: {message}")]
    StorageError {
        /// A description of the failure.
        message: String,
    },

    /// The report could not be rendered to CSV.
    #[error("Export error: {message}")]
    ExportError {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return PlannerError.
pub type PlannerResult<T> = Result<T, PlannerError>;
