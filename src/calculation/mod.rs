//! Calculation logic for the shift planner.
//!
//! This module contains the two planning cores: weekly schedule generation
//! ([`generate_week`]) and hours aggregation ([`build_report`]), together with
//! the time arithmetic they share.

mod aggregation;
mod schedule;
mod time_utils;

pub use aggregation::{ReportSources, build_report};
pub use schedule::{SCHEDULED_DAYS, generate_week};
pub use time_utils::{
    days_inclusive, format_hhmm, hhmm, late_minutes, minutes_between, nth_saturday_of_month,
    parse_hhmm, parse_weekday_name, planned_minutes, weekday_name,
};
