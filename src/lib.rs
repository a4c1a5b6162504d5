//! Shift planner for a small team.
//!
//! This crate generates recurring weekly shift schedules from per-employee
//! rest days and off-Saturday rotations, and reconciles planned hours against
//! absences, late arrivals and overtime into an hours report.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod planner;
pub mod store;
