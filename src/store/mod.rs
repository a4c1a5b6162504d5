//! Persistence for planner data.
//!
//! [`Database`] keeps the six planner tables in SQLite. The schema lives in
//! `migrations/` and is applied whenever a database is opened.

mod database;
mod records;

pub use database::Database;
