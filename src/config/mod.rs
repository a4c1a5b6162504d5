//! Configuration loading and the typed schedule settings view.
//!
//! Application configuration (data file, bind address, seed records) comes
//! from a YAML file. Schedule settings live in the store as a flat
//! key/value table and are read through [`ScheduleSettings`].
//!
//! # Example
//!
//! ```no_run
//! use shift_planner::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/planner.yaml").unwrap();
//! println!("Seeding {} employees", loader.config().seed.employees.len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BusinessHours, DEFAULT_OFF_SATURDAY_RANK, DEFAULT_REST_DAY, MAX_BREAK_MINUTES, PlannerConfig,
    REST_PREFIX, SAT_BREAK, SAT_END, SAT_OFF_PREFIX, SAT_START, ScheduleSettings, SeedConfig,
    WEEKDAY_BREAK, WEEKDAY_END, WEEKDAY_START,
};
