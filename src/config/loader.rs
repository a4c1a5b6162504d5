//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the planner
//! configuration from a YAML file.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{PlannerError, PlannerResult};

use super::types::{PlannerConfig, ScheduleSettings};

/// Loads and validates the planner configuration.
///
/// # File Layout
///
/// ```text
/// data_file: data/planner.db     # optional, in-memory database when absent
/// bind_address: 127.0.0.1:3000
/// seed:
///   employees:
///     - { id: 1, name: "Employé A" }
///   settings:
///     weekday_start: "07:30"
///     ...
/// ```
///
/// # Example
///
/// ```no_run
/// use shift_planner::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/planner.yaml").unwrap();
/// println!("Listening on {}", loader.config().bind_address);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PlannerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML
    /// - The seed data is inconsistent (duplicate employee ids, bad settings)
    pub fn load<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PlannerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            PlannerError::ConfigParseError { message, .. } => PlannerError::ConfigParseError {
                path: path_str,
                message,
            },
            other => other,
        })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> PlannerResult<Self> {
        let config: PlannerConfig =
            serde_yaml::from_str(content).map_err(|e| PlannerError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// Wraps an already-built configuration after validating its seed data.
    pub fn from_config(config: PlannerConfig) -> PlannerResult<Self> {
        let mut seen = HashSet::new();
        for employee in &config.seed.employees {
            employee.validate()?;
            if !seen.insert(employee.id) {
                return Err(PlannerError::DuplicateEmployee { id: employee.id });
            }
        }
        ScheduleSettings::from_map(&config.seed.settings)?;

        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/planner.yaml"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().seed.employees.len(), 3);
        assert_eq!(loader.config().seed.employees[0].name, "Employé A");
        assert_eq!(
            loader.config().seed.settings.get("rest_emp_1").map(String::as_str),
            Some("WEDNESDAY")
        );
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        match ConfigLoader::load("/nonexistent/planner.yaml") {
            Err(PlannerError::ConfigNotFound { path }) => {
                assert!(path.contains("planner.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("seed: [unclosed");
        assert!(matches!(
            result,
            Err(PlannerError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_duplicate_seed_employee_is_rejected() {
        let yaml = r#"
seed:
  employees:
    - { id: 1, name: "A" }
    - { id: 1, name: "B" }
"#;
        assert!(matches!(
            ConfigLoader::from_yaml_str(yaml),
            Err(PlannerError::DuplicateEmployee { id: 1 })
        ));
    }

    #[test]
    fn test_bad_seed_setting_is_rejected() {
        let yaml = r#"
seed:
  settings:
    weekday_start: "07:30"
    weekday_end: "16:30"
    weekday_break: "sixty"
    sat_start: "07:30"
    sat_end: "12:30"
    sat_break: "0"
"#;
        assert!(matches!(
            ConfigLoader::from_yaml_str(yaml),
            Err(PlannerError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let loader = ConfigLoader::from_yaml_str("{}").unwrap();
        assert_eq!(loader.config().bind_address, "127.0.0.1:3000");
        assert_eq!(loader.config().seed.settings.len(), 12);
    }
}
