//! Configuration types for the shift planner.
//!
//! Two layers live here: the application configuration deserialized from
//! `planner.yaml`, and the typed view over the flat key/value schedule
//! settings table that the generator consumes.

use chrono::{NaiveTime, Weekday};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::calculation::{
    format_hhmm, minutes_between, parse_hhmm, parse_weekday_name, weekday_name,
};
use crate::error::{PlannerError, PlannerResult};
use crate::models::{Employee, EmployeeId};

/// Settings key: weekday opening time.
pub const WEEKDAY_START: &str = "weekday_start";
/// Settings key: weekday closing time.
pub const WEEKDAY_END: &str = "weekday_end";
/// Settings key: weekday break minutes.
pub const WEEKDAY_BREAK: &str = "weekday_break";
/// Settings key: Saturday opening time.
pub const SAT_START: &str = "sat_start";
/// Settings key: Saturday closing time.
pub const SAT_END: &str = "sat_end";
/// Settings key: Saturday break minutes.
pub const SAT_BREAK: &str = "sat_break";
/// Prefix of the per-employee weekly rest day keys.
pub const REST_PREFIX: &str = "rest_emp_";
/// Prefix of the per-employee off-Saturday rank keys.
pub const SAT_OFF_PREFIX: &str = "sat_off_emp_";

/// Weekly rest day of an employee without a `rest_emp_<id>` key.
pub const DEFAULT_REST_DAY: Weekday = Weekday::Sun;
/// Off-Saturday rank of an employee without a `sat_off_emp_<id>` key.
pub const DEFAULT_OFF_SATURDAY_RANK: u32 = 3;
/// Longest break accepted in settings, in minutes.
pub const MAX_BREAK_MINUTES: u32 = 240;

/// Opening hours and break for one kind of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    /// Opening time.
    pub start: NaiveTime,
    /// Closing time, same day.
    pub end: NaiveTime,
    /// Unpaid break in minutes.
    pub break_minutes: u32,
}

impl BusinessHours {
    fn from_keys(
        map: &BTreeMap<String, String>,
        start_key: &str,
        end_key: &str,
        break_key: &str,
    ) -> PlannerResult<Self> {
        let start = parse_time_setting(map, start_key)?;
        let end = parse_time_setting(map, end_key)?;
        let raw_break = required(map, break_key)?;
        let break_minutes: u32 =
            raw_break
                .trim()
                .parse()
                .map_err(|_| PlannerError::InvalidSetting {
                    key: break_key.to_string(),
                    message: format!("'{}' is not a number of minutes", raw_break),
                })?;

        if break_minutes > MAX_BREAK_MINUTES {
            return Err(PlannerError::InvalidSetting {
                key: break_key.to_string(),
                message: format!("break may not exceed {} minutes", MAX_BREAK_MINUTES),
            });
        }
        let span = minutes_between(start, end);
        if span <= 0 {
            return Err(PlannerError::InvalidSetting {
                key: end_key.to_string(),
                message: format!(
                    "closing time {} must be after opening time {}",
                    format_hhmm(end),
                    format_hhmm(start)
                ),
            });
        }
        if i64::from(break_minutes) > span {
            return Err(PlannerError::InvalidSetting {
                key: break_key.to_string(),
                message: format!("break exceeds the {} minute opening span", span),
            });
        }

        Ok(Self {
            start,
            end,
            break_minutes,
        })
    }

    fn write_keys(
        &self,
        map: &mut BTreeMap<String, String>,
        start_key: &str,
        end_key: &str,
        break_key: &str,
    ) {
        map.insert(start_key.to_string(), format_hhmm(self.start));
        map.insert(end_key.to_string(), format_hhmm(self.end));
        map.insert(break_key.to_string(), self.break_minutes.to_string());
    }
}

/// Typed view over the schedule settings table.
///
/// Built fresh from the key/value rows for every operation; nothing caches
/// it between operations.
///
/// # Example
///
/// ```
/// use shift_planner::config::ScheduleSettings;
/// use chrono::Weekday;
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// for (k, v) in [
///     ("weekday_start", "07:30"), ("weekday_end", "16:30"), ("weekday_break", "60"),
///     ("sat_start", "07:30"), ("sat_end", "12:30"), ("sat_break", "0"),
///     ("rest_emp_1", "WEDNESDAY"), ("sat_off_emp_1", "3"),
/// ] {
///     map.insert(k.to_string(), v.to_string());
/// }
///
/// let settings = ScheduleSettings::from_map(&map).unwrap();
/// assert_eq!(settings.rest_day(1), Weekday::Wed);
/// assert_eq!(settings.rest_day(2), Weekday::Sun); // default
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSettings {
    /// Monday to Friday hours.
    pub weekday: BusinessHours,
    /// Saturday hours.
    pub saturday: BusinessHours,
    /// Weekly rest day per employee.
    pub rest_days: BTreeMap<EmployeeId, Weekday>,
    /// Off-Saturday rank (1-5) per employee.
    pub off_saturdays: BTreeMap<EmployeeId, u32>,
}

impl ScheduleSettings {
    /// Reads and validates the flat settings map.
    ///
    /// Keys outside the schedule vocabulary are ignored.
    pub fn from_map(map: &BTreeMap<String, String>) -> PlannerResult<Self> {
        let weekday = BusinessHours::from_keys(map, WEEKDAY_START, WEEKDAY_END, WEEKDAY_BREAK)?;
        let saturday = BusinessHours::from_keys(map, SAT_START, SAT_END, SAT_BREAK)?;

        let mut rest_days = BTreeMap::new();
        let mut off_saturdays = BTreeMap::new();

        for (key, value) in map {
            if let Some(suffix) = key.strip_prefix(REST_PREFIX) {
                let id = parse_employee_suffix(key, suffix)?;
                let day = parse_weekday_name(value).ok_or_else(|| PlannerError::InvalidSetting {
                    key: key.clone(),
                    message: format!("'{}' is not an uppercase English weekday name", value),
                })?;
                rest_days.insert(id, day);
            } else if let Some(suffix) = key.strip_prefix(SAT_OFF_PREFIX) {
                let id = parse_employee_suffix(key, suffix)?;
                let rank = value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|r| (1..=5).contains(r))
                    .ok_or_else(|| PlannerError::InvalidSetting {
                        key: key.clone(),
                        message: format!("rank must be between 1 and 5, got '{}'", value),
                    })?;
                off_saturdays.insert(id, rank);
            }
        }

        Ok(Self {
            weekday,
            saturday,
            rest_days,
            off_saturdays,
        })
    }

    /// Writes the settings back to flat key/value form.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        self.weekday
            .write_keys(&mut map, WEEKDAY_START, WEEKDAY_END, WEEKDAY_BREAK);
        self.saturday
            .write_keys(&mut map, SAT_START, SAT_END, SAT_BREAK);
        for (id, day) in &self.rest_days {
            map.insert(format!("{REST_PREFIX}{id}"), weekday_name(*day).to_string());
        }
        for (id, rank) in &self.off_saturdays {
            map.insert(format!("{SAT_OFF_PREFIX}{id}"), rank.to_string());
        }
        map
    }

    /// The employee's weekly rest day, Sunday when unset.
    pub fn rest_day(&self, employee_id: EmployeeId) -> Weekday {
        self.rest_days
            .get(&employee_id)
            .copied()
            .unwrap_or(DEFAULT_REST_DAY)
    }

    /// Which Saturday of the month the employee has off, 3 when unset.
    pub fn off_saturday_rank(&self, employee_id: EmployeeId) -> u32 {
        self.off_saturdays
            .get(&employee_id)
            .copied()
            .unwrap_or(DEFAULT_OFF_SATURDAY_RANK)
    }
}

fn required<'a>(map: &'a BTreeMap<String, String>, key: &str) -> PlannerResult<&'a str> {
    map.get(key)
        .map(String::as_str)
        .ok_or_else(|| PlannerError::InvalidSetting {
            key: key.to_string(),
            message: "missing".to_string(),
        })
}

fn parse_time_setting(map: &BTreeMap<String, String>, key: &str) -> PlannerResult<NaiveTime> {
    let raw = required(map, key)?;
    parse_hhmm(raw).map_err(|_| PlannerError::InvalidSetting {
        key: key.to_string(),
        message: format!("'{}' is not an HH:MM time", raw),
    })
}

fn parse_employee_suffix(key: &str, suffix: &str) -> PlannerResult<EmployeeId> {
    suffix
        .parse::<EmployeeId>()
        .map_err(|_| PlannerError::InvalidSetting {
            key: key.to_string(),
            message: format!("'{}' is not an employee id", suffix),
        })
}

/// Records written into an empty store on first open.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// The initial team.
    pub employees: Vec<Employee>,
    /// The initial settings table.
    pub settings: BTreeMap<String, String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let settings = [
            (WEEKDAY_START, "07:30"),
            (WEEKDAY_END, "16:30"),
            (WEEKDAY_BREAK, "60"),
            (SAT_START, "07:30"),
            (SAT_END, "12:30"),
            (SAT_BREAK, "0"),
            ("rest_emp_1", "WEDNESDAY"),
            ("rest_emp_2", "THURSDAY"),
            ("rest_emp_3", "TUESDAY"),
            ("sat_off_emp_1", "3"),
            ("sat_off_emp_2", "2"),
            ("sat_off_emp_3", "4"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            employees: vec![
                Employee::new(1, "Employé A"),
                Employee::new(2, "Employé B"),
                Employee::new(3, "Employé C"),
            ],
            settings,
        }
    }
}

/// Application configuration loaded from `planner.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// SQLite database file; in-memory only when absent.
    #[serde(default)]
    pub data_file: Option<String>,
    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Initial records for an empty store.
    #[serde(default)]
    pub seed: SeedConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            bind_address: default_bind_address(),
            seed: SeedConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_map() -> BTreeMap<String, String> {
        SeedConfig::default().settings
    }

    fn make_time(time_str: &str) -> NaiveTime {
        NaiveTime::parse_from_str(time_str, "%H:%M").unwrap()
    }

    #[test]
    fn test_seed_settings_parse() {
        let settings = ScheduleSettings::from_map(&seed_map()).unwrap();
        assert_eq!(settings.weekday.start, make_time("07:30"));
        assert_eq!(settings.weekday.end, make_time("16:30"));
        assert_eq!(settings.weekday.break_minutes, 60);
        assert_eq!(settings.saturday.end, make_time("12:30"));
        assert_eq!(settings.saturday.break_minutes, 0);
        assert_eq!(settings.rest_day(1), Weekday::Wed);
        assert_eq!(settings.rest_day(2), Weekday::Thu);
        assert_eq!(settings.rest_day(3), Weekday::Tue);
        assert_eq!(settings.off_saturday_rank(2), 2);
        assert_eq!(settings.off_saturday_rank(3), 4);
    }

    #[test]
    fn test_defaults_for_unconfigured_employee() {
        let settings = ScheduleSettings::from_map(&seed_map()).unwrap();
        assert_eq!(settings.rest_day(42), Weekday::Sun);
        assert_eq!(settings.off_saturday_rank(42), 3);
    }

    #[test]
    fn test_map_round_trip() {
        let map = seed_map();
        let settings = ScheduleSettings::from_map(&map).unwrap();
        assert_eq!(settings.to_map(), map);
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let mut map = seed_map();
        map.remove(SAT_END);
        match ScheduleSettings::from_map(&map) {
            Err(PlannerError::InvalidSetting { key, message }) => {
                assert_eq!(key, SAT_END);
                assert_eq!(message, "missing");
            }
            other => panic!("Expected InvalidSetting, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_time_is_rejected() {
        let mut map = seed_map();
        map.insert(WEEKDAY_START.to_string(), "7h30".to_string());
        assert!(matches!(
            ScheduleSettings::from_map(&map),
            Err(PlannerError::InvalidSetting { key, .. }) if key == WEEKDAY_START
        ));
    }

    #[test]
    fn test_closing_before_opening_is_rejected() {
        let mut map = seed_map();
        map.insert(SAT_END.to_string(), "07:00".to_string());
        assert!(ScheduleSettings::from_map(&map).is_err());
    }

    #[test]
    fn test_break_longer_than_span_is_rejected() {
        let mut map = seed_map();
        map.insert(SAT_END.to_string(), "08:00".to_string());
        map.insert(SAT_BREAK.to_string(), "45".to_string());
        assert!(ScheduleSettings::from_map(&map).is_err());
    }

    #[test]
    fn test_lowercase_rest_day_is_rejected() {
        let mut map = seed_map();
        map.insert("rest_emp_1".to_string(), "wednesday".to_string());
        assert!(ScheduleSettings::from_map(&map).is_err());
    }

    #[test]
    fn test_out_of_range_rank_is_rejected() {
        let mut map = seed_map();
        map.insert("sat_off_emp_1".to_string(), "6".to_string());
        assert!(ScheduleSettings::from_map(&map).is_err());
        map.insert("sat_off_emp_1".to_string(), "0".to_string());
        assert!(ScheduleSettings::from_map(&map).is_err());
    }

    #[test]
    fn test_bad_employee_suffix_is_rejected() {
        let mut map = seed_map();
        map.insert("rest_emp_x".to_string(), "MONDAY".to_string());
        assert!(ScheduleSettings::from_map(&map).is_err());
    }

    #[test]
    fn test_planner_config_defaults() {
        let config: PlannerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert!(config.data_file.is_none());
        assert_eq!(config.seed.employees.len(), 3);
    }
}
