//! Shared date and time arithmetic.
//!
//! Every duration in the planner is computed in whole minutes on a single
//! calendar day. Overnight spans are not representable.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

use crate::error::{PlannerError, PlannerResult};

/// Uppercase English weekday names, Monday first, as stored in settings.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// Parses a zero-padded 24-hour `HH:MM` time.
///
/// A trailing `:SS` component is tolerated and dropped, since edited tables
/// often hand times back with seconds attached.
///
/// # Example
///
/// ```
/// use shift_planner::calculation::parse_hhmm;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_hhmm("07:30").unwrap(), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
/// assert!(parse_hhmm("7h30").is_err());
/// ```
pub fn parse_hhmm(value: &str) -> PlannerResult<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| {
            NaiveTime::parse_from_str(trimmed, "%H:%M:%S").map(|t| t.with_second(0).unwrap_or(t))
        })
        .map_err(|_| PlannerError::InvalidTime {
            value: value.to_string(),
        })
}

/// Formats a time as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Signed number of whole minutes from `start` to `end` on the same day.
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    (end - start).num_minutes()
}

/// Planned duration of a span: `max(0, (end - start) - break)`.
///
/// # Example
///
/// ```
/// use shift_planner::calculation::planned_minutes;
/// use chrono::NaiveTime;
///
/// let start = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(16, 30, 0).unwrap();
/// assert_eq!(planned_minutes(start, end, 60), 480);
/// ```
pub fn planned_minutes(start: NaiveTime, end: NaiveTime, break_minutes: u32) -> i64 {
    (minutes_between(start, end) - i64::from(break_minutes)).max(0)
}

/// Lateness in whole minutes, never negative.
pub fn late_minutes(scheduled: NaiveTime, arrival: NaiveTime) -> i64 {
    minutes_between(scheduled, arrival).max(0)
}

/// Ordinal of a Saturday within its calendar month, counting from the 1st.
///
/// # Panics
///
/// Panics when `date` is not a Saturday. Callers only ever pass days they
/// have already classified as Saturdays.
///
/// # Example
///
/// ```
/// use shift_planner::calculation::nth_saturday_of_month;
/// use chrono::NaiveDate;
///
/// // March 2024 starts on a Friday; the 2nd is its first Saturday.
/// assert_eq!(nth_saturday_of_month(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()), 1);
/// assert_eq!(nth_saturday_of_month(NaiveDate::from_ymd_opt(2024, 3, 30).unwrap()), 5);
/// ```
pub fn nth_saturday_of_month(date: NaiveDate) -> u32 {
    assert_eq!(
        date.weekday(),
        Weekday::Sat,
        "nth_saturday_of_month called with non-Saturday {date}"
    );
    (date.day() - 1) / 7 + 1
}

/// Every calendar day from `from` to `to`, both inclusive.
pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |day| *day <= to)
}

/// Uppercase English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Parses one of the seven uppercase English weekday names.
pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    let index = WEEKDAY_NAMES.iter().position(|n| *n == name.trim())?;
    Some(match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    })
}

/// Serde adapter storing a [`NaiveTime`] as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as `HH:MM`.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    /// Deserializes from `HH:MM` (seconds tolerated).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}
