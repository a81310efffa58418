//! Core error types for mentorshift-core.
//!
//! Only configuration problems are fatal to a scheduling run. Fill failures,
//! forced assignments, and repaired violations surface through the schedule's
//! diagnostic log instead (see the `schedule` module).

use thiserror::Error;

/// Core error type for mentorshift-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration rejected at the boundary
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
///
/// All of these reject the run before any assignment happens; a silently
/// empty shift table would mask a data problem as "no shifts required".
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Month outside 1..=12
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// Year the calendar math cannot represent
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// Roster has no mentors shown on the calendar
    #[error("Roster is empty: no mentors with show_on_calendar enabled")]
    EmptyRoster,

    /// Mentor weekly target is zero or negative
    #[error("Invalid weekly target for '{name}': {hours} (must be positive)")]
    InvalidTarget { name: String, hours: f64 },

    /// Hard date outside the target month
    #[error("Hard date {date} for '{name}' is outside the month (1-{days_in_month})")]
    DateOutOfRange {
        name: String,
        date: u32,
        days_in_month: u32,
    },

    /// Unparseable weekday name in a roster entry
    #[error("Unknown weekday '{weekday}' for '{name}'")]
    UnknownWeekday { name: String, weekday: String },

    /// More than one preferred weekday on a roster entry
    #[error("'{name}' lists {count} preferred weekdays (at most 1 allowed)")]
    TooManyPreferred { name: String, count: usize },

    /// Season table is missing the shift set for a weekday in the month
    #[error("No shift entry for {weekday} in the {season} table")]
    MissingShiftEntry { season: String, weekday: String },

    /// A present-but-empty shift set, which would schedule nothing silently
    #[error("Empty shift set for {weekday} in the {season} table")]
    EmptyShiftSet { season: String, weekday: String },

    /// Shift duration must be positive
    #[error("Invalid duration {hours} for shift '{shift}'")]
    InvalidShiftHours { shift: String, hours: f64 },

    /// Holiday date outside the target month
    #[error("Holiday date {date} is outside the month (1-{days_in_month})")]
    HolidayOutOfRange { date: u32, days_in_month: u32 },

    /// Holiday dates are set but the holiday shift table is empty
    #[error("Holiday dates are configured but the holiday shift table is empty")]
    EmptyHolidayShifts,

    /// Malformed compact holiday date list (e.g. "4,24-26")
    #[error("Malformed holiday date list '{input}': {message}")]
    MalformedHolidayList { input: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
