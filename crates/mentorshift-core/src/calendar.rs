//! Calendar math shared by the scheduling engine.
//!
//! This module provides:
//! - Weekday name parsing and printing (configuration speaks full names)
//! - Season derivation from the calendar month
//! - Pay-period numbering (14-day blocks counted from January 1)
//! - Sunday-anchored calendar-week keys

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Season tag selecting which half of the shift table applies.
///
/// Derived from the calendar month alone: May through July is summer,
/// the remaining nine months are winter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    /// Derive the season for a 1-indexed month.
    pub fn from_month(month: u32) -> Season {
        match month {
            5..=7 => Season::Summer,
            _ => Season::Winter,
        }
    }

    /// Lowercase tag used in configuration and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
        }
    }
}

/// Full weekday name as configuration spells it.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Parse a weekday from its full or abbreviated English name.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Pay-period number for a date: 14-day blocks counted from January 1
/// of that date's year.
pub fn pay_period_of(date: NaiveDate) -> u32 {
    date.ordinal0() / 14
}

/// Calendar-week key for a date: the Sunday on or before it.
pub fn week_key_of(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Number of days in a month, or a configuration error for months
/// chrono cannot represent.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, ConfigError> {
    if !(1..=12).contains(&month) {
        return Err(ConfigError::InvalidMonth(month));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ConfigError::InvalidYear(year))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(ConfigError::InvalidYear(year))?;
    Ok((next_first - first).num_days() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_boundaries() {
        assert_eq!(Season::from_month(4), Season::Winter);
        assert_eq!(Season::from_month(5), Season::Summer);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(8), Season::Winter);
        assert_eq!(Season::from_month(12), Season::Winter);
    }

    #[test]
    fn pay_periods_count_from_january_first() {
        let jan1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let jan14 = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();
        let jan15 = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(pay_period_of(jan1), 0);
        assert_eq!(pay_period_of(jan14), 0);
        assert_eq!(pay_period_of(jan15), 1);
    }

    #[test]
    fn week_key_is_sunday_anchored() {
        // 2025-08-06 is a Wednesday; the preceding Sunday is 2025-08-03.
        let wed = NaiveDate::from_ymd_opt(2025, 8, 6).unwrap();
        assert_eq!(week_key_of(wed), NaiveDate::from_ymd_opt(2025, 8, 3).unwrap());
        // A Sunday anchors to itself.
        let sun = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();
        assert_eq!(week_key_of(sun), sun);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2025, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2025, 8).unwrap(), 31);
        assert_eq!(days_in_month(2025, 12).unwrap(), 31);
        assert!(days_in_month(2025, 13).is_err());
    }

    #[test]
    fn weekday_names_round_trip() {
        for wd in [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ] {
            assert_eq!(parse_weekday(weekday_name(wd)), Some(wd));
        }
        assert_eq!(parse_weekday("weds"), None);
    }
}
