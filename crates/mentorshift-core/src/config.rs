//! Typed scheduling configuration.
//!
//! The surrounding system historically passed loosely-shaped objects (string
//! and number day keys mixed, optional fields with inconsistent defaults)
//! straight into the scheduler. Here the whole input is a strict structure
//! validated once at the boundary; the engine itself never re-checks shapes.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, parse_weekday, weekday_name, Season};
use crate::error::ConfigError;

/// Shift name to duration in hours.
pub type ShiftSet = BTreeMap<String, f64>;

fn default_true() -> bool {
    true
}

/// One roster entry.
///
/// `hours_wanted` is a weekly rate; the engine derives the monthly target
/// from it. `weekdays` lists weekday names the mentor can never work;
/// `preferred_weekdays` carries at most one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorConfig {
    pub hours_wanted: f64,
    #[serde(default)]
    pub hard_dates: Vec<u32>,
    #[serde(default)]
    pub weekdays: Vec<String>,
    #[serde(default)]
    pub preferred_weekdays: Vec<String>,
    #[serde(default = "default_true")]
    pub show_on_calendar: bool,
}

/// Per-season, per-weekday shift tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonTable {
    pub summer: BTreeMap<String, ShiftSet>,
    pub winter: BTreeMap<String, ShiftSet>,
}

impl SeasonTable {
    fn table(&self, season: Season) -> &BTreeMap<String, ShiftSet> {
        match season {
            Season::Summer => &self.summer,
            Season::Winter => &self.winter,
        }
    }

    /// Look up the shift set for a season and weekday.
    ///
    /// A missing or empty entry is a configuration error, never an empty
    /// schedule: silently producing "no shifts required" would mask a data
    /// problem.
    pub fn shifts_for(&self, season: Season, weekday: Weekday) -> Result<&ShiftSet, ConfigError> {
        let name = weekday_name(weekday);
        let shifts = self
            .table(season)
            .get(name)
            .ok_or_else(|| ConfigError::MissingShiftEntry {
                season: season.as_str().to_string(),
                weekday: name.to_string(),
            })?;
        if shifts.is_empty() {
            return Err(ConfigError::EmptyShiftSet {
                season: season.as_str().to_string(),
                weekday: name.to_string(),
            });
        }
        Ok(shifts)
    }
}

/// Holiday dates for the target month and the shift table that replaces
/// the seasonal one on those days.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidaySpec {
    #[serde(default)]
    pub dates: Vec<u32>,
    #[serde(default)]
    pub shift_info: ShiftSet,
}

impl HolidaySpec {
    /// Whether a day-of-month is a holiday.
    pub fn is_holiday(&self, day_of_month: u32) -> bool {
        self.dates.contains(&day_of_month)
    }

    /// Parse a compact holiday date list such as `"4,24"` or `"24-26,31"`.
    ///
    /// Collaborators store holiday lists as comma-separated day numbers with
    /// optional inclusive ranges. Whitespace around entries is ignored;
    /// duplicates collapse; the result is sorted.
    pub fn parse_dates(input: &str) -> Result<Vec<u32>, ConfigError> {
        let malformed = |message: &str| ConfigError::MalformedHolidayList {
            input: input.to_string(),
            message: message.to_string(),
        };

        let mut dates = std::collections::BTreeSet::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((lo, hi)) = part.split_once('-') {
                let lo: u32 = lo
                    .trim()
                    .parse()
                    .map_err(|_| malformed("range start is not a number"))?;
                let hi: u32 = hi
                    .trim()
                    .parse()
                    .map_err(|_| malformed("range end is not a number"))?;
                if lo > hi {
                    return Err(malformed("range start exceeds range end"));
                }
                dates.extend(lo..=hi);
            } else {
                let day: u32 = part.parse().map_err(|_| malformed("entry is not a number"))?;
                dates.insert(day);
            }
        }
        Ok(dates.into_iter().collect())
    }
}

/// Complete input for one scheduling run.
///
/// The roster is keyed by mentor name; map order (lexicographic by name) is
/// the roster order used for deterministic tie-breaking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub year: i32,
    pub month: u32,
    pub roster: BTreeMap<String, MentorConfig>,
    pub seasons: SeasonTable,
    #[serde(default)]
    pub holidays: HolidaySpec,
}

impl ScheduleConfig {
    /// Validate the whole configuration, returning the number of days in
    /// the target month.
    ///
    /// Every malformed-input case rejects here, before any assignment
    /// happens; the scheduling phases assume a valid configuration.
    pub fn validate(&self) -> Result<u32, ConfigError> {
        let days_in_month = calendar::days_in_month(self.year, self.month)?;

        let mut any_shown = false;
        for (name, mentor) in &self.roster {
            if !mentor.show_on_calendar {
                continue;
            }
            any_shown = true;

            if mentor.hours_wanted <= 0.0 {
                return Err(ConfigError::InvalidTarget {
                    name: name.clone(),
                    hours: mentor.hours_wanted,
                });
            }
            for &date in &mentor.hard_dates {
                if date < 1 || date > days_in_month {
                    return Err(ConfigError::DateOutOfRange {
                        name: name.clone(),
                        date,
                        days_in_month,
                    });
                }
            }
            for weekday in mentor.weekdays.iter().chain(&mentor.preferred_weekdays) {
                if parse_weekday(weekday).is_none() {
                    return Err(ConfigError::UnknownWeekday {
                        name: name.clone(),
                        weekday: weekday.clone(),
                    });
                }
            }
            if mentor.preferred_weekdays.len() > 1 {
                return Err(ConfigError::TooManyPreferred {
                    name: name.clone(),
                    count: mentor.preferred_weekdays.len(),
                });
            }
        }
        if !any_shown {
            return Err(ConfigError::EmptyRoster);
        }

        // The whole active season must be covered: any month is long enough
        // to contain every weekday.
        let season = Season::from_month(self.month);
        for weekday in [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ] {
            let shifts = self.seasons.shifts_for(season, weekday)?;
            for (shift, &hours) in shifts {
                if hours <= 0.0 {
                    return Err(ConfigError::InvalidShiftHours {
                        shift: shift.clone(),
                        hours,
                    });
                }
            }
        }

        for &date in &self.holidays.dates {
            if date < 1 || date > days_in_month {
                return Err(ConfigError::HolidayOutOfRange {
                    date,
                    days_in_month,
                });
            }
        }
        if !self.holidays.dates.is_empty() {
            if self.holidays.shift_info.is_empty() {
                return Err(ConfigError::EmptyHolidayShifts);
            }
            for (shift, &hours) in &self.holidays.shift_info {
                if hours <= 0.0 {
                    return Err(ConfigError::InvalidShiftHours {
                        shift: shift.clone(),
                        hours,
                    });
                }
            }
        }

        Ok(days_in_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week_of(shifts: &[(&str, f64)]) -> BTreeMap<String, ShiftSet> {
        let set: ShiftSet = shifts
            .iter()
            .map(|(name, hours)| (name.to_string(), *hours))
            .collect();
        [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ]
        .iter()
        .map(|day| (day.to_string(), set.clone()))
        .collect()
    }

    fn base_config() -> ScheduleConfig {
        let mut roster = BTreeMap::new();
        roster.insert(
            "Emma".to_string(),
            MentorConfig {
                hours_wanted: 20.0,
                hard_dates: vec![],
                weekdays: vec![],
                preferred_weekdays: vec![],
                show_on_calendar: true,
            },
        );
        ScheduleConfig {
            year: 2025,
            month: 8,
            roster,
            seasons: SeasonTable {
                summer: week_of(&[("a_shift", 8.0), ("b_shift", 8.0)]),
                winter: week_of(&[("a_shift", 7.0), ("b_shift", 7.0)]),
            },
            holidays: HolidaySpec::default(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(base_config().validate().unwrap(), 31);
    }

    #[test]
    fn rejects_bad_month() {
        let mut config = base_config();
        config.month = 13;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMonth(13))
        ));
    }

    #[test]
    fn rejects_hidden_only_roster() {
        let mut config = base_config();
        for mentor in config.roster.values_mut() {
            mentor.show_on_calendar = false;
        }
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRoster)));
    }

    #[test]
    fn rejects_zero_target() {
        let mut config = base_config();
        config.roster.get_mut("Emma").unwrap().hours_wanted = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_hard_date() {
        let mut config = base_config();
        config.roster.get_mut("Emma").unwrap().hard_dates = vec![32];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DateOutOfRange { date: 32, .. })
        ));
    }

    #[test]
    fn rejects_missing_weekday_entry() {
        let mut config = base_config();
        config.seasons.winter.remove("Wednesday");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingShiftEntry { .. })
        ));
    }

    #[test]
    fn rejects_empty_shift_set() {
        let mut config = base_config();
        config
            .seasons
            .winter
            .insert("Wednesday".to_string(), ShiftSet::new());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyShiftSet { .. })
        ));
    }

    #[test]
    fn rejects_holiday_dates_without_shifts() {
        let mut config = base_config();
        config.holidays.dates = vec![4];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyHolidayShifts)
        ));
    }

    #[test]
    fn parse_dates_handles_lists_and_ranges() {
        assert_eq!(HolidaySpec::parse_dates("").unwrap(), Vec::<u32>::new());
        assert_eq!(HolidaySpec::parse_dates("4,24").unwrap(), vec![4, 24]);
        assert_eq!(
            HolidaySpec::parse_dates("24-26, 31").unwrap(),
            vec![24, 25, 26, 31]
        );
        assert_eq!(HolidaySpec::parse_dates("4, 4,4").unwrap(), vec![4]);
        assert!(HolidaySpec::parse_dates("4,x").is_err());
        assert!(HolidaySpec::parse_dates("9-2").is_err());
    }

    #[test]
    fn mentor_config_serde_defaults() {
        let mentor: MentorConfig = toml::from_str("hours_wanted = 16").unwrap();
        assert!(mentor.show_on_calendar);
        assert!(mentor.hard_dates.is_empty());
        assert!(mentor.preferred_weekdays.is_empty());
    }
}
