//! One calendar day: its fixed shift set and mutable assignment slots.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::calendar::{pay_period_of, week_key_of, Season};
use crate::config::{HolidaySpec, SeasonTable, ShiftSet};
use crate::error::ConfigError;
use crate::mentor::{Mentor, SlotRequest};

/// Ancillary (errand) shifts fill after the core dinner/meds shifts.
pub fn is_ancillary_shift(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.contains("c_shift") || name.contains("c shift")
}

/// One day of the month under scheduling.
///
/// The shift set is fixed at construction -- holiday table override first,
/// otherwise the season + weekday lookup -- and only the assignment slots
/// mutate afterwards.
#[derive(Debug, Clone)]
pub struct Day {
    date: NaiveDate,
    weekday: Weekday,
    season: Season,
    holiday: bool,
    pay_period: u32,
    week_key: NaiveDate,
    shifts: ShiftSet,
    assignments: BTreeMap<String, Option<String>>,
    assigned_hours: f64,
}

impl Day {
    /// Build a day, deriving its shift set from the holiday or seasonal
    /// tables. A missing table entry is a configuration error.
    pub fn new(
        date: NaiveDate,
        seasons: &SeasonTable,
        holidays: &HolidaySpec,
    ) -> Result<Day, ConfigError> {
        let weekday = date.weekday();
        let season = Season::from_month(date.month());
        let holiday = holidays.is_holiday(date.day());
        let shifts = if holiday {
            holidays.shift_info.clone()
        } else {
            seasons.shifts_for(season, weekday)?.clone()
        };
        let assignments = shifts.keys().map(|shift| (shift.clone(), None)).collect();
        Ok(Day {
            date,
            weekday,
            season,
            holiday,
            pay_period: pay_period_of(date),
            week_key: week_key_of(date),
            shifts,
            assignments,
            assigned_hours: 0.0,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn is_holiday(&self) -> bool {
        self.holiday
    }

    pub fn pay_period(&self) -> u32 {
        self.pay_period
    }

    pub fn week_key(&self) -> NaiveDate {
        self.week_key
    }

    pub fn shifts(&self) -> &ShiftSet {
        &self.shifts
    }

    pub fn shift_hours(&self, shift: &str) -> Option<f64> {
        self.shifts.get(shift).copied()
    }

    /// Slot request for a named shift on this day.
    pub fn slot_request(&self, shift: &str) -> Option<SlotRequest> {
        Some(SlotRequest {
            day_of_month: self.day_of_month(),
            weekday: self.weekday,
            shift_hours: self.shift_hours(shift)?,
            pay_period: self.pay_period,
            week_key: self.week_key,
        })
    }

    /// Shift names with empty slots, core shifts before ancillary ones.
    pub fn unfilled_shifts(&self) -> Vec<&str> {
        let mut core = Vec::new();
        let mut ancillary = Vec::new();
        for (shift, slot) in &self.assignments {
            if slot.is_none() {
                if is_ancillary_shift(shift) {
                    ancillary.push(shift.as_str());
                } else {
                    core.push(shift.as_str());
                }
            }
        }
        core.extend(ancillary);
        core
    }

    pub fn is_filled(&self) -> bool {
        self.assignments.values().all(|slot| slot.is_some())
    }

    /// Mentor name occupying a shift, if any.
    pub fn assigned(&self, shift: &str) -> Option<&str> {
        self.assignments.get(shift)?.as_deref()
    }

    /// Iterate (shift name, assigned mentor) in shift-name order.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.assignments
            .iter()
            .map(|(shift, slot)| (shift.as_str(), slot.as_deref()))
    }

    /// Whether the mentor already occupies any slot on this day.
    pub fn has_mentor(&self, name: &str) -> bool {
        self.assignments
            .values()
            .any(|slot| slot.as_deref() == Some(name))
    }

    pub fn total_hours(&self) -> f64 {
        self.shifts.values().sum()
    }

    pub fn assigned_hours(&self) -> f64 {
        self.assigned_hours
    }

    /// Put a mentor on a shift. This is the single point of truth binding
    /// Day and Mentor bookkeeping; no other code path mutates hours.
    /// Returns false if the shift is unknown or already occupied.
    pub fn assign_mentor(&mut self, shift: &str, mentor: &mut Mentor) -> bool {
        let Some(request) = self.slot_request(shift) else {
            return false;
        };
        match self.assignments.get_mut(shift) {
            Some(slot) if slot.is_none() => {
                *slot = Some(mentor.name().to_string());
                self.assigned_hours += request.shift_hours;
                mentor.assign(&request, shift);
                true
            }
            _ => false,
        }
    }

    /// Inverse of [`assign_mentor`](Day::assign_mentor), for repair.
    /// Returns false if the mentor does not occupy the shift.
    pub fn remove_mentor(&mut self, shift: &str, mentor: &mut Mentor) -> bool {
        let Some(request) = self.slot_request(shift) else {
            return false;
        };
        match self.assignments.get_mut(shift) {
            Some(slot) if slot.as_deref() == Some(mentor.name()) => {
                *slot = None;
                self.assigned_hours -= request.shift_hours;
                mentor.unassign(&request, shift);
                true
            }
            _ => false,
        }
    }
}
