//! Mentor roster entries and per-mentor legality checks.
//!
//! A `Mentor` is the live working type for one roster entry: identity and
//! constraints from configuration plus the running totals the scheduling
//! phases mutate. Serialization happens only at the boundary (`MentorConfig`
//! in, `MentorSummary` out); the engine never branches on "is this a live
//! mentor or a serialized record".

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Weekday};

use crate::config::MentorConfig;

/// Hours a mentor may accumulate inside one 14-day pay period.
pub const PAY_PERIOD_CAP: f64 = 80.0;

/// A calendar week may carry at most this multiple of the weekly target.
pub const WEEKLY_OVERTIME_FACTOR: f64 = 1.5;

/// At most this many distinct worked days inside any trailing 7-day window.
pub const REST_MAX_DAYS: usize = 5;

/// Which rule set a legality check applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalityMode {
    /// Hard unavailability, one-shift-per-day, and all hour/rest caps.
    Full,
    /// Force-fill rules: hard unavailability and one-shift-per-day only.
    Relaxed,
}

/// Why a mentor cannot take a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Refusal {
    RequestedOff,
    UnavailableWeekday,
    AlreadyAssignedToday,
    PayPeriodCap { would_be: f64 },
    WeeklyCap { would_be: f64, max: f64 },
    RestCap { days_worked: usize },
}

impl Refusal {
    /// Stable snake_case tag for log filtering.
    pub fn tag(&self) -> &'static str {
        match self {
            Refusal::RequestedOff => "requested_off",
            Refusal::UnavailableWeekday => "unavailable_weekday",
            Refusal::AlreadyAssignedToday => "already_assigned_today",
            Refusal::PayPeriodCap { .. } => "pay_period_cap",
            Refusal::WeeklyCap { .. } => "weekly_cap",
            Refusal::RestCap { .. } => "rest_cap",
        }
    }
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Refusal::RequestedOff => write!(f, "requested this day off"),
            Refusal::UnavailableWeekday => write!(f, "unavailable on this weekday"),
            Refusal::AlreadyAssignedToday => write!(f, "already assigned a shift this day"),
            Refusal::PayPeriodCap { would_be } => {
                write!(f, "over the {PAY_PERIOD_CAP}h pay-period cap (would be {would_be}h)")
            }
            Refusal::WeeklyCap { would_be, max } => {
                write!(f, "over the 1.5x weekly cap (would be {would_be}h / {max}h max)")
            }
            Refusal::RestCap { days_worked } => {
                write!(f, "{days_worked} days already worked in the trailing 7-day window")
            }
        }
    }
}

/// Everything a legality check needs to know about one (day, shift) slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest {
    pub day_of_month: u32,
    pub weekday: Weekday,
    pub shift_hours: f64,
    pub pay_period: u32,
    pub week_key: NaiveDate,
}

/// Live roster entry with running totals.
#[derive(Debug, Clone)]
pub struct Mentor {
    name: String,
    weekly_target: f64,
    hard_dates: BTreeSet<u32>,
    unavailable_weekdays: Vec<Weekday>,
    preferred_weekday: Option<Weekday>,

    hours_assigned: f64,
    pay_period_hours: BTreeMap<u32, f64>,
    week_hours: BTreeMap<NaiveDate, f64>,
    days_worked: BTreeSet<u32>,
    last_shift: Option<String>,
}

impl Mentor {
    /// Build a mentor from a validated roster entry.
    pub fn from_config(name: &str, config: &MentorConfig) -> Mentor {
        Mentor {
            name: name.to_string(),
            weekly_target: config.hours_wanted,
            hard_dates: config.hard_dates.iter().copied().collect(),
            unavailable_weekdays: config
                .weekdays
                .iter()
                .filter_map(|day| crate::calendar::parse_weekday(day))
                .collect(),
            preferred_weekday: config
                .preferred_weekdays
                .first()
                .and_then(|day| crate::calendar::parse_weekday(day)),
            hours_assigned: 0.0,
            pay_period_hours: BTreeMap::new(),
            week_hours: BTreeMap::new(),
            days_worked: BTreeSet::new(),
            last_shift: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weekly_target(&self) -> f64 {
        self.weekly_target
    }

    pub fn hard_dates(&self) -> impl Iterator<Item = u32> + '_ {
        self.hard_dates.iter().copied()
    }

    pub fn preferred_weekday(&self) -> Option<Weekday> {
        self.preferred_weekday
    }

    pub fn last_shift(&self) -> Option<&str> {
        self.last_shift.as_deref()
    }

    pub fn hours_assigned(&self) -> f64 {
        self.hours_assigned
    }

    pub fn pay_period_hours(&self) -> &BTreeMap<u32, f64> {
        &self.pay_period_hours
    }

    pub fn week_hours_in(&self, week_key: NaiveDate) -> f64 {
        self.week_hours.get(&week_key).copied().unwrap_or(0.0)
    }

    pub fn worked_on(&self, day_of_month: u32) -> bool {
        self.days_worked.contains(&day_of_month)
    }

    pub fn days_worked(&self) -> impl Iterator<Item = u32> + '_ {
        self.days_worked.iter().copied()
    }

    /// Monthly target derived from the weekly rate.
    pub fn monthly_target(&self, weeks_in_month: f64) -> f64 {
        self.weekly_target * weeks_in_month
    }

    /// Hours still wanted this month (negative once over target).
    pub fn available_hours(&self, weeks_in_month: f64) -> f64 {
        self.monthly_target(weeks_in_month) - self.hours_assigned
    }

    /// Assigned hours as a percentage of the monthly target; the fairness
    /// ranking key (lower = next in line).
    pub fn percentage_of_target(&self, weeks_in_month: f64) -> f64 {
        self.hours_assigned / self.monthly_target(weeks_in_month) * 100.0
    }

    /// Distinct days worked in the trailing window [day-6, day-1].
    pub fn rest_window_days(&self, day_of_month: u32) -> usize {
        let lo = day_of_month.saturating_sub(6).max(1);
        self.days_worked.range(lo..day_of_month).count()
    }

    /// Can this mentor take the slot? Rules evaluate in a fixed order so the
    /// first refusal is the reported reason.
    pub fn can_work(&self, request: &SlotRequest, mode: LegalityMode) -> Result<(), Refusal> {
        if self.hard_dates.contains(&request.day_of_month) {
            return Err(Refusal::RequestedOff);
        }
        if self.unavailable_weekdays.contains(&request.weekday) {
            return Err(Refusal::UnavailableWeekday);
        }
        if self.days_worked.contains(&request.day_of_month) {
            return Err(Refusal::AlreadyAssignedToday);
        }
        if mode == LegalityMode::Relaxed {
            return Ok(());
        }

        let period_hours = self
            .pay_period_hours
            .get(&request.pay_period)
            .copied()
            .unwrap_or(0.0);
        if period_hours + request.shift_hours > PAY_PERIOD_CAP {
            return Err(Refusal::PayPeriodCap {
                would_be: period_hours + request.shift_hours,
            });
        }

        let week = self.week_hours_in(request.week_key);
        let max_weekly = self.weekly_target * WEEKLY_OVERTIME_FACTOR;
        if week + request.shift_hours > max_weekly {
            return Err(Refusal::WeeklyCap {
                would_be: week + request.shift_hours,
                max: max_weekly,
            });
        }

        let rested = self.rest_window_days(request.day_of_month);
        if rested >= REST_MAX_DAYS {
            return Err(Refusal::RestCap { days_worked: rested });
        }

        Ok(())
    }

    /// Every cap this slot would break, with margins. Used to flag forced
    /// assignments; empty means the slot is fully legal.
    pub fn cap_breaches(&self, request: &SlotRequest) -> Vec<Refusal> {
        let mut breaches = Vec::new();
        let period_hours = self
            .pay_period_hours
            .get(&request.pay_period)
            .copied()
            .unwrap_or(0.0);
        if period_hours + request.shift_hours > PAY_PERIOD_CAP {
            breaches.push(Refusal::PayPeriodCap {
                would_be: period_hours + request.shift_hours,
            });
        }
        let week = self.week_hours_in(request.week_key);
        let max_weekly = self.weekly_target * WEEKLY_OVERTIME_FACTOR;
        if week + request.shift_hours > max_weekly {
            breaches.push(Refusal::WeeklyCap {
                would_be: week + request.shift_hours,
                max: max_weekly,
            });
        }
        let rested = self.rest_window_days(request.day_of_month);
        if rested >= REST_MAX_DAYS {
            breaches.push(Refusal::RestCap { days_worked: rested });
        }
        breaches
    }

    /// Record an assignment. No legality check happens here; the caller has
    /// already validated under the mode the current phase requires.
    pub fn assign(&mut self, request: &SlotRequest, shift: &str) {
        self.hours_assigned += request.shift_hours;
        *self.pay_period_hours.entry(request.pay_period).or_insert(0.0) += request.shift_hours;
        *self.week_hours.entry(request.week_key).or_insert(0.0) += request.shift_hours;
        self.days_worked.insert(request.day_of_month);
        self.last_shift = Some(shift.to_string());
    }

    /// Exact inverse of [`assign`](Mentor::assign), for the repair pass.
    /// The last-shift marker is cleared rather than rewound; the variety
    /// heuristic tolerates that.
    pub fn unassign(&mut self, request: &SlotRequest, shift: &str) {
        self.hours_assigned -= request.shift_hours;
        if let Some(hours) = self.pay_period_hours.get_mut(&request.pay_period) {
            *hours -= request.shift_hours;
            if *hours <= 0.0 {
                self.pay_period_hours.remove(&request.pay_period);
            }
        }
        if let Some(hours) = self.week_hours.get_mut(&request.week_key) {
            *hours -= request.shift_hours;
            if *hours <= 0.0 {
                self.week_hours.remove(&request.week_key);
            }
        }
        self.days_worked.remove(&request.day_of_month);
        if self.last_shift.as_deref() == Some(shift) {
            self.last_shift = None;
        }
    }

    /// Drop all running totals, keeping identity and constraints. The
    /// validation replay uses this on a cloned roster.
    pub(crate) fn clear_assignments(&mut self) {
        self.hours_assigned = 0.0;
        self.pay_period_hours.clear();
        self.week_hours.clear();
        self.days_worked.clear();
        self.last_shift = None;
    }
}
