//! Serializable snapshot of a completed scheduling run.
//!
//! The engine works on live `Day`/`Mentor` state; collaborators that
//! persist or render a schedule consume this boundary representation
//! instead.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{weekday_name, Season};

use super::Schedule;

/// One day of the finished grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayResult {
    pub date: NaiveDate,
    pub weekday: String,
    pub season: Season,
    pub holiday: bool,
    pub shift_hours: BTreeMap<String, f64>,
    /// Shift name to assigned mentor; `None` marks a slot left unfilled.
    pub assignments: BTreeMap<String, Option<String>>,
    pub total_hours: f64,
    pub assigned_hours: f64,
}

/// Final standing of one mentor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorSummary {
    pub name: String,
    pub weekly_target: f64,
    pub monthly_target: f64,
    pub hours_assigned: f64,
    pub pay_period_hours: BTreeMap<u32, f64>,
    pub hard_dates: Vec<u32>,
}

/// Complete output of one run: the grid, the standings, and the
/// diagnostic log, tagged with a stable id for storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub id: Uuid,
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayResult>,
    pub mentors: Vec<MentorSummary>,
    pub diagnostics: Vec<String>,
}

impl Schedule {
    /// Snapshot the finished run for the presentation layer.
    pub fn result(&self) -> ScheduleResult {
        let days = self
            .days()
            .iter()
            .map(|day| DayResult {
                date: day.date(),
                weekday: weekday_name(day.weekday()).to_string(),
                season: day.season(),
                holiday: day.is_holiday(),
                shift_hours: day.shifts().clone(),
                assignments: day
                    .assignments()
                    .map(|(shift, mentor)| (shift.to_string(), mentor.map(str::to_string)))
                    .collect(),
                total_hours: day.total_hours(),
                assigned_hours: day.assigned_hours(),
            })
            .collect();

        let weeks = self.weeks_in_month();
        let mentors = self
            .mentors()
            .iter()
            .map(|mentor| MentorSummary {
                name: mentor.name().to_string(),
                weekly_target: mentor.weekly_target(),
                monthly_target: mentor.monthly_target(weeks),
                hours_assigned: mentor.hours_assigned(),
                pay_period_hours: mentor.pay_period_hours().clone(),
                hard_dates: mentor.hard_dates().collect(),
            })
            .collect();

        ScheduleResult {
            id: self.id(),
            year: self.year(),
            month: self.month(),
            days,
            mentors,
            diagnostics: self.diagnostics().to_vec(),
        }
    }
}
