//! # Mentorshift Core Library
//!
//! Core scheduling engine for Mentorshift: given a mentor roster with
//! availability constraints and hour targets, and a month of days each
//! carrying a set of fixed-duration shifts, produce a full month of
//! assignments.
//!
//! The engine pursues legality (days off, weekday unavailability,
//! one-shift-per-day, the 80-hour pay-period cap, the 1.5x weekly cap, the
//! 5-in-7-day rest rule), fairness (hours converge toward each mentor's
//! target), and fill rate (remaining slots are force-filled with every
//! broken rule flagged) -- in that order of preference, with the trade-offs
//! explained in an ordered diagnostic log.
//!
//! ## Architecture
//!
//! - **Config**: strictly-typed, validated input (roster, seasonal shift
//!   tables, holiday overrides)
//! - **Mentor / Day**: the live working state the phases mutate
//! - **Schedule**: the multi-phase orchestrator and its serializable result
//!
//! The whole run is a pure, deterministic function of its inputs: no I/O,
//! no global state, no concurrency.

pub mod calendar;
pub mod config;
pub mod day;
pub mod error;
pub mod mentor;
pub mod schedule;

pub use calendar::Season;
pub use config::{HolidaySpec, MentorConfig, ScheduleConfig, SeasonTable, ShiftSet};
pub use day::Day;
pub use error::{ConfigError, CoreError, Result};
pub use mentor::{LegalityMode, Mentor, Refusal, SlotRequest};
pub use schedule::{DayResult, MentorSummary, Schedule, ScheduleResult};
