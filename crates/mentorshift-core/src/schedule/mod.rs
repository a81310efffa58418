//! The scheduling orchestrator.
//!
//! One `Schedule::generate` call runs the whole month through four
//! sequential phases:
//!
//! 1. Preference pass -- mentors with a preferred weekday claim the top
//!    open shift on matching days.
//! 2. Equal-distribution fill -- a bounded round-robin ranked by
//!    percentage-of-target, recomputed every iteration so hours converge
//!    toward an equal share of each mentor's target.
//! 3. Force fill -- remaining slots go to the lowest-hour mentor, first
//!    under the full rules, then under relaxed rules with every broken cap
//!    flagged; slots with no candidate at all are logged unfillable.
//! 4. Validate and repair -- the finished month is replayed against fresh
//!    bookkeeping; any non-forced assignment that fails is removed and its
//!    slot re-queued through the distribution fill.
//!
//! Everything the run decides is explained in an ordered diagnostic log.

mod report;

pub use report::{DayResult, MentorSummary, ScheduleResult};

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use uuid::Uuid;

use crate::calendar::weekday_name;
use crate::config::ScheduleConfig;
use crate::day::Day;
use crate::error::{ConfigError, Result};
use crate::mentor::{LegalityMode, Mentor, Refusal};

/// Safety valve for the distribution loop on pathological inputs.
const MAX_FILL_ITERATIONS: usize = 1000;

/// Repair rounds: a refill earlier in the month can in principle push a
/// later assignment over the rolling-window cap, so validation loops.
const MAX_REPAIR_ROUNDS: usize = 5;

/// Shift class for the variety report.
fn shift_type(name: &str) -> &'static str {
    let name = name.to_ascii_lowercase();
    if name.contains("a_shift") || name.contains("a shift") {
        "A"
    } else if name.contains("b_shift") || name.contains("b shift") {
        "B"
    } else if name.contains("c_shift") || name.contains("c shift") {
        "C"
    } else {
        "other"
    }
}

#[derive(Debug)]
struct Violation {
    day_of_month: u32,
    shift: String,
    mentor: String,
    refusal: Refusal,
}

/// A completed (or in-progress) scheduling run for one month.
pub struct Schedule {
    id: Uuid,
    year: i32,
    month: u32,
    days_in_month: u32,
    weeks_in_month: f64,
    days: Vec<Day>,
    mentors: Vec<Mentor>,
    forced: BTreeSet<(u32, String)>,
    log: Vec<String>,
}

impl Schedule {
    /// Run the full scheduling pipeline for the configured month.
    ///
    /// Fails only on configuration errors; fill failures and forced
    /// assignments surface through [`diagnostics`](Schedule::diagnostics).
    pub fn generate(config: &ScheduleConfig) -> Result<Schedule> {
        let days_in_month = config.validate()?;

        let mentors: Vec<Mentor> = config
            .roster
            .iter()
            .filter(|(_, entry)| entry.show_on_calendar)
            .map(|(name, entry)| Mentor::from_config(name, entry))
            .collect();

        let mut days = Vec::with_capacity(days_in_month as usize);
        for day_of_month in 1..=days_in_month {
            let date = NaiveDate::from_ymd_opt(config.year, config.month, day_of_month)
                .ok_or(ConfigError::InvalidYear(config.year))?;
            days.push(Day::new(date, &config.seasons, &config.holidays)?);
        }

        let mut schedule = Schedule {
            id: Uuid::new_v4(),
            year: config.year,
            month: config.month,
            days_in_month,
            weeks_in_month: days_in_month as f64 / 7.0,
            days,
            mentors,
            forced: BTreeSet::new(),
            log: Vec::new(),
        };
        schedule.run();
        Ok(schedule)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    pub fn weeks_in_month(&self) -> f64 {
        self.weeks_in_month
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn mentors(&self) -> &[Mentor] {
        &self.mentors
    }

    /// Ordered human-readable diagnostic log for the run.
    pub fn diagnostics(&self) -> &[String] {
        &self.log
    }

    /// Count of slots left empty after all phases.
    pub fn unfilled_slot_count(&self) -> usize {
        self.days
            .iter()
            .map(|day| day.unfilled_shifts().len())
            .sum()
    }

    /// Re-check the finished month and describe every assignment made by
    /// the legal phases that breaks the full rules. Force-fill assignments
    /// are exempt (their breaks were logged when they were made) and their
    /// hours are not held against the legal phases. Empty on a healthy
    /// schedule; collaborators can audit with this before publishing.
    pub fn verify(&self) -> Vec<String> {
        self.detect_violations()
            .iter()
            .map(|v| {
                format!(
                    "day {} {}: {} - {}",
                    v.day_of_month, v.shift, v.mentor, v.refusal
                )
            })
            .collect()
    }

    fn log<S: Into<String>>(&mut self, message: S) {
        self.log.push(message.into());
    }

    fn run(&mut self) {
        self.log(format!(
            "scheduling {:04}-{:02}: {} days, {} mentors",
            self.year,
            self.month,
            self.days_in_month,
            self.mentors.len()
        ));

        let preferred = self.preference_pass();
        self.log(format!("preference pass: {preferred} assignments"));

        let distributed = self.equal_distribution_fill(None);
        self.log(format!(
            "equal distribution: {} assignments, {} slots open",
            distributed,
            self.unfilled_slot_count()
        ));

        self.force_fill();
        self.validate_and_repair();
        self.report();
    }

    /// Put a mentor on a (day, shift) slot, updating both sides.
    fn assign(&mut self, day_idx: usize, shift: &str, mentor_idx: usize) -> bool {
        self.days[day_idx].assign_mentor(shift, &mut self.mentors[mentor_idx])
    }

    /// Saturday anti-repeat: past the first week, a mentor who worked the
    /// immediately preceding Saturday sits that Saturday out.
    fn saturday_blocked(&self, mentor_idx: usize, day_idx: usize) -> bool {
        let day = &self.days[day_idx];
        if day.weekday() != Weekday::Sat || day.day_of_month() <= 7 {
            return false;
        }
        self.days[day_idx - 7].has_mentor(self.mentors[mentor_idx].name())
    }

    /// Phase 1: each mentor with a preferred weekday gets first claim on the
    /// top open shift of every matching day.
    fn preference_pass(&mut self) -> usize {
        let mut assigned = 0;
        for mentor_idx in 0..self.mentors.len() {
            let Some(weekday) = self.mentors[mentor_idx].preferred_weekday() else {
                continue;
            };
            for day_idx in 0..self.days.len() {
                if self.days[day_idx].weekday() != weekday {
                    continue;
                }
                let Some(shift) = self.days[day_idx]
                    .unfilled_shifts()
                    .first()
                    .map(|s| s.to_string())
                else {
                    continue;
                };
                let Some(request) = self.days[day_idx].slot_request(&shift) else {
                    continue;
                };
                if self.mentors[mentor_idx]
                    .can_work(&request, LegalityMode::Full)
                    .is_ok()
                    && self.assign(day_idx, &shift, mentor_idx)
                {
                    assigned += 1;
                }
            }
        }
        assigned
    }

    /// All currently open (day index, shift) slots in day order, each day's
    /// shifts core-first. `restrict` limits the scan to re-queued slots
    /// during repair.
    fn open_slots(&self, restrict: Option<&BTreeSet<(u32, String)>>) -> Vec<(usize, String)> {
        let mut slots = Vec::new();
        for (day_idx, day) in self.days.iter().enumerate() {
            for shift in day.unfilled_shifts() {
                if let Some(allowed) = restrict {
                    if !allowed.contains(&(day.day_of_month(), shift.to_string())) {
                        continue;
                    }
                }
                slots.push((day_idx, shift.to_string()));
            }
        }
        slots
    }

    /// Mentor indices ranked ascending by percentage-of-target, ties by
    /// roster order. Mentors at or past 100% drop out unless everyone is.
    fn mentors_by_percentage(&self) -> Vec<usize> {
        let weeks = self.weeks_in_month;
        let mut order: Vec<usize> = (0..self.mentors.len()).collect();
        order.sort_by(|&a, &b| {
            self.mentors[a]
                .percentage_of_target(weeks)
                .total_cmp(&self.mentors[b].percentage_of_target(weeks))
        });
        let any_under = order
            .iter()
            .any(|&idx| self.mentors[idx].percentage_of_target(weeks) < 100.0);
        if any_under {
            order.retain(|&idx| self.mentors[idx].percentage_of_target(weeks) < 100.0);
        }
        order
    }

    /// Phase 2: bounded round-robin. Each iteration re-ranks mentors and
    /// gives every ranked mentor at most one new slot, so hours converge
    /// toward equal percentage-of-target instead of maxing out whoever
    /// happens to scan first.
    fn equal_distribution_fill(&mut self, restrict: Option<&BTreeSet<(u32, String)>>) -> usize {
        let mut total = 0;
        for _ in 0..MAX_FILL_ITERATIONS {
            let slots = self.open_slots(restrict);
            if slots.is_empty() {
                return total;
            }

            let mut assigned_this_round = 0;
            for mentor_idx in self.mentors_by_percentage() {
                for (day_idx, shift) in &slots {
                    if self.days[*day_idx].assigned(shift).is_some() {
                        continue; // taken earlier this round
                    }
                    if self.saturday_blocked(mentor_idx, *day_idx) {
                        continue;
                    }
                    let Some(request) = self.days[*day_idx].slot_request(shift) else {
                        continue;
                    };
                    if self.mentors[mentor_idx]
                        .can_work(&request, LegalityMode::Full)
                        .is_ok()
                    {
                        if self.assign(*day_idx, shift, mentor_idx) {
                            assigned_this_round += 1;
                            total += 1;
                        }
                        break;
                    }
                }
            }

            if assigned_this_round == 0 {
                self.log(format!(
                    "equal-distribution fill stuck with {} open slots; remainder goes to force fill",
                    self.open_slots(restrict).len()
                ));
                return total;
            }
        }
        self.log("equal-distribution fill hit the iteration cap");
        total
    }

    /// Mentor indices ranked ascending by raw assigned hours; ties prefer
    /// a mentor still under target, then the larger remaining deficit.
    fn mentors_by_raw_hours(&self) -> Vec<usize> {
        let weeks = self.weeks_in_month;
        let mut order: Vec<usize> = (0..self.mentors.len()).collect();
        order.sort_by(|&a, &b| {
            let (ma, mb) = (&self.mentors[a], &self.mentors[b]);
            ma.hours_assigned()
                .total_cmp(&mb.hours_assigned())
                .then_with(|| {
                    let a_under = ma.available_hours(weeks) > 0.0;
                    let b_under = mb.available_hours(weeks) > 0.0;
                    b_under.cmp(&a_under)
                })
                .then_with(|| mb.available_hours(weeks).total_cmp(&ma.available_hours(weeks)))
        });
        order
    }

    /// Phase 3: fill whatever is left, breaking caps if that is the only
    /// way, and flag every break. Slots nobody can take even then are
    /// logged permanently unfillable.
    fn force_fill(&mut self) {
        let open = self.open_slots(None);
        if open.is_empty() {
            return;
        }
        self.log(format!(
            "force fill: {} slots remain after distribution",
            open.len()
        ));
        for day_idx in 0..self.days.len() {
            let shifts: Vec<String> = self.days[day_idx]
                .unfilled_shifts()
                .iter()
                .map(|s| s.to_string())
                .collect();
            for shift in shifts {
                self.force_fill_slot(day_idx, &shift);
            }
        }
    }

    fn force_fill_slot(&mut self, day_idx: usize, shift: &str) {
        let day_of_month = self.days[day_idx].day_of_month();
        let weekday = weekday_name(self.days[day_idx].weekday());
        let Some(request) = self.days[day_idx].slot_request(shift) else {
            return;
        };

        let ranked = self.mentors_by_raw_hours();
        let (clear, repeats): (Vec<usize>, Vec<usize>) = ranked
            .into_iter()
            .partition(|&idx| !self.saturday_blocked(idx, day_idx));

        // Full rules first across both pools (the Saturday exclusion is
        // waived before any cap gets broken), then relaxed.
        for mode in [LegalityMode::Full, LegalityMode::Relaxed] {
            for pool in [&clear, &repeats] {
                for &mentor_idx in pool {
                    if self.mentors[mentor_idx].can_work(&request, mode).is_err() {
                        continue;
                    }
                    let breaches = self.mentors[mentor_idx].cap_breaches(&request);
                    let name = self.mentors[mentor_idx].name().to_string();
                    if self.assign(day_idx, shift, mentor_idx) {
                        if mode == LegalityMode::Relaxed && !breaches.is_empty() {
                            let reasons: Vec<String> =
                                breaches.iter().map(|b| b.to_string()).collect();
                            self.forced.insert((day_of_month, shift.to_string()));
                            self.log(format!(
                                "day {day_of_month} {weekday} {shift}: FORCED {name} - {}",
                                reasons.join("; ")
                            ));
                        } else {
                            self.log(format!(
                                "day {day_of_month} {weekday} {shift}: assigned {name} (no rules broken)"
                            ));
                        }
                        return;
                    }
                }
            }
        }

        self.log(format!(
            "day {day_of_month} {weekday} {shift}: unfillable - no candidate available \
             (every mentor requested off, unavailable, or already assigned this day)"
        ));
    }

    /// Replay the month through fresh bookkeeping and collect every
    /// non-forced assignment the full rules reject.
    fn detect_violations(&self) -> Vec<Violation> {
        let mut shadow = self.mentors.clone();
        for mentor in &mut shadow {
            mentor.clear_assignments();
        }
        let index: std::collections::BTreeMap<&str, usize> = self
            .mentors
            .iter()
            .enumerate()
            .map(|(idx, mentor)| (mentor.name(), idx))
            .collect();

        let mut violations = Vec::new();
        for day in &self.days {
            for (shift, assigned) in day.assignments() {
                let Some(name) = assigned else { continue };
                let Some(&mentor_idx) = index.get(name) else {
                    continue;
                };
                let Some(request) = day.slot_request(shift) else {
                    continue;
                };
                if self
                    .forced
                    .contains(&(day.day_of_month(), shift.to_string()))
                {
                    // Accepted trade-off, already reported when it was made.
                    // Its hours stay out of the shadow so that assignments
                    // the legal phases made beforehand are judged in the
                    // state those phases actually saw.
                    continue;
                }
                match shadow[mentor_idx].can_work(&request, LegalityMode::Full) {
                    Ok(()) => shadow[mentor_idx].assign(&request, shift),
                    Err(refusal) => violations.push(Violation {
                        day_of_month: day.day_of_month(),
                        shift: shift.to_string(),
                        mentor: name.to_string(),
                        refusal,
                    }),
                }
            }
        }
        violations
    }

    /// Phase 4 (repair half): any violation that did not come from force
    /// fill means an earlier phase produced an illegal state. Remove it,
    /// roll back the bookkeeping, and re-queue the slot.
    fn validate_and_repair(&mut self) {
        for round in 0..MAX_REPAIR_ROUNDS {
            let violations = self.detect_violations();
            if violations.is_empty() {
                if round == 0 {
                    self.log("validation: no rule violations");
                } else {
                    self.log("validation: clean after repair");
                }
                return;
            }

            self.log(format!(
                "validation: {} rule violations from non-forced phases",
                violations.len()
            ));
            let mut vacated = BTreeSet::new();
            for violation in violations {
                self.log(format!(
                    "violation: day {} {}: {} - {}; removing assignment",
                    violation.day_of_month, violation.shift, violation.mentor, violation.refusal
                ));
                let day_idx = (violation.day_of_month - 1) as usize;
                if let Some(mentor_idx) = self
                    .mentors
                    .iter()
                    .position(|m| m.name() == violation.mentor)
                {
                    if self.days[day_idx]
                        .remove_mentor(&violation.shift, &mut self.mentors[mentor_idx])
                    {
                        vacated.insert((violation.day_of_month, violation.shift));
                    }
                }
            }

            let refilled = self.equal_distribution_fill(Some(&vacated));
            self.log(format!(
                "repair: refilled {refilled} of {} vacated slots",
                vacated.len()
            ));
            for (day_of_month, shift) in &vacated {
                let day_idx = (day_of_month - 1) as usize;
                if self.days[day_idx].assigned(shift).is_none() {
                    self.log(format!(
                        "day {day_of_month} {shift}: unfillable - assignment removed by \
                         repair and no legal candidate remains"
                    ));
                }
            }
        }
        self.log("validation: violations remain after repair rounds; left for manual review");
    }

    /// Phase 4 (report half): variety observations, hours balance, and the
    /// final unfilled count.
    fn report(&mut self) {
        let mut messages = Vec::new();

        let mut variety_flagged = false;
        for mentor in &self.mentors {
            let mut last_type: Option<&'static str> = None;
            let mut run = 0usize;
            let mut longest = 0usize;
            let mut longest_type = "other";
            for day in &self.days {
                for (shift, assigned) in day.assignments() {
                    if assigned != Some(mentor.name()) {
                        continue;
                    }
                    let class = shift_type(shift);
                    if last_type == Some(class) {
                        run += 1;
                    } else {
                        run = 1;
                        last_type = Some(class);
                    }
                    if run > longest {
                        longest = run;
                        longest_type = class;
                    }
                }
            }
            if longest >= 3 {
                messages.push(format!(
                    "variety: {} works {} consecutive {} shifts",
                    mentor.name(),
                    longest,
                    longest_type
                ));
                variety_flagged = true;
            }
        }
        if !variety_flagged {
            messages.push("variety: good shift mix across all mentors".to_string());
        }

        let weeks = self.weeks_in_month;
        let mut total_deviation = 0.0;
        for mentor in &self.mentors {
            let target = mentor.monthly_target(weeks);
            let deviation = mentor.hours_assigned() - target;
            total_deviation += deviation.abs();
            if deviation.abs() > 2.0 {
                messages.push(format!(
                    "hours: {} at {:.1}h of {:.1}h target ({:+.1}h)",
                    mentor.name(),
                    mentor.hours_assigned(),
                    target,
                    deviation
                ));
            }
        }
        if !self.mentors.is_empty() {
            messages.push(format!(
                "hours: average deviation {:.1}h",
                total_deviation / self.mentors.len() as f64
            ));
        }

        let unfilled = self.unfilled_slot_count();
        if unfilled > 0 {
            messages.push(format!("{unfilled} slots remain unfilled"));
        } else {
            messages.push("all slots filled".to_string());
        }

        for message in messages {
            self.log(message);
        }
    }
}
