//! End-to-end scheduling scenarios.
//!
//! Each test builds a typed configuration, runs the full pipeline, and
//! checks the resulting grid plus the diagnostic log.

use std::collections::BTreeMap;

use mentorshift_core::{
    HolidaySpec, MentorConfig, Schedule, ScheduleConfig, SeasonTable, ShiftSet,
};

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

fn uniform_seasons(shifts: &[(&str, f64)]) -> SeasonTable {
    let set: ShiftSet = shifts
        .iter()
        .map(|(name, hours)| (name.to_string(), *hours))
        .collect();
    let week: BTreeMap<String, ShiftSet> = WEEKDAYS
        .iter()
        .map(|day| (day.to_string(), set.clone()))
        .collect();
    SeasonTable {
        summer: week.clone(),
        winter: week,
    }
}

fn mentor(hours_wanted: f64) -> MentorConfig {
    MentorConfig {
        hours_wanted,
        hard_dates: vec![],
        weekdays: vec![],
        preferred_weekdays: vec![],
        show_on_calendar: true,
    }
}

fn config(
    year: i32,
    month: u32,
    roster: Vec<(&str, MentorConfig)>,
    seasons: SeasonTable,
) -> ScheduleConfig {
    ScheduleConfig {
        year,
        month,
        roster: roster
            .into_iter()
            .map(|(name, entry)| (name.to_string(), entry))
            .collect(),
        seasons,
        holidays: HolidaySpec::default(),
    }
}

/// P1: no mentor occupies two slots on the same day.
fn assert_one_shift_per_day(schedule: &Schedule) {
    for day in schedule.days() {
        let mut seen = Vec::new();
        for (_, assigned) in day.assignments() {
            if let Some(name) = assigned {
                assert!(
                    !seen.contains(&name),
                    "{} twice on day {}",
                    name,
                    day.day_of_month()
                );
                seen.push(name);
            }
        }
    }
}

// Scenario A: one mentor cannot cover two shifts a day; every A shift is
// covered (some by force), every B shift is provably unfillable.
#[test]
fn single_mentor_fills_one_shift_per_day() {
    // February 2027: 28 days.
    let cfg = config(
        2027,
        2,
        vec![("Emma", mentor(40.0))],
        uniform_seasons(&[("a_shift", 8.0), ("b_shift", 8.0)]),
    );
    let schedule = Schedule::generate(&cfg).unwrap();

    for day in schedule.days() {
        assert_eq!(day.assigned("a_shift"), Some("Emma"));
        assert_eq!(day.assigned("b_shift"), None);
    }
    assert_eq!(schedule.unfilled_slot_count(), 28);

    // P5: every unfilled slot carries a proof-of-exhaustion line.
    let unfillable_lines = schedule
        .diagnostics()
        .iter()
        .filter(|m| m.contains("unfillable"))
        .count();
    assert_eq!(unfillable_lines, 28);

    assert_one_shift_per_day(&schedule);
    // P6 post-condition: nothing outside force fill breaks the rules.
    assert!(schedule.verify().is_empty());
}

// Scenario B: two equal mentors split a uniform month near-evenly through
// the distribution phase alone.
#[test]
fn two_mentors_split_hours_evenly() {
    let cfg = config(
        2027,
        2,
        vec![("Avree", mentor(35.0)), ("Emma", mentor(35.0))],
        uniform_seasons(&[("a_shift", 10.0)]),
    );
    let schedule = Schedule::generate(&cfg).unwrap();

    assert_eq!(schedule.unfilled_slot_count(), 0);
    assert!(!schedule.diagnostics().iter().any(|m| m.contains("FORCED")));
    assert!(!schedule
        .diagnostics()
        .iter()
        .any(|m| m.contains("unfillable")));

    let hours: Vec<f64> = schedule
        .mentors()
        .iter()
        .map(|m| m.hours_assigned())
        .collect();
    assert_eq!(hours.iter().sum::<f64>(), 280.0);
    assert!(
        (hours[0] - hours[1]).abs() <= 10.0,
        "split too uneven: {hours:?}"
    );
    assert_one_shift_per_day(&schedule);
    assert!(schedule.verify().is_empty());
}

// Scenario C: a hard date keeps the mentor off that day entirely; with no
// other mentor, the slot stays empty rather than being forced.
#[test]
fn hard_date_is_never_forced() {
    let mut emma = mentor(40.0);
    emma.hard_dates = vec![15];
    let cfg = config(
        2027,
        2,
        vec![("Emma", emma)],
        uniform_seasons(&[("a_shift", 8.0)]),
    );
    let schedule = Schedule::generate(&cfg).unwrap();

    let day15 = &schedule.days()[14];
    assert_eq!(day15.assigned("a_shift"), None);
    assert!(!day15.has_mentor("Emma"));
    assert!(schedule
        .diagnostics()
        .iter()
        .any(|m| m.contains("day 15") && m.contains("unfillable")));
    assert!(schedule.verify().is_empty());
}

// Scenario D: a holiday replaces the seasonal shift set wholesale.
#[test]
fn holiday_overrides_seasonal_table() {
    let mut shift_info = ShiftSet::new();
    shift_info.insert("holiday_a_shift".to_string(), 9.0);
    shift_info.insert("holiday_b_shift".to_string(), 9.0);

    let mut cfg = config(
        2025,
        7, // July: summer season
        vec![("Avree", mentor(30.0)), ("Emma", mentor(30.0))],
        uniform_seasons(&[("a_shift", 7.0), ("b_shift", 7.0), ("c_shift", 4.0)]),
    );
    cfg.holidays = HolidaySpec {
        dates: vec![4],
        shift_info: shift_info.clone(),
    };
    let schedule = Schedule::generate(&cfg).unwrap();

    let day4 = &schedule.days()[3];
    assert!(day4.is_holiday());
    assert_eq!(day4.shifts(), &shift_info);
    // Neighboring days keep the seasonal set.
    assert!(schedule.days()[2].shifts().contains_key("a_shift"));
    assert!(!schedule.days()[2].shifts().contains_key("holiday_a_shift"));
}

// Scenario E: the 1.5x weekly cap holds through the legal phases and is
// broken only by force fill, with the cap named in the log.
#[test]
fn weekly_cap_breaks_only_under_force_fill() {
    let cfg = config(
        2027,
        2,
        vec![("Emma", mentor(10.0))], // weekly cap 15h, one 8h shift legal per week
        uniform_seasons(&[("a_shift", 8.0)]),
    );
    let schedule = Schedule::generate(&cfg).unwrap();

    assert!(schedule
        .diagnostics()
        .iter()
        .any(|m| m.contains("FORCED") && m.contains("weekly cap")));
    // Forced assignments are flagged, so the audit still comes back clean.
    assert!(schedule.verify().is_empty());
    assert_one_shift_per_day(&schedule);
}

// P4: with equal targets and ample capacity the distribution phase keeps
// percentage-of-target tightly clustered.
#[test]
fn distribution_narrows_percentage_spread() {
    let cfg = config(
        2025,
        8,
        vec![
            ("Alexie", mentor(20.0)),
            ("Avree", mentor(20.0)),
            ("Emma", mentor(20.0)),
            ("Mitch", mentor(20.0)),
        ],
        uniform_seasons(&[("a_shift", 7.0), ("b_shift", 7.0)]),
    );
    let schedule = Schedule::generate(&cfg).unwrap();

    let weeks = schedule.weeks_in_month();
    let percentages: Vec<f64> = schedule
        .mentors()
        .iter()
        .map(|m| m.percentage_of_target(weeks))
        .collect();
    let max = percentages.iter().cloned().fold(f64::MIN, f64::max);
    let min = percentages.iter().cloned().fold(f64::MAX, f64::min);
    assert!(
        max - min <= 15.0,
        "percentage spread too wide: {percentages:?}"
    );
    assert_one_shift_per_day(&schedule);
    assert!(schedule.verify().is_empty());
}

// A mentor's unavailable weekday is respected outside force fill (P2).
#[test]
fn unavailable_weekday_respected() {
    let mut emma = mentor(20.0);
    emma.weekdays = vec!["Monday".to_string()];
    let cfg = config(
        2025,
        8,
        vec![("Avree", mentor(40.0)), ("Emma", emma)],
        uniform_seasons(&[("a_shift", 8.0)]),
    );
    let schedule = Schedule::generate(&cfg).unwrap();

    for day in schedule.days() {
        if day.weekday() == chrono::Weekday::Mon {
            assert_ne!(day.assigned("a_shift"), Some("Emma"));
        }
    }
    assert!(schedule.verify().is_empty());
}

// Configuration problems reject the run before any assignment.
#[test]
fn missing_weekday_entry_rejects_the_run() {
    let mut seasons = uniform_seasons(&[("a_shift", 8.0)]);
    seasons.winter.remove("Tuesday");
    let cfg = config(2025, 8, vec![("Emma", mentor(20.0))], seasons);
    assert!(Schedule::generate(&cfg).is_err());
}

// The preference pass gives a mentor their chosen weekday when legal.
#[test]
fn preferred_weekday_goes_to_its_fan() {
    // A target sized to the preference: four Wednesdays cover most of it,
    // so the distribution phase leaves the preferred days undisturbed.
    let mut mitch = mentor(6.0);
    mitch.preferred_weekdays = vec!["Wednesday".to_string()];
    let cfg = config(
        2025,
        8,
        vec![("Emma", mentor(20.0)), ("Mitch", mitch)],
        uniform_seasons(&[("a_shift", 6.0), ("b_shift", 6.0)]),
    );
    let schedule = Schedule::generate(&cfg).unwrap();

    // August 2025 Wednesdays: 6, 13, 20, 27.
    let mut wednesdays_held = 0;
    for &dom in &[6u32, 13, 20, 27] {
        if schedule.days()[(dom - 1) as usize].assigned("a_shift") == Some("Mitch") {
            wednesdays_held += 1;
        }
    }
    assert!(wednesdays_held >= 3, "only {wednesdays_held} Wednesdays held");
}
