use std::fs;
use std::path::PathBuf;

use clap::Args;
use mentorshift_core::{HolidaySpec, Schedule, ScheduleConfig};

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the TOML configuration
    pub config: PathBuf,
    /// Override holiday dates with a compact list such as "4,24-26"
    #[arg(long)]
    pub holidays: Option<String>,
    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
    /// Suppress the diagnostic log in text output
    #[arg(long)]
    pub quiet: bool,
}

pub fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(&args.config)?;
    let mut config: ScheduleConfig = toml::from_str(&raw)?;
    if let Some(list) = &args.holidays {
        config.holidays.dates = HolidaySpec::parse_dates(list)?;
    }

    let schedule = Schedule::generate(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule.result())?);
        return Ok(());
    }

    print_schedule(&schedule, args.quiet);
    Ok(())
}

fn print_schedule(schedule: &Schedule, quiet: bool) {
    println!(
        "schedule {:04}-{:02}: {} days",
        schedule.year(),
        schedule.month(),
        schedule.days_in_month()
    );
    println!();

    for day in schedule.days() {
        let mut line = format!(
            "{:>2} {:<9}",
            day.day_of_month(),
            mentorshift_core::calendar::weekday_name(day.weekday())
        );
        if day.is_holiday() {
            line.push_str(" [holiday]");
        }
        for (shift, assigned) in day.assignments() {
            line.push_str(&format!("  {}: {}", shift, assigned.unwrap_or("-")));
        }
        println!("{line}");
    }

    println!();
    println!("hours summary");
    let weeks = schedule.weeks_in_month();
    for mentor in schedule.mentors() {
        let periods: Vec<String> = mentor
            .pay_period_hours()
            .iter()
            .map(|(period, hours)| format!("p{period} {hours}h"))
            .collect();
        println!(
            "  {}: {:.1}h of {:.1}h target ({})",
            mentor.name(),
            mentor.hours_assigned(),
            mentor.monthly_target(weeks),
            if periods.is_empty() {
                "no assignments".to_string()
            } else {
                periods.join(", ")
            }
        );
    }

    let unfilled = schedule.unfilled_slot_count();
    if unfilled > 0 {
        println!("  {unfilled} slots unfilled");
    }

    if !quiet {
        println!();
        println!("diagnostics");
        for message in schedule.diagnostics() {
            println!("  {message}");
        }
    }
}
