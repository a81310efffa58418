use std::fs;
use std::path::PathBuf;

use clap::Args;
use mentorshift_core::ScheduleConfig;

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the TOML configuration
    pub config: PathBuf,
}

pub fn run(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(&args.config)?;
    let config: ScheduleConfig = toml::from_str(&raw)?;
    let days_in_month = config.validate()?;

    let shown = config
        .roster
        .values()
        .filter(|entry| entry.show_on_calendar)
        .count();
    println!(
        "configuration ok: {:04}-{:02}, {} days, {} mentors, {} holidays",
        config.year,
        config.month,
        days_in_month,
        shown,
        config.holidays.dates.len()
    );
    Ok(())
}
