use std::fs;
use std::path::PathBuf;

use clap::Args;

/// Starter configuration carrying the standard campus shift tables.
///
/// Holiday date lists for the usual national holidays, by month:
/// January "1", June "19", July "4,24", December "24,25,31".
const TEMPLATE: &str = r#"# Mentorshift scheduling configuration.
#
# hours_wanted is a weekly rate; the engine derives the monthly target.
# weekdays lists weekday names the mentor can never work.
# preferred_weekdays carries at most one entry.

year = 2025
month = 8

[roster.Alexie]
hours_wanted = 24.0
hard_dates = []
weekdays = []
preferred_weekdays = []

[roster.Avree]
hours_wanted = 20.0
hard_dates = []
weekdays = []
preferred_weekdays = []

[roster.Emma]
hours_wanted = 24.0
hard_dates = []
weekdays = []
preferred_weekdays = []

[roster.HayLee]
hours_wanted = 16.0
hard_dates = []
weekdays = []
preferred_weekdays = []

[roster.Mitch]
hours_wanted = 20.0
hard_dates = []
weekdays = []
preferred_weekdays = []

# Holiday dates for the target month, e.g. dates = [4, 24] for July.
# On those days the holiday shift table replaces the seasonal one.
[holidays]
dates = []

[holidays.shift_info]
holiday_a_shift = 9.0
holiday_b_shift = 9.0

[seasons.summer.Sunday]
a_shift = 10.0
b_shift = 10.0

[seasons.summer.Monday]
a_shift = 8.0
b_shift = 8.0
c_shift = 5.0

[seasons.summer.Tuesday]
a_shift = 7.0
b_shift = 7.0
c_shift = 4.0

[seasons.summer.Wednesday]
a_shift = 7.0
b_shift = 7.0

[seasons.summer.Thursday]
a_shift = 7.0
b_shift = 7.0
c_shift = 4.0

[seasons.summer.Friday]
a_shift = 8.0
b_shift = 8.0
c_shift = 4.0

[seasons.summer.Saturday]
a_shift = 11.0
b_shift = 11.0
c_shift = 4.0

[seasons.winter.Sunday]
a_shift = 9.0
b_shift = 9.0

[seasons.winter.Monday]
a_shift = 7.0
b_shift = 7.0
c_shift = 5.0

[seasons.winter.Tuesday]
a_shift = 6.0
b_shift = 6.0
c_shift = 4.0

[seasons.winter.Wednesday]
a_shift = 6.0
b_shift = 6.0

[seasons.winter.Thursday]
a_shift = 6.0
b_shift = 6.0
c_shift = 4.0

[seasons.winter.Friday]
a_shift = 8.0
b_shift = 8.0
c_shift = 4.0

[seasons.winter.Saturday]
a_shift = 11.0
b_shift = 11.0
c_shift = 4.0
"#;

#[derive(Args)]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(default_value = "mentorshift.toml")]
    pub path: PathBuf,
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        )
        .into());
    }
    fs::write(&args.path, TEMPLATE)?;
    println!("wrote {}", args.path.display());
    Ok(())
}
