use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mentorshift-cli", version, about = "Mentorshift schedule generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a month schedule from a configuration file
    Generate(commands::generate::GenerateArgs),
    /// Check a configuration file without scheduling
    Validate(commands::validate::ValidateArgs),
    /// Write a starter configuration file
    Init(commands::init::InitArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Init(args) => commands::init::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
