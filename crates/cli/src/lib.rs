pub mod commands;
pub mod render;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "naked",
    about = "Outdoor gear brand recommendations with eco scores",
    long_about = "Ask a generative model for three outdoor brands matching your activities, \
                  weather and material preferences, grounded in local brand and material \
                  profiles. Falls back to a fixed set when the model is unavailable.",
    after_help = "Examples:\n  naked recommend --activity hiking --weather wet\n  naked recommend --activity camping --material blends --select Patagonia\n  naked options\n  naked doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Request three brand suggestions for the given preferences")]
    Recommend(RecommendArgs),
    #[command(about = "List the accepted values for every preference flag")]
    Options,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, model credentials and knowledge files")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(args),
        Command::Options => commands::options::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
