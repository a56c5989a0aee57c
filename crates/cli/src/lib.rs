pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "storebot",
    about = "Storebot operator CLI",
    long_about = "Inspect storebot configuration, run credential preflight checks, and look \
                  up orders the way the chat pipeline would.",
    after_help = "Examples:\n  storebot doctor --json\n  storebot config\n  storebot order --number 1042"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate config and collaborator credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Fetch one order and print the summary the chat pipeline would render")]
    Order(OrderArgs),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct OrderArgs {
    #[arg(long, help = "External order id (the long number)")]
    pub id: Option<String>,
    #[arg(long, help = "Human-facing order number, with or without the leading #")]
    pub number: Option<String>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Config => commands::config::run(),
        Command::Order(args) => commands::order::run(&args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
