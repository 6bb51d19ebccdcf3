//! Phonoscope CLI - voice analysis reports from audio recordings.

mod commands;
mod progress;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "phonoscope")]
#[command(author, version, about = "Voice analysis reports from audio recordings", long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recording and write the one-page PDF report
    Report(commands::report::ReportArgs),

    /// Analyze a recording and print a summary
    Analyze(commands::analyze::AnalyzeArgs),

    /// Show container metadata without analyzing
    Info(commands::info::InfoArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // Logs go to stderr so `report --stdout` keeps stdout clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
    // symphonia logs through the `log` facade
    tracing_log::LogTracer::init().ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Report(args) => commands::report::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
