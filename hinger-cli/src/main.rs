//! HINGER CLI - Command-line interface
//!
//! Commands:
//! - analyze: Report regions, hingers and moves for a grid
//! - path: Find a safe path between two grids
//! - play: Play a game between agents and/or people

mod analyze_cmd;
mod board_input;
mod path_cmd;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hinger")]
#[command(about = "Hinger board analysis, path search and game AI")]
struct Cli {
    /// Seed for random board generation
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single grid
    Analyze(analyze_cmd::AnalyzeArgs),
    /// Search for a safe path from one grid to another
    Path(path_cmd::PathArgs),
    /// Play a single game
    Play(play_cmd::PlayArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => analyze_cmd::run(args),
        Commands::Path(args) => path_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
    }
}
