use clap::{Parser, Subcommand};
use floxhub_core::Config;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "floxhub", version, about = "Floxhub engagement CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily task board
    Board {
        #[command(subcommand)]
        action: commands::board::BoardAction,
    },
    /// Score calculations
    Score {
        #[command(subcommand)]
        action: commands::score::ScoreAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("warning: {e}, using defaults");
        Config::default()
    });
    logging::init(&config.log_level);

    let result = match cli.command {
        Commands::Board { action } => commands::board::run(action, &config).await,
        Commands::Score { action } => commands::score::run(action, &config),
        Commands::Config { action } => commands::config::run(action, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
