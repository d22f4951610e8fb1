mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tambola_game::GameError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tambola")]
#[command(about = "Tambola - host number-calling games from the terminal")]
#[command(version)]
struct Cli {
    /// Game config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print freshly generated tickets
    Ticket {
        /// Number of tickets
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Print as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Host a simulated game where every player marks and claims automatically
    Play {
        /// Player names
        #[arg(required = true)]
        players: Vec<String>,
        /// Pause between draws in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Print every room event as JSON
        #[arg(long)]
        events: bool,
    },
    /// Config commands
    #[command(subcommand)]
    Config(commands::ConfigCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "tambola={},tambola_game={},tambola_core={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);

    let result = match cli.command {
        Commands::Config(cmd) => commands::handle_config_command(cmd, &config_path),
        Commands::Ticket { count, json } => config::load_game_config(cli.config.as_deref())
            .and_then(|game_config| commands::print_tickets(&game_config, count, json)),
        Commands::Play {
            players,
            delay_ms,
            events,
        } => match config::load_game_config(cli.config.as_deref()) {
            Ok(game_config) => commands::play_game(game_config, players, delay_ms, events).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        match e.downcast_ref::<GameError>() {
            Some(GameError::GameNotFound(id)) => {
                eprintln!("Error: Game '{}' not found", id);
                eprintln!("Games only live as long as the process that created them");
            }
            Some(GameError::PlayerNotFound(id)) => {
                eprintln!("Error: Player '{}' is not seated in this game", id);
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
