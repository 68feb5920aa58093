mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use prizedraw_core::PrizeError;
use prizedraw_engine::EngineError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prizedraw")]
#[command(about = "Prize raffle spinner - weighted draws from a prize listing")]
#[command(version)]
struct Cli {
    /// Configuration file
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
    /// Show the prizes in a listing
    List(commands::ListArgs),

    /// Run an interactive draw session
    Spin(commands::SpinArgs),

    /// Draw without a display and report how often each prize came up
    Simulate(commands::SimulateArgs),

    /// Configuration commands
    #[command(subcommand)]
    Config(commands::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with the spinner line
    let filter = if cli.verbose {
        "prizedraw=debug,prizedraw_core=debug,prizedraw_engine=debug".to_string()
    } else {
        "prizedraw=info,prizedraw_core=warn,prizedraw_engine=warn".to_string()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.unwrap_or_else(CliConfig::default_path);
    let config = CliConfig::load(&config_path).await?;

    let result = match cli.command {
        Commands::List(args) => commands::handle_list_command(args, &config)
            .await
            .map_err(EngineError::from),
        Commands::Spin(args) => commands::handle_spin_command(args, &config).await,
        Commands::Simulate(args) => commands::handle_simulate_command(args, &config).await,
        Commands::Config(cmd) => commands::handle_config_command(cmd, &config, &config_path)
            .await
            .map_err(EngineError::from),
    };

    if let Err(e) = result {
        match e {
            EngineError::Core(PrizeError::Format(msg)) => {
                eprintln!("Error: Unreadable listing: {}", msg);
                eprintln!(
                    "Expected 'name,quantity' lines or a header with name and quantity columns"
                );
            }
            EngineError::Core(PrizeError::Io(err)) => {
                eprintln!("Error: {}", err);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
