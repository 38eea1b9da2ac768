use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxdate::core::log::init_logging;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, env = "LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Serve rates over HTTP at GET /<date>/<currency>
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:5000
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Print the rate for one date and currency
    Lookup {
        /// Date as YYYY-MM-DD
        date: String,
        /// Currency code, e.g. SEK
        currency: String,
        /// Print the JSON response body instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl From<Commands> for fxdate::AppCommand {
    fn from(cmd: Commands) -> fxdate::AppCommand {
        match cmd {
            Commands::Serve { address } => fxdate::AppCommand::Serve { address },
            Commands::Lookup {
                date,
                currency,
                json,
            } => fxdate::AppCommand::Lookup {
                date,
                currency,
                json,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = match (&cli.command, cli.verbose) {
        (_, true) => LevelFilter::DEBUG,
        (Some(Commands::Serve { .. }), false) => LevelFilter::INFO,
        _ => LevelFilter::OFF,
    };
    init_logging(level, cli.log_file.as_deref())?;

    let result = match cli.command {
        Some(Commands::Setup) => fxdate::cli::setup::setup(),
        Some(cmd) => fxdate::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
