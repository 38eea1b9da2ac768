pub mod cli;
pub mod core;
pub mod server;
pub mod source;

use crate::core::config::AppConfig;
use crate::source::RateSource;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    /// Run the HTTP service, optionally overriding the configured address
    Serve { address: Option<String> },
    /// Resolve a single rate and print it
    Lookup {
        date: String,
        currency: String,
        json: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxdate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    }
    .with_env_overrides();
    debug!("Loaded config: {config:#?}");

    let source = Arc::new(RateSource::new(config.source));

    match command {
        AppCommand::Serve { address } => {
            let address = address.unwrap_or(config.server.address);
            server::serve(&address, source).await
        }
        AppCommand::Lookup {
            date,
            currency,
            json,
        } => cli::lookup::run(&source, &date, &currency, json).await,
    }
}
