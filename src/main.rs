mod app;
mod input;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use weatherpin_core::{Config, ConfigError};

/// Fetch weather for a city and keep up to five cities pinned.
#[derive(Debug, Parser)]
#[command(name = "weatherpin", version, about)]
struct Cli {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Weather actor endpoint, overriding the config file
    #[arg(long)]
    endpoint: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    weatherpin_core::init()?;

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            if let Some(config_err) = e.downcast_ref::<ConfigError>() {
                tracing::error!(hint = config_err.user_message(), "{}", config_err);
            }
            return Err(e);
        }
    };
    if let Some(endpoint) = cli.endpoint {
        config.actor.endpoint = endpoint;
    }

    let stdin = std::io::BufReader::new(std::io::stdin());
    app::run(&config, stdin, std::io::stdout())?;

    tracing::info!("WeatherPin exiting");
    Ok(())
}
