//! casa price service - main entry point
//!
//! Loads the model artifacts once and serves predictions over HTTP.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use casa_gateway::config::{AppConfig, CONFIG_ENV};
use casa_gateway::logging::init_logging;
use casa_gateway::metrics::MetricsRegistry;
use casa_gateway::server::{self, AppState};
use casa_model::artifacts::ArtifactStore;
use casa_model::predictor::PredictionService;

/// casa house-price prediction service
#[derive(Parser, Debug)]
#[command(name = "casa")]
#[command(author = "Casa Contributors")]
#[command(version)]
#[command(about = "House-price prediction HTTP service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = CONFIG_ENV, default_value = "casa.toml")]
    config: String,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_found = Path::new(&args.config).exists();
    let mut config = if config_found {
        AppConfig::load(&args.config)?
    } else {
        AppConfig::default()
    };
    config.apply_env_overrides()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    init_logging(&config.logging, args.verbose)?;

    tracing::info!("Starting casa v{}", env!("CARGO_PKG_VERSION"));
    if !config_found {
        tracing::warn!("Config file {} not found, using defaults", args.config);
    }
    tracing::info!("Configuration loaded: {:?}", config.name);

    let store = ArtifactStore::load(&config.artifact_paths()).context("loading artifacts")?;
    let service = Arc::new(PredictionService::new(store));
    let metrics = Arc::new(MetricsRegistry::new());

    server::run(&config.server, AppState::new(service, metrics)).await?;

    tracing::info!("casa shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_precedence() {
        std::env::remove_var(CONFIG_ENV);
        let args = Args::try_parse_from(["casa"]).unwrap();
        assert_eq!(args.config, "casa.toml");

        std::env::set_var(CONFIG_ENV, "/etc/casa/prod.toml");
        let args = Args::try_parse_from(["casa"]).unwrap();
        assert_eq!(args.config, "/etc/casa/prod.toml");

        let args = Args::try_parse_from(["casa", "--config", "local.toml"]).unwrap();
        assert_eq!(args.config, "local.toml");
        std::env::remove_var(CONFIG_ENV);
    }
}
