//! Main entry point for the voice gateway
//!
//! Loads configuration, installs logging and serves the gateway REST API
//! until Ctrl-C.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use gateway_core::{
    api,
    config::{load_dotenv, load_dotenv_from},
    logging::{parse_log_level, setup_logging, LoggingConfig},
    GatewayConfig,
};
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "voice-gateway", version, about = "Access tokens and call routing for voice clients")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides `bind_address` from the configuration
    #[arg(short, long)]
    bind: Option<String>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// Parse arguments after `.env` is loaded, so `LOG_LEVEL` and
/// `GATEWAY_CONFIG` set there apply to logging too
fn parse_args<I, T>(dotenv: Option<&Path>, args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match dotenv {
        Some(path) => load_dotenv_from(path),
        None => load_dotenv(),
    }
    Cli::parse_from(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = parse_args(None, std::env::args_os());

    let mut logging = LoggingConfig::new(parse_log_level(&cli.log_level)?);
    if cli.json_logs {
        logging = logging.with_json();
    }
    setup_logging(&logging)?;

    let mut config = GatewayConfig::load(cli.config.as_deref())
        .context("Failed to load gateway configuration")?;
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }

    tracing::info!("Starting voice-gateway v{}", env!("CARGO_PKG_VERSION"));

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    let app = api::create_router(config);

    api::serve(listener, app, shutdown_signal()).await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_level_from_dotenv() {
        let mut dotenv = tempfile::NamedTempFile::new().unwrap();
        writeln!(dotenv, "LOG_LEVEL=debug").unwrap();

        let cli = parse_args(Some(dotenv.path()), ["voice-gateway"]);
        assert_eq!(cli.log_level, "debug");
        assert!(parse_log_level(&cli.log_level).is_ok());
    }

    #[test]
    fn test_bind_override() {
        let cli = Cli::parse_from(["voice-gateway", "--bind", "127.0.0.1:9000", "--json-logs"]);
        assert_eq!(cli.bind.as_deref(), Some("127.0.0.1:9000"));
        assert!(cli.json_logs);
    }
}
