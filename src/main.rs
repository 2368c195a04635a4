//! ChatHub Server — real-time multi-user chat
//!
//! Main entry point that wires all crates together and starts the server.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use chathub_core::config::AppConfig;
use chathub_core::error::AppError;

/// ChatHub server command-line options.
#[derive(Debug, Parser)]
#[command(name = "chathub", about = "Real-time multi-user chat server")]
struct Args {
    /// Configuration environment to load (config/<env>.toml).
    #[arg(long, env = "CHATHUB_ENV", default_value = "development")]
    env: String,
    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,
    /// Override the configured bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_configuration(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = chathub_api::app::run_server(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment, applying CLI overrides.
fn load_configuration(args: &Args) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(&args.env)?;
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    Ok(config)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}
