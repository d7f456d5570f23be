//! Client application admin console
//!
//! Serves HTML pages for managing the platform's client applications and
//! browsing the webhook deliveries made to them.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use appadmin::cli::{Cli, ServerConfig};
use appadmin::web;

/// Sets up log output, honouring `RUST_LOG` and defaulting to `info`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ServerConfig::from_cli(&cli)?;

    init_tracing();

    web::serve(&config).await?;

    Ok(())
}
