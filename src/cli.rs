//! Command-line interface parsing for the admin console
//!
//! Every setting can come from a flag or from the matching environment
//! variable. `ServerConfig::from_cli` validates the raw values before the
//! server starts.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use url::Url;

/// Default time-to-live for cached webhook delivery pages (10 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Default bound on a single upstream request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The upstream API base URL is not an absolute http(s) URL
    #[error("Invalid API base URL: '{0}'. Expected an absolute http(s) URL")]
    InvalidBaseUrl(String),

    /// The listen address cannot be parsed
    #[error("Invalid bind address: '{0}'. Expected host:port, e.g. 127.0.0.1:3000")]
    InvalidBindAddress(String),

    /// A zero request timeout would fail every upstream call
    #[error("Invalid request timeout: must be at least 1 second")]
    InvalidTimeout,
}

/// Admin console for platform client applications and webhook deliveries
#[derive(Parser, Debug)]
#[command(name = "appadmin")]
#[command(about = "Manage client applications and inspect their webhook deliveries")]
#[command(version)]
pub struct Cli {
    /// Base URL of the platform API, e.g. https://api.example.com/api/v1
    #[arg(long, env = "API_BASE_URL", value_name = "URL")]
    pub api_base_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Seconds a webhook delivery page stays cached (0 disables the cache)
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    /// Upper bound on cached webhook delivery pages
    #[arg(long, env = "CACHE_MAX_ENTRIES", default_value_t = 10_000)]
    pub cache_max_entries: u64,

    /// Seconds before an upstream API request is abandoned
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

/// Validated configuration the server is started with
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Upstream API base URL without a trailing slash
    pub api_base_url: String,
    /// Cache lifetime for delivery pages; `None` turns caching off
    pub cache_ttl: Option<Duration>,
    /// Maximum number of cached delivery pages
    pub cache_max_entries: u64,
    /// Timeout applied to every upstream request
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` when every value is usable
    /// * `Err(CliError)` naming the first invalid value
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_base_url = parse_base_url(&cli.api_base_url)?;

        let bind_addr = cli
            .bind
            .parse::<SocketAddr>()
            .map_err(|_| CliError::InvalidBindAddress(cli.bind.clone()))?;

        if cli.request_timeout_secs == 0 {
            return Err(CliError::InvalidTimeout);
        }

        let cache_ttl = match cli.cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(ServerConfig {
            bind_addr,
            api_base_url,
            cache_ttl,
            cache_max_entries: cli.cache_max_entries,
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
        })
    }
}

/// Checks that the base URL is absolute http(s) and strips any trailing slash.
pub fn parse_base_url(raw: &str) -> Result<String, CliError> {
    let url = Url::parse(raw).map_err(|_| CliError::InvalidBaseUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => {
            Ok(url.as_str().trim_end_matches('/').to_string())
        }
        _ => Err(CliError::InvalidBaseUrl(raw.to_string())),
    }
}
