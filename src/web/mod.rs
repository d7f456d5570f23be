//! HTTP surface of the admin console
//!
//! Builds the axum router, the shared state handed to every handler, and the
//! server loop started from `main`.

mod client_applications;
mod pages;
mod redirect;
mod session;
mod webhook_deliveries;

use std::sync::Arc;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::cache::CacheManager;
use crate::cli::ServerConfig;
use crate::data::{ApiClient, ApiError, CachedWebhookDeliveries, WebhookDeliverySource};
use crate::ui::Views;

pub use redirect::safe_redirect_target;
pub use session::ACCESS_TOKEN_COOKIE;

/// Errors that stop the server from starting or keep it from serving
#[derive(Debug, Error)]
pub enum ServerError {
    /// The HTTP client could not be built
    #[error("Failed to build API client: {0}")]
    Client(#[from] ApiError),

    /// A page template failed to compile
    #[error("Failed to compile templates: {0}")]
    Templates(#[from] tera::Error),

    /// Binding or serving the listener failed
    #[error("HTTP server error: {0}")]
    Io(#[from] std::io::Error),
}

/// State shared by every request
#[derive(Clone)]
pub struct AppState {
    /// Raw platform API client, used for client application calls
    pub api: ApiClient,
    /// Webhook delivery source, cached unless caching is turned off
    pub deliveries: Arc<dyn WebhookDeliverySource>,
    pub views: Arc<Views>,
}

impl AppState {
    /// Builds state from configuration, wrapping the client in the cache
    /// when a TTL is configured
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let api = ApiClient::new(config.api_base_url.clone(), config.request_timeout)?;
        let deliveries: Arc<dyn WebhookDeliverySource> = match config.cache_ttl {
            Some(ttl) => {
                tracing::info!(ttl_secs = ttl.as_secs(), "webhook delivery cache enabled");
                let cache = CacheManager::new(ttl, config.cache_max_entries);
                Arc::new(CachedWebhookDeliveries::new(api.clone(), cache))
            }
            None => {
                tracing::info!("webhook delivery cache disabled");
                Arc::new(api.clone())
            }
        };
        Self::new(api, deliveries)
    }

    /// Builds state around an explicit delivery source
    pub fn new(
        api: ApiClient,
        deliveries: Arc<dyn WebhookDeliverySource>,
    ) -> Result<Self, ServerError> {
        Ok(Self {
            api,
            deliveries,
            views: Arc::new(Views::new()?),
        })
    }
}

/// Creates the router with every console route
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/client_applications") }))
        .route("/health", get(|| async { "ok" }))
        .route(
            "/client_applications",
            get(client_applications::index).post(client_applications::create),
        )
        .route("/client_applications/new", get(client_applications::new))
        .route(
            "/client_applications/{id}",
            get(client_applications::show).post(client_applications::update),
        )
        .route("/client_applications/{id}/edit", get(client_applications::edit))
        .route(
            "/client_applications/{id}/delete",
            get(client_applications::confirm_delete).post(client_applications::destroy),
        )
        .route("/webhook_deliveries", get(webhook_deliveries::index))
        .route("/webhook_deliveries/{id}", get(webhook_deliveries::show))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped
pub async fn serve(config: &ServerConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(config)?;
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        api = %config.api_base_url,
        "admin console listening"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}
