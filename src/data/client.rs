//! Platform API client
//!
//! A thin wrapper over `reqwest` that forwards the operator's access token on
//! every request and turns transport, status and payload failures into
//! `ApiError`. Resource-specific calls live next to their models in
//! `client_applications` and `webhook_deliveries`.
//!
//! Upstream URLs are built segment by segment, so a record id can never
//! introduce extra path segments or a query string.

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Header carrying the operator's access token upstream
pub const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// Header the platform API uses to report the size of a paginated collection
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Longest slice of an error body kept in `ApiError::Status`
const ERROR_BODY_LIMIT: usize = 200;

/// Errors that can occur when talking to the platform API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, reset)
    #[error("Could not reach the platform API: {0}")]
    Network(#[from] reqwest::Error),

    /// The access token was missing, expired or lacks permission
    #[error("The platform API rejected the access token (HTTP {0})")]
    Auth(u16),

    /// The requested record does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("The platform API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot have API paths appended
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// A record id that cannot name a single path segment, such as `..`
    #[error("Invalid record id: {0:?}")]
    InvalidId(String),
}

/// Credential forwarded upstream on behalf of the signed-in operator
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Client for the platform API
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL for the API; paths are appended as segments
    base_url: Url,
}

impl ApiClient {
    /// Creates a new ApiClient whose requests give up after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Self::with_client(http_client, base_url)
    }

    /// Creates a new ApiClient with a custom HTTP client
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidBaseUrl(raw.clone()))?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Appends `segments` to the base URL, percent-encoding each one whole
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(ApiError::InvalidId(bad.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(
        &self,
        token: &AccessToken,
        segments: &[&str],
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.authorized(self.http_client.get(self.url(segments)?), token))
    }

    pub(crate) fn post(
        &self,
        token: &AccessToken,
        segments: &[&str],
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.authorized(self.http_client.post(self.url(segments)?), token))
    }

    pub(crate) fn put(
        &self,
        token: &AccessToken,
        segments: &[&str],
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.authorized(self.http_client.put(self.url(segments)?), token))
    }

    pub(crate) fn delete(
        &self,
        token: &AccessToken,
        segments: &[&str],
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.authorized(self.http_client.delete(self.url(segments)?), token))
    }

    fn authorized(&self, request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        request.header(ACCESS_TOKEN_HEADER, token.as_str())
    }

    /// Sends a request and maps non-success statuses onto `ApiError`
    ///
    /// # Arguments
    /// * `request` - The prepared request
    /// * `resource` - Human-readable name used in `NotFound` messages
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::debug!(status = status.as_u16(), resource, "platform API request failed");
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Auth(status.as_u16())),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(resource.to_string())),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: truncate(body.trim(), ERROR_BODY_LIMIT),
                })
            }
        }
    }

    /// Sends a request and decodes the JSON body, returning the response headers too
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<(T, HeaderMap), ApiError> {
        let response = self.send(request, resource).await?;
        let headers = response.headers().clone();
        let text = response.text().await?;
        let body = serde_json::from_str(&text)?;
        Ok((body, headers))
    }
}

/// Reads a numeric `X-Total-Count` header, ignoring anything unparsable
pub(crate) fn total_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
