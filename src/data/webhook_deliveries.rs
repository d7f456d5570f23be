//! Webhook delivery records
//!
//! Fetches delivery logs for a client application from the platform API and
//! maps them into `WebhookDelivery` view models. Listing goes through the
//! `WebhookDeliverySource` trait so a caching layer can sit in front of the
//! raw client without callers noticing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::{total_count, AccessToken, ApiClient, ApiError};
use super::id_string;
use crate::cache::CacheManager;

/// Page used when the request does not name one
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the request does not name one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const COLLECTION: &str = "webhook_deliveries";

/// One attempt to deliver an event to a client application's endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookDelivery {
    pub id: String,
    /// HTTP status the endpoint answered with, if it answered
    pub response_status: Option<u16>,
    /// Failure class recorded upstream when delivery raised
    pub error_class: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub webhook_event: String,
    pub webhook_id: String,
    pub webhook_url: String,
}

/// A delivery as the platform API reports it
#[derive(Debug, Deserialize)]
struct WebhookDeliveryRecord {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    response_status: Option<u16>,
    #[serde(default)]
    error_class: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    webhook_event: Option<String>,
    #[serde(default, deserialize_with = "super::optional_id_string")]
    webhook_id: Option<String>,
    #[serde(default)]
    webhook_url: Option<String>,
}

impl From<WebhookDeliveryRecord> for WebhookDelivery {
    fn from(record: WebhookDeliveryRecord) -> Self {
        WebhookDelivery {
            id: record.id,
            response_status: record.response_status,
            error_class: record.error_class,
            created_at: record.created_at,
            completed_at: record.completed_at,
            webhook_event: record.webhook_event.unwrap_or_default(),
            webhook_id: record.webhook_id.unwrap_or_default(),
            webhook_url: record.webhook_url.unwrap_or_default(),
        }
    }
}

/// Which page of deliveries to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryQuery {
    pub client_application_id: String,
    /// 1-based page number
    pub page: u32,
    pub size: u32,
}

impl DeliveryQuery {
    pub fn new(client_application_id: impl Into<String>, page: u32, size: u32) -> Self {
        Self {
            client_application_id: client_application_id.into(),
            page,
            size,
        }
    }

    /// Key a page of deliveries is cached under
    pub fn cache_key(&self) -> String {
        format!(
            "webhook_deliveries/{}/page/{}/size/{}",
            self.client_application_id, self.page, self.size
        )
    }
}

/// One page of deliveries plus the collection size, when upstream reports it
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPage {
    pub deliveries: Vec<WebhookDelivery>,
    pub total_count: Option<u64>,
}

/// Page bookkeeping shown alongside a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    /// `None` when the platform API did not report a total
    pub total_pages: Option<u32>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Pagination {
    /// Builds pagination for a fetched page
    ///
    /// Without a reported total, a full page is taken as a hint that another
    /// page may follow; no page count is invented.
    pub fn new(query: &DeliveryQuery, page: &DeliveryPage) -> Self {
        let size = query.size.max(1);
        let total_pages = page
            .total_count
            .map(|count| count.div_ceil(u64::from(size)).max(1))
            .map(|pages| u32::try_from(pages).unwrap_or(u32::MAX));
        let has_next = query.page < u32::MAX
            && match total_pages {
                Some(total) => query.page < total,
                None => page.deliveries.len() as u64 >= u64::from(size),
            };

        Pagination {
            current_page: query.page,
            page_size: query.size,
            total_pages,
            has_previous: query.page > 1,
            has_next,
        }
    }
}

/// Anything that can serve webhook deliveries
#[async_trait]
pub trait WebhookDeliverySource: Send + Sync {
    /// Fetches one page of deliveries for a client application
    async fn fetch_webhook_deliveries(
        &self,
        token: &AccessToken,
        query: &DeliveryQuery,
    ) -> Result<DeliveryPage, ApiError>;

    /// Fetches a single delivery by id
    async fn fetch_webhook_delivery(
        &self,
        token: &AccessToken,
        id: &str,
    ) -> Result<WebhookDelivery, ApiError>;
}

#[async_trait]
impl WebhookDeliverySource for ApiClient {
    async fn fetch_webhook_deliveries(
        &self,
        token: &AccessToken,
        query: &DeliveryQuery,
    ) -> Result<DeliveryPage, ApiError> {
        let request = self.get(token, &[COLLECTION])?.query(&[
            ("client_application_id", query.client_application_id.clone()),
            ("page", query.page.to_string()),
            ("size", query.size.to_string()),
        ]);

        let (records, headers): (Vec<WebhookDeliveryRecord>, _) =
            self.send_json(request, "webhook deliveries").await?;

        Ok(DeliveryPage {
            deliveries: records.into_iter().map(WebhookDelivery::from).collect(),
            total_count: total_count(&headers),
        })
    }

    async fn fetch_webhook_delivery(
        &self,
        token: &AccessToken,
        id: &str,
    ) -> Result<WebhookDelivery, ApiError> {
        let request = self.get(token, &[COLLECTION, id])?;
        let resource = format!("webhook delivery {}", id);
        let (record, _): (WebhookDeliveryRecord, _) = self.send_json(request, &resource).await?;
        Ok(record.into())
    }
}

/// Caching layer in front of another delivery source
///
/// Listings are cached per `DeliveryQuery::cache_key`; failed fetches are
/// never stored. Single deliveries always go to the inner source.
#[derive(Debug, Clone)]
pub struct CachedWebhookDeliveries<S> {
    inner: S,
    cache: CacheManager<DeliveryPage>,
}

impl<S> CachedWebhookDeliveries<S> {
    pub fn new(inner: S, cache: CacheManager<DeliveryPage>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<S> WebhookDeliverySource for CachedWebhookDeliveries<S>
where
    S: WebhookDeliverySource,
{
    async fn fetch_webhook_deliveries(
        &self,
        token: &AccessToken,
        query: &DeliveryQuery,
    ) -> Result<DeliveryPage, ApiError> {
        let cache_key = query.cache_key();

        if let Some(cached) = self.cache.read(&cache_key).await {
            tracing::debug!(key = %cache_key, cached_at = %cached.cached_at, "webhook deliveries cache hit");
            return Ok(cached.data);
        }

        tracing::debug!(key = %cache_key, "webhook deliveries cache miss");
        let page = self.inner.fetch_webhook_deliveries(token, query).await?;
        self.cache.write(&cache_key, page.clone()).await;
        Ok(page)
    }

    async fn fetch_webhook_delivery(
        &self,
        token: &AccessToken,
        id: &str,
    ) -> Result<WebhookDelivery, ApiError> {
        self.inner.fetch_webhook_delivery(token, id).await
    }
}
