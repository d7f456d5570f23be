//! Platform API access and view models
//!
//! This module contains the API client and the types the console shows:
//! client applications and the webhook deliveries made on their behalf.
//! Nothing here is persisted; every value lives for one request or one
//! cache entry.

pub mod client;
pub mod client_applications;
pub mod webhook_deliveries;

pub use client::{AccessToken, ApiClient, ApiError};
pub use client_applications::{ClientApplication, ClientApplicationParams};
pub use webhook_deliveries::{
    CachedWebhookDeliveries, DeliveryPage, DeliveryQuery, Pagination, WebhookDelivery,
    WebhookDeliverySource,
};

use serde::{Deserialize, Deserializer};

/// Identifier that the platform API may send as a string or a number
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Deserializes an identifier into its string form
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Like `id_string`, for identifiers that may be null or absent
pub(crate) fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
