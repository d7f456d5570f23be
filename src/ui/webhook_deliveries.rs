//! Webhook delivery pages

use serde::Serialize;
use tera::Context;
use url::form_urlencoded;

use super::{format_optional_timestamp, format_timestamp, Views};
use crate::data::{Pagination, WebhookDelivery};

/// Everything the delivery listing shows
#[derive(Debug, Default)]
pub struct DeliveryListing<'a> {
    pub client_application_id: Option<&'a str>,
    pub deliveries: &'a [WebhookDelivery],
    /// Absent when the fetch failed
    pub pagination: Option<Pagination>,
    pub error: Option<&'a str>,
}

/// A delivery with display-ready fields
#[derive(Debug, Serialize)]
struct DeliveryRow {
    id: String,
    status: String,
    outcome: &'static str,
    error_class: String,
    created_at: String,
    completed_at: String,
    duration: String,
    webhook_event: String,
    webhook_id: String,
    webhook_url: String,
}

impl From<&WebhookDelivery> for DeliveryRow {
    fn from(delivery: &WebhookDelivery) -> Self {
        DeliveryRow {
            id: delivery.id.clone(),
            status: status_label(delivery),
            outcome: outcome(delivery),
            error_class: delivery.error_class.clone().unwrap_or_default(),
            created_at: format_timestamp(&delivery.created_at),
            completed_at: format_optional_timestamp(delivery.completed_at.as_ref()),
            duration: duration_label(delivery),
            webhook_event: delivery.webhook_event.clone(),
            webhook_id: delivery.webhook_id.clone(),
            webhook_url: delivery.webhook_url.clone(),
        }
    }
}

/// Coarse delivery result used for styling
fn outcome(delivery: &WebhookDelivery) -> &'static str {
    match delivery.response_status {
        Some(status) if (200..300).contains(&status) => "success",
        Some(_) => "failure",
        None if delivery.error_class.is_some() => "failure",
        None if delivery.completed_at.is_none() => "pending",
        None => "failure",
    }
}

fn status_label(delivery: &WebhookDelivery) -> String {
    match (delivery.response_status, outcome(delivery)) {
        (Some(status), _) => status.to_string(),
        (None, "pending") => "pending".to_string(),
        (None, _) => "no response".to_string(),
    }
}

fn duration_label(delivery: &WebhookDelivery) -> String {
    match delivery.completed_at {
        Some(completed_at) => {
            let millis = (completed_at - delivery.created_at).num_milliseconds();
            format!("{} ms", millis.max(0))
        }
        None => String::new(),
    }
}

/// Listing URL for another page of the same application
fn page_url(client_application_id: &str, page: u32, size: u32) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("client_application_id", client_application_id)
        .append_pair("page", &page.to_string())
        .append_pair("size", &size.to_string())
        .finish();
    format!("/webhook_deliveries?{}", query)
}

impl Views {
    /// Renders the paginated delivery listing
    pub fn webhook_deliveries_index(&self, listing: &DeliveryListing) -> Result<String, tera::Error> {
        let rows: Vec<DeliveryRow> = listing.deliveries.iter().map(DeliveryRow::from).collect();

        let (previous_url, next_url) = match (listing.client_application_id, listing.pagination) {
            (Some(id), Some(pagination)) => (
                pagination
                    .has_previous
                    .then(|| page_url(id, pagination.current_page - 1, pagination.page_size)),
                pagination
                    .has_next
                    .then(|| page_url(id, pagination.current_page + 1, pagination.page_size)),
            ),
            _ => (None, None),
        };

        let mut context = Context::new();
        context.insert("client_application_id", &listing.client_application_id);
        context.insert("deliveries", &rows);
        context.insert("pagination", &listing.pagination);
        context.insert("previous_url", &previous_url);
        context.insert("next_url", &next_url);
        self.render("webhook_deliveries/index.html", context, listing.error)
    }

    /// Renders a single delivery, or only the error banner when there is none
    pub fn webhook_delivery_show(
        &self,
        delivery: Option<&WebhookDelivery>,
        error: Option<&str>,
    ) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("delivery", &delivery.map(DeliveryRow::from));
        self.render("webhook_deliveries/show.html", context, error)
    }
}
