//! Webhook delivery handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;

use super::pages::{self, log_api_error, status_for};
use super::AppState;
use crate::data::webhook_deliveries::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::data::{AccessToken, DeliveryQuery, Pagination};
use crate::ui::DeliveryListing;

/// Raw listing query; numbers stay strings so bad input falls back to defaults
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    client_application_id: Option<String>,
    page: Option<String>,
    size: Option<String>,
}

/// Parses a positive integer parameter, using `default` when absent, zero or malformed
fn parse_positive(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

impl ListParams {
    fn to_query(&self) -> Option<DeliveryQuery> {
        let client_application_id = self
            .client_application_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())?;
        Some(DeliveryQuery::new(
            client_application_id,
            parse_positive(self.page.as_deref(), DEFAULT_PAGE),
            parse_positive(self.size.as_deref(), DEFAULT_PAGE_SIZE),
        ))
    }
}

/// `GET /webhook_deliveries`
pub(crate) async fn index(
    State(state): State<AppState>,
    token: AccessToken,
    Query(params): Query<ListParams>,
) -> Response {
    let Some(query) = params.to_query() else {
        let listing = DeliveryListing {
            error: Some("A client_application_id is required to list webhook deliveries."),
            ..Default::default()
        };
        return pages::html(
            StatusCode::BAD_REQUEST,
            state.views.webhook_deliveries_index(&listing),
        );
    };

    match state.deliveries.fetch_webhook_deliveries(&token, &query).await {
        Ok(page) => {
            let listing = DeliveryListing {
                client_application_id: Some(&query.client_application_id),
                deliveries: &page.deliveries,
                pagination: Some(Pagination::new(&query, &page)),
                error: None,
            };
            pages::html(StatusCode::OK, state.views.webhook_deliveries_index(&listing))
        }
        Err(err) => {
            log_api_error("list webhook deliveries", &err);
            let message = err.to_string();
            let listing = DeliveryListing {
                client_application_id: Some(&query.client_application_id),
                error: Some(&message),
                ..Default::default()
            };
            pages::html(status_for(&err), state.views.webhook_deliveries_index(&listing))
        }
    }
}

/// `GET /webhook_deliveries/{id}`
pub(crate) async fn show(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
) -> Response {
    match state.deliveries.fetch_webhook_delivery(&token, &id).await {
        Ok(delivery) => pages::html(
            StatusCode::OK,
            state.views.webhook_delivery_show(Some(&delivery), None),
        ),
        Err(err) => {
            log_api_error("show webhook delivery", &err);
            let message = err.to_string();
            pages::html(
                status_for(&err),
                state.views.webhook_delivery_show(None, Some(&message)),
            )
        }
    }
}
