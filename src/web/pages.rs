//! Turning rendered views and API failures into responses

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::data::ApiError;

/// Wraps a rendered page, falling back to a plain 500 if rendering failed
pub(crate) fn html(status: StatusCode, rendered: Result<String, tera::Error>) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            tracing::error!(error = ?err, "failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Status a page carrying this error is served with
pub(crate) fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
        ApiError::NotFound(_) | ApiError::InvalidId(_) => StatusCode::NOT_FOUND,
        ApiError::Network(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        ApiError::Network(_)
        | ApiError::Status { .. }
        | ApiError::Decode(_)
        | ApiError::InvalidBaseUrl(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Logs an upstream failure at a level matching its kind
pub(crate) fn log_api_error(operation: &str, err: &ApiError) {
    match err {
        ApiError::Auth(_) | ApiError::NotFound(_) | ApiError::InvalidId(_) => {
            tracing::info!(operation, error = %err, "platform API request refused")
        }
        _ => tracing::warn!(operation, error = %err, "platform API request failed"),
    }
}
