//! Access token extraction
//!
//! The token is issued by the platform's sign-in flow and arrives with each
//! request, either in the session cookie or in the same header the platform
//! API expects. Handlers receive it as an explicit `AccessToken` argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use super::pages;
use super::AppState;
use crate::data::client::ACCESS_TOKEN_HEADER;
use crate::data::AccessToken;

/// Cookie holding the operator's access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Finds the token in the cookie first, then in the header
fn token_from_parts(parts: &Parts) -> Option<AccessToken> {
    let jar = CookieJar::from_headers(&parts.headers);
    let from_cookie = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().trim().to_string());
    let from_header = || {
        parts
            .headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
    };

    from_cookie
        .filter(|token| !token.is_empty())
        .or_else(|| from_header().filter(|token| !token.is_empty()))
        .map(AccessToken::new)
}

impl FromRequestParts<AppState> for AccessToken {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match token_from_parts(parts) {
            Some(token) => Ok(token),
            None => {
                tracing::info!(path = %parts.uri.path(), "request without access token");
                Err(pages::html(
                    StatusCode::UNAUTHORIZED,
                    state.views.sign_in_required(),
                ))
            }
        }
    }
}
