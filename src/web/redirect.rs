//! Post-create redirect targets
//!
//! The create form may carry a `redirect_uri` so the operator lands back where
//! they started. Only same-site targets are honoured.

use url::Url;

/// Where operators land when no usable target was given
pub const DEFAULT_REDIRECT: &str = "/client_applications";

/// Picks a redirect target that cannot leave this site
///
/// # Arguments
/// * `redirect_uri` - Target requested by the form
/// * `request_host` - `Host` header of the current request, port included
///
/// # Returns
/// The requested target when it is a local path or an absolute http(s) URL on
/// the request's own host, otherwise `DEFAULT_REDIRECT`.
pub fn safe_redirect_target(redirect_uri: Option<&str>, request_host: Option<&str>) -> String {
    let Some(target) = redirect_uri.map(str::trim).filter(|t| !t.is_empty()) else {
        return DEFAULT_REDIRECT.to_string();
    };

    if is_local_path(target) {
        return target.to_string();
    }

    match (Url::parse(target), request_host) {
        (Ok(url), Some(host)) if is_same_host(&url, host) => url.to_string(),
        _ => {
            tracing::info!(redirect = %target, "refusing off-site redirect");
            DEFAULT_REDIRECT.to_string()
        }
    }
}

/// `/docs` is local; `//evil.com` and `/\evil.com` are protocol-relative escapes
///
/// Browsers drop tabs and newlines while parsing a URL, so `/<TAB>/evil.com`
/// lands on `//evil.com`. Any control or whitespace character disqualifies
/// the target.
fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(|c| c.is_control() || c.is_whitespace())
}

fn is_same_host(url: &Url, request_host: &str) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    authority.eq_ignore_ascii_case(request_host)
}
