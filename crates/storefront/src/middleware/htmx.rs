//! HTMX request detection.
//!
//! Cart forms post with HTMX when JavaScript is available and fall back to
//! plain form posts otherwise. Handlers answer the first with a fragment and
//! the second with a redirect back to the page the form was on.

use axum::{extract::FromRequestParts, http::request::Parts};

/// Header HTMX sets on every request it issues.
pub const HX_REQUEST_HEADER: &str = "hx-request";

/// Whether the request was issued by HTMX.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get(HX_REQUEST_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == "true");
        Ok(Self(is_htmx))
    }
}

/// Sanitize a `return_to` form field into a local path.
///
/// Only absolute paths on this site are accepted; anything else (including
/// protocol-relative `//host` URLs) falls back to `/`.
#[must_use]
pub fn local_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}
