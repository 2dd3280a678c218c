pub mod auth;
pub mod checkout;
pub mod form;
pub mod signup;
pub mod upload;

pub use auth::auth_check_handler;
pub use checkout::checkout_session_handler;
pub use form::form_submit_handler;
pub use signup::signup_handler;
pub use upload::upload_handler;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Uri};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::upstream::UpstreamResponse;

/// Parse a JSON request body; failures take the 500 path like any other
/// unexpected error.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

/// Re-wrap an upstream response, keeping its status and body verbatim.
///
/// `content_type` overrides whatever the upstream sent.
pub(crate) fn passthrough(upstream: UpstreamResponse, content_type: Option<&str>) -> Response {
    let content_type = content_type
        .map(ToString::to_string)
        .or(upstream.content_type);
    let mut response = (upstream.status, upstream.body).into_response();

    if let Some(value) = content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

/// Host the request was addressed to, from the `Host` header or an absolute URI.
pub(crate) fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
}

/// `<scheme>://<host>` of the current request.
pub(crate) fn request_origin(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let host = request_host(headers, uri)?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");
    Some(format!("{}://{}", scheme, host))
}
