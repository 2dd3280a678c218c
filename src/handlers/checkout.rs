use crate::error::{ApiError, ErrorResponse};
use crate::handlers::{parse_json, request_origin};
use crate::models::{CheckoutRequest, CheckoutResponse};
use crate::routes;
use crate::state::AppState;
use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Json,
};
use serde_json::Value as JsonValue;

/// POST /create-stripe-session handler - Start a hosted checkout
///
/// Success and cancel redirects point back at the origin of the current
/// request. The upstream status is kept; only the session URL is returned.
#[utoipa::path(
    post,
    path = routes::CREATE_STRIPE_SESSION,
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Session created", body = CheckoutResponse),
        (status = 500, description = "Malformed body or payment provider failure", body = ErrorResponse)
    ),
    tag = "payments"
)]
pub async fn checkout_session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let checkout: CheckoutRequest = parse_json(&body)?;
    let origin = request_origin(&headers, &uri)
        .ok_or_else(|| anyhow!("Cannot determine request origin: no Host header"))?;

    tracing::info!("Creating checkout session for price {}", checkout.price_id);
    let upstream = state
        .upstream
        .stripe_checkout_session(
            &checkout.price_id,
            &format!("{}/success", origin),
            &format!("{}/cancel", origin),
        )
        .await?;

    let session = upstream.json()?;
    if !upstream.is_success() {
        tracing::warn!("Checkout session rejected with {}", upstream.status);
    }

    Ok((
        upstream.status,
        Json(CheckoutResponse {
            session_url: session
                .get("url")
                .and_then(JsonValue::as_str)
                .map(ToString::to_string),
        }),
    ))
}
