use crate::error::{ApiError, ErrorResponse};
use crate::handlers::parse_json;
use crate::models::{SignupRequest, SignupResponse};
use crate::routes;
use crate::state::AppState;
use crate::upstream::UpstreamClient;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value as JsonValue;

/// POST /signup handler - Create an email/password account
///
/// Accepts JSON or URL-encoded form bodies. A rejection by the identity
/// provider is reported as 400 with the provider's message, whatever status
/// the provider used.
#[utoipa::path(
    post,
    path = routes::SIGNUP,
    request_body(content = SignupRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Account created", body = SignupResponse),
        (status = 400, description = "Unsupported content type or signup rejected", body = ErrorResponse),
        (status = 500, description = "Malformed body or identity provider failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let signup: SignupRequest = if content_type.contains("application/json") {
        parse_json(&body)?
    } else if content_type.contains("application/x-www-form-urlencoded") {
        serde_urlencoded::from_bytes(&body).map_err(|err| ApiError::Internal(err.into()))?
    } else {
        return Err(ApiError::UnsupportedContentType);
    };

    tracing::info!(
        "Signing up user {}",
        signup.email.as_deref().unwrap_or("<no email>")
    );

    let upstream = state
        .upstream
        .identity_sign_up(signup.email.as_deref(), signup.password.as_deref())
        .await?;
    let account = upstream.json()?;

    if !upstream.is_success() {
        let message = account
            .pointer("/error/message")
            .and_then(JsonValue::as_str)
            .unwrap_or("Signup failed");
        return Err(ApiError::SignupRejected(message.to_string()));
    }

    match (account.get("idToken").and_then(JsonValue::as_str), signup.display_name()) {
        (Some(id_token), Some(display_name)) => {
            spawn_display_name_update(state.upstream.clone(), id_token.to_string(), display_name)
        }
        _ => tracing::debug!("Skipping display name update"),
    }

    Ok((
        StatusCode::OK,
        Json(SignupResponse {
            message: "Signup successful!".to_string(),
        }),
    ))
}

/// Set the new account's display name in a detached task.
///
/// The signup response never waits for this and its outcome is only logged.
fn spawn_display_name_update(upstream: UpstreamClient, id_token: String, display_name: String) {
    tokio::spawn(async move {
        match upstream
            .identity_update_display_name(&id_token, &display_name)
            .await
        {
            Ok(response) if response.is_success() => {
                tracing::debug!("Display name set to {}", display_name)
            }
            Ok(response) => {
                tracing::warn!("Display name update rejected with {}", response.status)
            }
            Err(err) => tracing::warn!("Display name update failed: {}", err),
        }
    });
}
