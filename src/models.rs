use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Request body for the content upload endpoint
///
/// Fields are kept as raw JSON so that a missing, empty or non-string value
/// is reported as a validation error rather than a parse failure.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub filename: Option<JsonValue>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub file_content_base64: Option<JsonValue>,
}

/// Request body for the checkout session endpoint
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub price_id: String,
}

/// Response type for a created checkout session
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_url: Option<String>,
}

/// Response type for a decoded bearer token
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthCheckResponse {
    pub status: String,
    pub email: String,
}

/// Signup fields, accepted as JSON or URL-encoded form
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl SignupRequest {
    /// `firstName lastName`, trimmed; `None` when both are blank
    pub fn display_name(&self) -> Option<String> {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Response type for a successful signup
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SignupResponse {
    pub message: String,
}
