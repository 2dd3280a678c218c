use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::cors::Bare;

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Custom error type for dispatcher routes
///
/// Every route converts its failures into one of these variants, so the
/// status code and body shape are decided in one place. JSON variants share
/// the `{"error": ...}` body; the token-inspection variants answer in plain text.
#[derive(Debug)]
pub enum ApiError {
    /// `filename` or `fileContentBase64` missing or empty
    MissingFields,
    /// Upload filename would leave the uploads directory
    InvalidFilename(String),
    /// Signup body was neither JSON nor URL-encoded
    UnsupportedContentType,
    /// Identity provider refused the signup
    SignupRejected(String),
    /// No `Authorization: Bearer` header
    MissingToken,
    /// Token payload could not be decoded or carries no email
    InvalidToken,
    /// Required configuration is absent for this request
    Config(String),
    /// Request to an upstream failed before a response arrived
    Upstream(reqwest::Error),
    /// Inbound body or upstream body was not the expected JSON
    MalformedBody(serde_json::Error),
    /// Anything else
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::MissingToken => {
                tracing::info!("Rejected request without bearer token");
                let mut response = (
                    StatusCode::UNAUTHORIZED,
                    [(header::CONTENT_TYPE, "text/plain")],
                    "Missing token",
                )
                    .into_response();
                response.extensions_mut().insert(Bare);
                return response;
            }
            ApiError::InvalidToken => {
                tracing::info!("Rejected undecodable bearer token");
                return (
                    StatusCode::FORBIDDEN,
                    [(header::CONTENT_TYPE, "text/plain")],
                    "Invalid token",
                )
                    .into_response();
            }
            ApiError::MissingFields => (
                StatusCode::BAD_REQUEST,
                "Missing filename or file content".to_string(),
            ),
            ApiError::InvalidFilename(name) => {
                tracing::warn!("Rejected upload filename {:?}", name);
                (StatusCode::BAD_REQUEST, "Invalid filename".to_string())
            }
            ApiError::UnsupportedContentType => (
                StatusCode::BAD_REQUEST,
                "Unsupported content type".to_string(),
            ),
            ApiError::SignupRejected(message) => {
                tracing::warn!("Signup rejected by identity provider: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Config(message) => {
                tracing::error!("Configuration error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::Upstream(err) => {
                tracing::error!("Upstream request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::MalformedBody(err) => {
                tracing::error!("JSON parse error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::MalformedBody(err)
    }
}
