use crate::error::ApiError;
use crate::models::AuthCheckResponse;
use crate::routes;
use crate::token;
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};

/// POST /auth-check handler - Read the email from a bearer token
///
/// SECURITY: the token signature is not verified. The returned email is
/// whatever the caller put in the payload, so this endpoint may drive UI
/// personalization but never an authorization decision.
#[utoipa::path(
    post,
    path = routes::AUTH_CHECK,
    responses(
        (status = 200, description = "Token payload carries an email", body = AuthCheckResponse),
        (status = 401, description = "Missing token (plain text)"),
        (status = 403, description = "Invalid token (plain text)")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn auth_check_handler(
    headers: HeaderMap,
) -> Result<(StatusCode, Json<AuthCheckResponse>), ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::MissingToken)?;

    let email = token::email_claim(token).ok_or(ApiError::InvalidToken)?;
    tracing::info!("Decoded token for {}", email);

    Ok((
        StatusCode::OK,
        Json(AuthCheckResponse {
            status: "ok".to_string(),
            email,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_bytes, body_json, setup_test_app};
    use axum::{body::Body, http::Request};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::MockServer;

    fn auth_request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/auth-check");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_auth_check_missing_header() {
        let server = MockServer::start().await;

        let response = setup_test_app(&server)
            .oneshot(auth_request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("access-control-allow-origin").is_none());
        assert_eq!(&body_bytes(response).await[..], b"Missing token");
    }

    #[tokio::test]
    async fn test_auth_check_wrong_scheme() {
        let server = MockServer::start().await;

        let response = setup_test_app(&server)
            .oneshot(auth_request(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(&body_bytes(response).await[..], b"Missing token");
    }

    #[tokio::test]
    async fn test_auth_check_undecodable_token() {
        let server = MockServer::start().await;

        for value in ["Bearer not-a-jwt", "Bearer a.!!!.c", "Bearer a.aGVsbG8.c"] {
            let response = setup_test_app(&server)
                .oneshot(auth_request(Some(value)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{}", value);
            assert_eq!(response.headers()["access-control-allow-origin"], "*");
            assert_eq!(&body_bytes(response).await[..], b"Invalid token");
        }
    }

    #[tokio::test]
    async fn test_auth_check_token_without_email() {
        let server = MockServer::start().await;
        let token = token::encode_unsigned(&json!({"sub": "uid-1"}));

        let response = setup_test_app(&server)
            .oneshot(auth_request(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_auth_check_non_string_email() {
        let server = MockServer::start().await;

        for claims in [json!({"email": 5}), json!({"email": true})] {
            let token = token::encode_unsigned(&claims);
            let response = setup_test_app(&server)
                .oneshot(auth_request(Some(&format!("Bearer {}", token))))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{}", claims);
            assert_eq!(&body_bytes(response).await[..], b"Invalid token");
        }
    }

    #[tokio::test]
    async fn test_auth_check_ok() {
        let server = MockServer::start().await;
        let token = token::encode_unsigned(&json!({"email": "ada@example.com", "sub": "uid-1"}));

        let response = setup_test_app(&server)
            .oneshot(auth_request(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let result: AuthCheckResponse = body_json(response).await;
        assert_eq!(result.status, "ok");
        assert_eq!(result.email, "ada@example.com");
    }
}
