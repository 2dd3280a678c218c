use crate::error::{ApiError, ErrorResponse};
use crate::handlers::{parse_json, passthrough};
use crate::routes;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, response::Response};
use serde_json::{Map, Value as JsonValue};

pub const DEFAULT_TEMPLATE: &str = "contact_basic_logo_modern";
pub const DEFAULT_FROM: &str = "info@cloudmysite.com";
pub const DEFAULT_URGENCY: &str = "Normal";

/// POST /form-submit handler - Relay a contact form
///
/// Fills in relay defaults and forwards the fields to the relay endpoint.
/// The relay's status and body are returned unchanged.
#[utoipa::path(
    post,
    path = routes::FORM_SUBMIT,
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Relay response, passed through"),
        (status = 500, description = "Malformed body or relay unreachable", body = ErrorResponse)
    ),
    tag = "relay"
)]
pub async fn form_submit_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let form: Map<String, JsonValue> = parse_json(&body)?;
    let payload = with_relay_defaults(form);

    tracing::info!(
        "Submitting form with {} fields using template {}",
        payload.len(),
        payload["template"]
    );

    let upstream = state.upstream.relay_form(&payload).await?;
    Ok(passthrough(upstream, None))
}

fn is_blank(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Apply relay defaults to submitted form fields.
///
/// `template`, `logo` and `from` replace blank values; `urgency` is only
/// added when the form does not carry one.
pub fn with_relay_defaults(mut form: Map<String, JsonValue>) -> Map<String, JsonValue> {
    for (key, default) in [
        ("template", DEFAULT_TEMPLATE),
        ("logo", ""),
        ("from", DEFAULT_FROM),
    ] {
        if is_blank(form.get(key)) {
            form.insert(key.to_string(), JsonValue::from(default));
        }
    }

    if matches!(form.get("urgency"), None | Some(JsonValue::Null)) {
        form.insert("urgency".to_string(), JsonValue::from(DEFAULT_URGENCY));
    }

    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_bytes, body_json, post_json, setup_test_app};
    use axum::{body::Body, http::{Request, StatusCode}};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json as body_matches, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn as_map(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let payload = with_relay_defaults(as_map(json!({"name": "Ada", "message": "hi"})));

        assert_eq!(payload["template"], DEFAULT_TEMPLATE);
        assert_eq!(payload["logo"], "");
        assert_eq!(payload["from"], DEFAULT_FROM);
        assert_eq!(payload["urgency"], DEFAULT_URGENCY);
        assert_eq!(payload["name"], "Ada");
        assert_eq!(payload["message"], "hi");
    }

    #[test]
    fn test_defaults_keep_provided_values() {
        let payload = with_relay_defaults(as_map(json!({
            "template": "quote_request",
            "logo": "https://cdn.example.com/logo.png",
            "from": "sales@example.com",
            "urgency": "High"
        })));

        assert_eq!(payload["template"], "quote_request");
        assert_eq!(payload["logo"], "https://cdn.example.com/logo.png");
        assert_eq!(payload["from"], "sales@example.com");
        assert_eq!(payload["urgency"], "High");
    }

    #[test]
    fn test_defaults_replace_blank_values() {
        let payload = with_relay_defaults(as_map(json!({
            "template": "",
            "from": null,
            "urgency": ""
        })));

        assert_eq!(payload["template"], DEFAULT_TEMPLATE);
        assert_eq!(payload["from"], DEFAULT_FROM);
        // An explicit urgency is kept even when empty.
        assert_eq!(payload["urgency"], "");
    }

    #[tokio::test]
    async fn test_form_submit_relays_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/form"))
            .and(header("x-api-key", "relay-key"))
            .and(body_matches(json!({
                "name": "Ada",
                "template": DEFAULT_TEMPLATE,
                "logo": "",
                "from": DEFAULT_FROM,
                "urgency": DEFAULT_URGENCY
            })))
            .respond_with(
                ResponseTemplate::new(202)
                    .set_body_raw(r#"{"queued":true}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = setup_test_app(&server)
            .oneshot(post_json("/form-submit", json!({"name": "Ada"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(&body_bytes(response).await[..], br#"{"queued":true}"#);
    }

    #[tokio::test]
    async fn test_form_submit_passes_upstream_error_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/form"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .expect(1)
            .mount(&server)
            .await;

        let response = setup_test_app(&server)
            .oneshot(post_json("/form-submit", json!({"name": "Ada"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(&body_bytes(response).await[..], b"Forbidden");
    }

    #[tokio::test]
    async fn test_form_submit_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let response = setup_test_app(&server)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/form-submit")
                    .header("content-type", "application/json")
                    .body(Body::from("{invalid json}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let error: ErrorResponse = body_json(response).await;
        assert!(!error.error.is_empty());
    }

    #[tokio::test]
    async fn test_form_submit_relay_unreachable() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let response = crate::handlers::test_support::setup_with_config(
            crate::config::Config::for_upstream(&uri),
        )
        .oneshot(post_json("/form-submit", json!({"name": "Ada"})))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = body_json(response).await;
        assert!(!error.error.is_empty());
    }
}
