//! CORS handling for the dispatcher.
//!
//! Preflight requests are answered before any route or method matching, and
//! every response produced by a business route carries a wildcard
//! `Access-Control-Allow-Origin` unless it was marked [`Bare`].

use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Response extension marking a response that must not receive CORS headers.
#[derive(Debug, Clone, Copy)]
pub struct Bare;

/// Middleware answering every `OPTIONS` request with a 204 preflight response.
pub async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        tracing::debug!("CORS preflight for {}", request.uri().path());
        return preflight_response();
    }
    next.run(request).await
}

pub fn preflight_response() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        ],
    )
        .into_response()
}

/// Response mapper adding `Access-Control-Allow-Origin: *`.
pub async fn allow_origin(mut response: Response) -> Response {
    if response.extensions().get::<Bare>().is_none() {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware, routing::post, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/plain", post(|| async { "ok" }))
            .route(
                "/bare",
                post(|| async {
                    let mut response = (StatusCode::UNAUTHORIZED, "nope").into_response();
                    response.extensions_mut().insert(Bare);
                    response
                }),
            )
            .layer(middleware::map_response(allow_origin))
            .layer(middleware::from_fn(preflight))
    }

    #[tokio::test]
    async fn test_preflight_on_any_path() {
        for path in ["/plain", "/bare", "/does-not-exist", "/"] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method("OPTIONS")
                        .uri(path)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NO_CONTENT);
            assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
            assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "*");
            assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        }
    }

    #[tokio::test]
    async fn test_allow_origin_added() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/plain")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_bare_response_untouched() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bare")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
