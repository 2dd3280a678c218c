use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{
    AuthCheckResponse, CheckoutRequest, CheckoutResponse, SignupRequest, SignupResponse,
    UploadRequest,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "site-edge API",
        version = "1.0.0",
        description = "Edge dispatcher relaying site requests to third-party APIs"
    ),
    paths(
        handlers::form::form_submit_handler,
        handlers::upload::upload_handler,
        handlers::checkout::checkout_session_handler,
        handlers::auth::auth_check_handler,
        handlers::signup::signup_handler
    ),
    components(
        schemas(
            UploadRequest,
            CheckoutRequest,
            CheckoutResponse,
            AuthCheckResponse,
            SignupRequest,
            SignupResponse,
            ErrorResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "relay", description = "Contact form relay"),
        (name = "content", description = "Repository content uploads"),
        (name = "payments", description = "Checkout sessions"),
        (name = "auth", description = "Account signup and token inspection")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
