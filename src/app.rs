use axum::{
    handler::Handler,
    middleware,
    routing::{post, MethodRouter},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::cors;
use crate::handlers::{
    auth_check_handler, checkout_session_handler, form_submit_handler, signup_handler,
    upload_handler,
};
use crate::routes;
use crate::state::AppState;

/// A POST-only route. Other methods on the same path fall through to the
/// static assets, as unknown paths do.
fn dispatch<H, T>(handler: H, assets: &ServeDir) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    post(handler)
        .route_layer(middleware::map_response(cors::allow_origin))
        .fallback_service(assets.clone())
}

/// Build the dispatcher
///
/// `OPTIONS` on any path is answered by the preflight layer before routing.
/// Everything that matches no (method, path) pair is served from the
/// pre-built site in `assets_dir`.
pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);

    let mut app = Router::new()
        .route(routes::FORM_SUBMIT, dispatch(form_submit_handler, &assets))
        .route(routes::UPLOAD_TO_GITHUB, dispatch(upload_handler, &assets))
        .route(routes::CREATE_STRIPE_SESSION, dispatch(checkout_session_handler, &assets))
        .route(routes::AUTH_CHECK, dispatch(auth_check_handler, &assets))
        .route(routes::SIGNUP, dispatch(signup_handler, &assets));

    if state.config.api_docs {
        app = app.merge(
            SwaggerUi::new(routes::API_DOCS).url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app.fallback_service(assets)
        .layer(middleware::from_fn(cors::preflight))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
