//! # Routes
//!
//! Axum router configuration for the payment API and widget host pages.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Request},
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use uuid::Uuid;

/// Assigns a UUID v4 `x-request-id` to every incoming request
#[derive(Clone, Copy, Default)]
pub struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id: HeaderValue = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Create the main application router
///
/// Routes:
/// - API (method checked inside each handler, `405` + `Allow` otherwise):
///   - POST /api/create-checkout-session - Embedded checkout client secret
///   - POST /api/create-account-session - Notification banner client secret
///   - GET  /api/session-status?session_id=... - Status and buyer email
///
/// - Pages:
///   - GET /checkout - Embedded checkout (path from storefront settings)
///   - GET /return - Return page (path from storefront settings)
///   - GET /checkout-with-banner - Banner above checkout
///   - GET /connect-dashboard - Two-tab dashboard
///
/// - Static:
///   - GET /pkg/* - wasm bundle
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // `any` so that wrong methods reach the handler and get the exact Allow header
    let api_routes = Router::new()
        .route(
            "/create-checkout-session",
            any(handlers::create_checkout_session),
        )
        .route(
            "/create-account-session",
            any(handlers::create_account_session),
        )
        .route("/session-status", any(handlers::session_status));

    let page_routes = Router::new()
        .route(
            state.storefront.checkout_path.as_str(),
            get(handlers::checkout_page),
        )
        .route(
            state.storefront.return_path.as_str(),
            get(handlers::return_page),
        )
        .route(
            "/checkout-with-banner",
            get(handlers::checkout_with_banner_page),
        )
        .route(
            "/connect-dashboard",
            get(handlers::connect_dashboard_page),
        );

    let wasm_pkg = ServeDir::new(&state.config.wasm_pkg_dir);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        .merge(page_routes)
        .nest_service("/pkg", wasm_pkg)
        // Middleware
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(RequestUuid))
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uuid_is_valid_header() {
        let request = Request::builder().body(()).unwrap();
        let id = RequestUuid.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
