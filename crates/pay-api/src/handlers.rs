//! # Request Handlers
//!
//! Axum request handlers for the payment API.
//! Each API endpoint accepts exactly one method and answers anything else
//! with `405` and an `Allow` header; provider failures pass through verbatim.

use crate::pages;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use pay_core::{AccountSessionRequest, EmbeddedCheckoutRequest, PaymentError};
use pay_stripe::mask_id;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout session response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionResponse {
    pub client_secret: String,
}

/// Create account session response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountSessionResponse {
    pub client_secret: String,
    pub account_id: String,
}

/// Session status query
#[derive(Debug, Deserialize)]
pub struct SessionStatusQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
            code: None,
            hint: None,
        }
    }

    /// Message plus classification, with sentinel values when the provider
    /// gave none
    pub fn classified(err: &PaymentError) -> Self {
        Self {
            error: err.to_string(),
            kind: Some(err.error_type().unwrap_or("unknown_error").to_string()),
            code: Some(err.error_code().unwrap_or("unknown_code").to_string()),
            hint: err.hint().map(String::from),
        }
    }
}

/// Failure of an API handler
#[derive(Debug)]
pub enum ApiError {
    /// Request used a method other than `allow`
    MethodNotAllowed { allow: Method },
    /// JSON error body with a status
    Failure {
        status: StatusCode,
        body: ErrorResponse,
    },
}

impl ApiError {
    /// Provider or config failure, body `{error}` only
    fn plain(err: &PaymentError) -> Self {
        ApiError::Failure {
            status: status_of(err),
            body: ErrorResponse::new(err.to_string()),
        }
    }

    /// Provider or config failure, body `{error, type, code}`
    fn classified(err: &PaymentError) -> Self {
        ApiError::Failure {
            status: status_of(err),
            body: ErrorResponse::classified(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MethodNotAllowed { allow } => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, allow.to_string())],
                "Method Not Allowed",
            )
                .into_response(),
            ApiError::Failure { status, body } => (status, Json(body)).into_response(),
        }
    }
}

fn status_of(err: &PaymentError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Reject anything but `allowed` before touching the provider
fn require_method(method: &Method, allowed: Method) -> Result<(), ApiError> {
    if *method == allowed {
        return Ok(());
    }
    info!("Method not allowed: {} (allowed: {})", method, allowed);
    Err(ApiError::MethodNotAllowed { allow: allowed })
}

// =============================================================================
// API Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "embedded-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create an embedded checkout session and return its client secret
#[instrument(skip(state, headers))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<CreateCheckoutSessionResponse>, ApiError> {
    require_method(&method, Method::POST)?;

    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    let return_url = state
        .storefront
        .return_url(state.origin_or_default(origin));

    let request = EmbeddedCheckoutRequest::single_item(state.checkout.price_id.clone(), return_url);

    let checkout = state
        .provider
        .create_embedded_checkout(&request)
        .await
        .map_err(|e| {
            error!("Failed to create checkout session: {}", e);
            ApiError::plain(&e)
        })?;

    info!("Created checkout session: {}", checkout.session_id);

    Ok(Json(CreateCheckoutSessionResponse {
        client_secret: checkout.client_secret,
    }))
}

/// Create an account session for the notification banner
#[instrument(skip(state))]
pub async fn create_account_session(
    State(state): State<AppState>,
    method: Method,
) -> Result<Json<CreateAccountSessionResponse>, ApiError> {
    require_method(&method, Method::POST)?;

    let account_id = match state.checkout.connected_account_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            error!("STRIPE_CONNECTED_ACCOUNT_ID not set");
            let err = PaymentError::MissingConfiguration {
                variable: "STRIPE_CONNECTED_ACCOUNT_ID".to_string(),
            };
            return Err(ApiError::plain(&err));
        }
    };

    if !state.capabilities.account_sessions {
        let err = PaymentError::CapabilityUnavailable {
            capability: "Account Sessions API".to_string(),
            hint: format!(
                "Set STRIPE_API_VERSION to {} or later",
                pay_stripe::ACCOUNT_SESSIONS_MIN_API_VERSION
            ),
        };
        warn!("Refusing account session: {}", err);
        return Err(ApiError::classified(&err));
    }

    info!("Creating account session for account: {}", mask_id(&account_id));

    let session = state
        .provider
        .create_account_session(&AccountSessionRequest::notification_banner(&account_id))
        .await
        .map_err(|e| {
            error!(
                "Failed to create account session: message={}, type={:?}, code={:?}",
                e,
                e.error_type(),
                e.error_code()
            );
            ApiError::classified(&e)
        })?;

    info!(
        "Account session created: account={}, expires_at={:?}",
        mask_id(&account_id),
        session.expires_at.map(|t| t.to_rfc3339())
    );

    Ok(Json(CreateAccountSessionResponse {
        client_secret: session.client_secret,
        account_id,
    }))
}

/// Look up a checkout session's status and buyer email
#[instrument(skip(state, query))]
pub async fn session_status(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<SessionStatusQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_method(&method, Method::GET)?;

    // Every failure of this endpoint is a 500, including a missing or malformed id
    let Query(query) = query.map_err(|rejection| {
        warn!("Rejected session status query: {}", rejection.body_text());
        ApiError::Failure {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse::new(rejection.body_text()),
        }
    })?;
    let session_id = query.session_id.ok_or_else(|| ApiError::Failure {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorResponse::new("session_id query parameter is required"),
    })?;

    let status = state
        .provider
        .retrieve_checkout_session(&session_id)
        .await
        .map_err(|e| {
            error!("Failed to retrieve session {}: {}", session_id, e);
            ApiError::plain(&e)
        })?;

    info!("Session {} status: {}", session_id, status.status);

    Ok(Json(status))
}

// =============================================================================
// Widget Host Pages
// =============================================================================

/// Embedded checkout page
pub async fn checkout_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::render(pages::CHECKOUT_PAGE, &state))
}

/// Return page; resolves `?session_id=` in the browser
pub async fn return_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::render(pages::RETURN_PAGE, &state))
}

/// Notification banner above the embedded checkout
pub async fn checkout_with_banner_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::render(pages::CHECKOUT_WITH_BANNER_PAGE, &state))
}

/// Two-tab Connect dashboard
pub async fn connect_dashboard_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::render(pages::CONNECT_DASHBOARD_PAGE, &state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_plain() {
        let body = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "boom"}));
    }

    #[test]
    fn test_error_response_defaults_sentinels() {
        let err = PaymentError::Network("connection reset".into());
        let body = serde_json::to_value(ErrorResponse::classified(&err)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "error": "Network error: connection reset",
                "type": "unknown_error",
                "code": "unknown_code"
            })
        );
    }

    #[test]
    fn test_require_method() {
        assert!(require_method(&Method::POST, Method::POST).is_ok());
        let response = require_method(&Method::GET, Method::POST)
            .unwrap_err()
            .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }

    #[test]
    fn test_missing_config_maps_to_bad_request() {
        let err = PaymentError::MissingConfiguration {
            variable: "STRIPE_CONNECTED_ACCOUNT_ID".into(),
        };
        assert_eq!(status_of(&err), StatusCode::BAD_REQUEST);
    }
}
