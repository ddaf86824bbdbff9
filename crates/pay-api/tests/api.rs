//! HTTP surface tests against an in-process provider.

use async_trait::async_trait;
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use pay_api::{create_router, AppConfig, AppState, CheckoutSettings};
use pay_core::{
    AccountSession, AccountSessionRequest, CheckoutSessionStatus, EmbeddedCheckout,
    EmbeddedCheckoutRequest, PaymentError, PaymentProvider, PaymentResult, ProviderCapabilities,
    SessionStatus, Storefront,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeProvider {
    calls: AtomicUsize,
    fail_with: Option<(String, Option<String>, Option<String>)>,
    account_sessions: bool,
    last_checkout: Mutex<Option<EmbeddedCheckoutRequest>>,
}

impl FakeProvider {
    fn new() -> Self {
        Self {
            account_sessions: true,
            ..Self::default()
        }
    }

    fn failing(message: &str, kind: Option<&str>, code: Option<&str>) -> Self {
        Self {
            fail_with: Some((
                message.to_string(),
                kind.map(String::from),
                code.map(String::from),
            )),
            ..Self::new()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> PaymentResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some((message, kind, code)) => Err(PaymentError::Provider {
                message: message.clone(),
                kind: kind.clone(),
                code: code.clone(),
                http_status: 400,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn create_embedded_checkout(
        &self,
        request: &EmbeddedCheckoutRequest,
    ) -> PaymentResult<EmbeddedCheckout> {
        self.check_failure()?;
        *self.last_checkout.lock().unwrap() = Some(request.clone());
        Ok(EmbeddedCheckout {
            session_id: "cs_test_1".to_string(),
            client_secret: "cs_test_1_secret_abc".to_string(),
        })
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> PaymentResult<SessionStatus> {
        self.check_failure()?;
        Ok(match session_id {
            "sess_complete_1" => SessionStatus {
                status: CheckoutSessionStatus::Complete,
                customer_email: Some("a@example.com".to_string()),
            },
            "sess_expired" => SessionStatus {
                status: CheckoutSessionStatus::Expired,
                customer_email: None,
            },
            _ => SessionStatus {
                status: CheckoutSessionStatus::Open,
                customer_email: None,
            },
        })
    }

    async fn create_account_session(
        &self,
        request: &AccountSessionRequest,
    ) -> PaymentResult<AccountSession> {
        self.check_failure()?;
        Ok(AccountSession {
            account_id: request.account_id.clone(),
            client_secret: "accs_secret_xyz".to_string(),
            expires_at: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            account_sessions: self.account_sessions,
        }
    }
}

fn app_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        base_url: "http://localhost:8080".to_string(),
        environment: "test".to_string(),
        wasm_pkg_dir: "does-not-exist".to_string(),
    }
}

fn settings(account: Option<&str>) -> CheckoutSettings {
    CheckoutSettings {
        price_id: Some("price_123".to_string()),
        connected_account_id: account.map(String::from),
        publishable_key: "pk_test_xyz789".to_string(),
    }
}

fn server_with(provider: Arc<FakeProvider>, account: Option<&str>) -> TestServer {
    let state = AppState::with_provider(
        provider,
        settings(account),
        Storefront::default(),
        app_config(),
    );
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_wrong_methods_get_405_with_allow() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), Some("acct_123"));

    let cases = [
        ("/api/create-checkout-session", "POST", Method::GET),
        ("/api/create-checkout-session", "POST", Method::PUT),
        ("/api/create-account-session", "POST", Method::GET),
        ("/api/create-account-session", "POST", Method::DELETE),
        ("/api/session-status", "GET", Method::POST),
        ("/api/session-status", "GET", Method::PATCH),
    ];

    for (path, allowed, method) in cases {
        let response = server.method(method.clone(), path).await;
        assert_eq!(
            response.status_code(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{} {}",
            method,
            path
        );
        assert_eq!(response.headers()[header::ALLOW], allowed);
    }

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_create_checkout_session_returns_client_secret() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), None);

    let response = server
        .post("/api/create-checkout-session")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://shop.test"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({"clientSecret": "cs_test_1_secret_abc"}));

    let request = provider.last_checkout.lock().unwrap().clone().unwrap();
    assert_eq!(request.price_id.as_deref(), Some("price_123"));
    assert_eq!(request.quantity, 1);
    assert_eq!(
        request.return_url,
        "https://shop.test/return?session_id={CHECKOUT_SESSION_ID}"
    );
}

#[tokio::test]
async fn test_create_checkout_session_without_origin_uses_base_url() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), None);

    let response = server.post("/api/create-checkout-session").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let request = provider.last_checkout.lock().unwrap().clone().unwrap();
    assert_eq!(
        request.return_url,
        "http://localhost:8080/return?session_id={CHECKOUT_SESSION_ID}"
    );
}

#[tokio::test]
async fn test_create_checkout_session_provider_failure() {
    let provider = Arc::new(FakeProvider::failing(
        "No such price: 'price_123'",
        Some("invalid_request_error"),
        Some("resource_missing"),
    ));
    let server = server_with(provider.clone(), None);

    let response = server.post("/api/create-checkout-session").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": "No such price: 'price_123'"}));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_account_session_missing_account_id() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), None);

    let response = server.post("/api/create-account-session").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("STRIPE_CONNECTED_ACCOUNT_ID"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_account_session_empty_account_id_is_missing() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), Some(""));

    let response = server.post("/api/create-account-session").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_account_session_success() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), Some("acct_123"));

    let response = server.post("/api/create-account-session").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({"clientSecret": "accs_secret_xyz", "accountId": "acct_123"})
    );
}

#[tokio::test]
async fn test_account_session_provider_failure_defaults() {
    let provider = Arc::new(FakeProvider::failing("Account is not connected", None, None));
    let server = server_with(provider, Some("acct_123"));

    let response = server.post("/api/create-account-session").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "error": "Account is not connected",
            "type": "unknown_error",
            "code": "unknown_code"
        })
    );
}

#[tokio::test]
async fn test_account_session_provider_failure_classified() {
    let provider = Arc::new(FakeProvider::failing(
        "No such account: 'acct_123'",
        Some("invalid_request_error"),
        Some("account_invalid"),
    ));
    let server = server_with(provider, Some("acct_123"));

    let body: Value = server.post("/api/create-account-session").await.json();
    assert_eq!(body["type"], "invalid_request_error");
    assert_eq!(body["code"], "account_invalid");
}

#[tokio::test]
async fn test_account_session_capability_unavailable() {
    let provider = Arc::new(FakeProvider {
        account_sessions: false,
        ..FakeProvider::new()
    });
    let server = server_with(provider.clone(), Some("acct_123"));

    let response = server.post("/api/create-account-session").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Account Sessions API not available");
    assert_eq!(body["code"], "capability_unavailable");
    assert!(body["hint"].as_str().unwrap().contains("STRIPE_API_VERSION"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_session_status_complete() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider, None);

    let response = server
        .get("/api/session-status")
        .add_query_param("session_id", "sess_complete_1")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({"status": "complete", "customer_email": "a@example.com"})
    );
}

#[tokio::test]
async fn test_session_status_without_email() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider, None);

    let body: Value = server
        .get("/api/session-status")
        .add_query_param("session_id", "sess_expired")
        .await
        .json();

    assert_eq!(body, json!({"status": "expired", "customer_email": null}));
}

#[tokio::test]
async fn test_session_status_missing_id() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), None);

    let response = server.get("/api/session-status").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("session_id"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_session_status_provider_failure() {
    let provider = Arc::new(FakeProvider::failing(
        "No such checkout.session: cs_missing",
        Some("invalid_request_error"),
        Some("resource_missing"),
    ));
    let server = server_with(provider, None);

    let response = server
        .get("/api/session-status")
        .add_query_param("session_id", "cs_missing")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({"error": "No such checkout.session: cs_missing"})
    );
}

#[tokio::test]
async fn test_pages_embed_publishable_key() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), Some("acct_123"));

    for path in [
        "/checkout",
        "/checkout-with-banner",
        "/connect-dashboard",
    ] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{}", path);
        let html = response.text();
        assert!(html.contains("\"pk_test_xyz789\""), "{}", path);
        assert!(!html.contains("{{"), "{}", path);
    }

    let html = server.get("/return").await.text();
    assert!(html.contains("\"orders@example.com\""));
    assert!(html.contains("\"/checkout\""));

    // Pages never call the provider themselves
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_widget_pages_mount_checkout_selector() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider, Some("acct_123"));

    for path in ["/checkout", "/checkout-with-banner", "/connect-dashboard"] {
        let html = server.get(path).await.text();
        assert!(html.contains(r##"mount("#checkout")"##), "{}", path);
        assert!(html.trim_end().ends_with("</html>"), "{}", path);
    }
}

#[tokio::test]
async fn test_session_status_method_checked_before_query() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), None);

    let response = server
        .method(Method::DELETE, "/api/session-status?session_id=a&session_id=b")
        .await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_session_status_malformed_query() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider.clone(), None);

    let response = server
        .get("/api/session-status?session_id=a&session_id=b")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].is_string());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let provider = Arc::new(FakeProvider::new());
    let server = server_with(provider, None);

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(response.headers().contains_key("x-request-id"));
}
