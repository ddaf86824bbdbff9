//! # Stripe Client
//!
//! Implementation of the Checkout Sessions and Account Sessions APIs used by
//! the embedded widgets. One client is built at startup and shared.

use crate::config::{StripeConfig, ACCOUNT_SESSIONS_MIN_API_VERSION};
use async_trait::async_trait;
use chrono::DateTime;
use pay_core::{
    AccountSession, AccountSessionRequest, CheckoutSessionStatus, EmbeddedCheckout,
    EmbeddedCheckoutRequest, PaymentError, PaymentProvider, PaymentResult, ProviderCapabilities,
    SessionStatus,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Stripe API client for embedded checkout and Connect components
pub struct StripeClient {
    config: StripeConfig,
    client: Client,
    capabilities: ProviderCapabilities,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let capabilities = config.capabilities();

        Ok(Self {
            config,
            client,
            capabilities,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build an API URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> PaymentResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| {
            PaymentError::Configuration(format!("Invalid Stripe API base URL: {}", e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                PaymentError::Configuration("Stripe API base URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Send an authenticated request and decode the JSON body
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> PaymentResult<T> {
        let response = request
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);
            return Err(provider_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }

    fn checkout_form(request: &EmbeddedCheckoutRequest) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("ui_mode".to_string(), "embedded".to_string()),
            ("mode".to_string(), "payment".to_string()),
            ("return_url".to_string(), request.return_url.clone()),
        ];

        if let Some(ref price) = request.price_id {
            form_params.push(("line_items[0][price]".to_string(), price.clone()));
        }
        form_params.push((
            "line_items[0][quantity]".to_string(),
            request.quantity.to_string(),
        ));

        form_params
    }

    fn account_session_form(request: &AccountSessionRequest) -> Vec<(String, String)> {
        let banner = request.notification_banner;
        vec![
            ("account".to_string(), request.account_id.clone()),
            (
                "components[notification_banner][enabled]".to_string(),
                banner.enabled.to_string(),
            ),
            (
                "components[notification_banner][features][external_account_collection]"
                    .to_string(),
                banner.external_account_collection.to_string(),
            ),
        ]
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    #[instrument(skip(self, request), fields(return_url = %request.return_url))]
    async fn create_embedded_checkout(
        &self,
        request: &EmbeddedCheckoutRequest,
    ) -> PaymentResult<EmbeddedCheckout> {
        let form_params = Self::checkout_form(request);
        debug!(
            "Creating Stripe embedded checkout session: price={:?}",
            request.price_id
        );

        let url = self.endpoint(&["v1", "checkout", "sessions"])?;
        let session: StripeCheckoutSessionResponse = self
            .execute(self.client.post(url).form(&form_params))
            .await?;

        let client_secret = session.client_secret.ok_or_else(|| {
            PaymentError::Serialization(format!(
                "Stripe checkout session {} has no client_secret",
                session.id
            ))
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(EmbeddedCheckout {
            session_id: session.id,
            client_secret,
        })
    }

    #[instrument(skip(self))]
    async fn retrieve_checkout_session(&self, session_id: &str) -> PaymentResult<SessionStatus> {
        let url = self.endpoint(&["v1", "checkout", "sessions", session_id])?;
        let session: StripeCheckoutSessionResponse =
            self.execute(self.client.get(url)).await?;

        let status = CheckoutSessionStatus::from(session.status.unwrap_or_default());
        debug!("Retrieved Stripe checkout session: id={}, status={}", session.id, status);

        Ok(SessionStatus {
            status,
            customer_email: session.customer_details.and_then(|d| d.email),
        })
    }

    #[instrument(skip(self, request))]
    async fn create_account_session(
        &self,
        request: &AccountSessionRequest,
    ) -> PaymentResult<AccountSession> {
        if !self.capabilities.account_sessions {
            return Err(PaymentError::CapabilityUnavailable {
                capability: "Account Sessions API".to_string(),
                hint: format!(
                    "Set STRIPE_API_VERSION to {} or later",
                    ACCOUNT_SESSIONS_MIN_API_VERSION
                ),
            });
        }

        let form_params = Self::account_session_form(request);
        let url = self.endpoint(&["v1", "account_sessions"])?;
        let session: StripeAccountSessionResponse = self
            .execute(self.client.post(url).form(&form_params))
            .await?;

        Ok(AccountSession {
            account_id: session.account.unwrap_or_else(|| request.account_id.clone()),
            client_secret: session.client_secret,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }
}

/// Turn a non-2xx Stripe response into a provider error, keeping the
/// message, type and code Stripe reported
fn provider_error(http_status: u16, body: &str) -> PaymentError {
    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(parsed) => PaymentError::Provider {
            message: parsed
                .error
                .message
                .unwrap_or_else(|| format!("HTTP {}", http_status)),
            kind: parsed.error.kind,
            code: parsed.error.code,
            http_status,
        },
        Err(_) => PaymentError::Provider {
            message: format!("HTTP {}: {}", http_status, body),
            kind: None,
            code: None,
            http_status,
        },
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    customer_details: Option<StripeCustomerDetails>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeAccountSessionResponse {
    #[serde(default)]
    account: Option<String>,
    client_secret: String,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}
