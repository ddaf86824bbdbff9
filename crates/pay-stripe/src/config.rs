//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! All secrets and ids are loaded from environment variables.

use pay_core::{PaymentError, ProviderCapabilities};
use std::env;

/// Default API version sent in the `Stripe-Version` header
pub const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Oldest API version that serves `/v1/account_sessions`
pub const ACCOUNT_SESSIONS_MIN_API_VERSION: &str = "2023-10-16";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Publishable key (pk_test_... or pk_live_...), handed to the browser pages
    pub publishable_key: String,

    /// Price sold by the embedded checkout (price_...)
    pub price_id: Option<String>,

    /// Connected account for the notification banner (acct_...)
    pub connected_account_id: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    /// - `STRIPE_PUBLISHABLE_KEY`
    ///
    /// Optional: `STRIPE_PRICE_ID`, `STRIPE_CONNECTED_ACCOUNT_ID`,
    /// `STRIPE_API_VERSION`, `STRIPE_API_BASE_URL`.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same rules as [`StripeConfig::from_env`], reading from `var`
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, PaymentError> {
        let non_empty_var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let secret_key = var("STRIPE_SECRET_KEY").ok_or_else(|| {
            PaymentError::Configuration("STRIPE_SECRET_KEY not set".to_string())
        })?;

        let publishable_key = var("STRIPE_PUBLISHABLE_KEY").ok_or_else(|| {
            PaymentError::Configuration("STRIPE_PUBLISHABLE_KEY not set".to_string())
        })?;

        // Validate key formats
        if !secret_key.starts_with("sk_test_") && !secret_key.starts_with("sk_live_") {
            return Err(PaymentError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        if !publishable_key.starts_with("pk_test_") && !publishable_key.starts_with("pk_live_") {
            return Err(PaymentError::Configuration(
                "STRIPE_PUBLISHABLE_KEY must start with pk_test_ or pk_live_".to_string(),
            ));
        }

        let mut config = Self::new(secret_key, publishable_key);
        config.price_id = non_empty_var("STRIPE_PRICE_ID");
        config.connected_account_id = non_empty_var("STRIPE_CONNECTED_ACCOUNT_ID");

        if let Some(version) = non_empty_var("STRIPE_API_VERSION") {
            config.api_version = version;
        }
        if let Some(base) = non_empty_var("STRIPE_API_BASE_URL") {
            config.api_base_url = base;
        }

        Ok(config)
    }

    /// Create config with explicit keys (for testing)
    pub fn new(secret_key: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            publishable_key: publishable_key.into(),
            price_id: None,
            connected_account_id: None,
            api_base_url: "https://api.stripe.com".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// APIs reachable with the configured API version.
    ///
    /// Versions are `YYYY-MM-DD[.name]`, so the date prefix compares
    /// lexicographically.
    pub fn capabilities(&self) -> ProviderCapabilities {
        let date = self.api_version.split('.').next().unwrap_or_default();
        ProviderCapabilities {
            account_sessions: date >= ACCOUNT_SESSIONS_MIN_API_VERSION,
        }
    }

    /// Connected account id shortened for log output
    pub fn masked_account_id(&self) -> String {
        match &self.connected_account_id {
            Some(id) => mask_id(id),
            None => "NOT SET".to_string(),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set the price sold by checkout
    pub fn with_price_id(mut self, price_id: impl Into<String>) -> Self {
        self.price_id = Some(price_id.into());
        self
    }

    /// Builder: set the connected account
    pub fn with_connected_account(mut self, account_id: impl Into<String>) -> Self {
        self.connected_account_id = Some(account_id.into());
        self
    }

    /// Builder: pin the API version
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}

/// First 10 characters followed by an ellipsis
pub fn mask_id(id: &str) -> String {
    let prefix: String = id.chars().take(10).collect();
    format!("{}...", prefix)
}
