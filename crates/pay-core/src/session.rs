//! # Session Types
//!
//! Checkout and account session types observed from the payment provider.
//! The provider owns every transition; these types only carry what we read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder the embedded widget runtime substitutes with the real session id
pub const CHECKOUT_SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Lifecycle status of a checkout session
///
/// Serialized as the lowercase string the provider uses. Values we do not
/// know are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckoutSessionStatus {
    /// Buyer has not finished (or navigated back)
    Open,
    /// Payment flow finished
    Complete,
    /// Session timed out on the provider side
    Expired,
    /// Any status this service does not branch on
    Other(String),
}

impl CheckoutSessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CheckoutSessionStatus::Open => "open",
            CheckoutSessionStatus::Complete => "complete",
            CheckoutSessionStatus::Expired => "expired",
            CheckoutSessionStatus::Other(s) => s,
        }
    }
}

impl From<String> for CheckoutSessionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => CheckoutSessionStatus::Open,
            "complete" => CheckoutSessionStatus::Complete,
            "expired" => CheckoutSessionStatus::Expired,
            _ => CheckoutSessionStatus::Other(value),
        }
    }
}

impl From<&str> for CheckoutSessionStatus {
    fn from(value: &str) -> Self {
        CheckoutSessionStatus::from(value.to_string())
    }
}

impl From<CheckoutSessionStatus> for String {
    fn from(value: CheckoutSessionStatus) -> Self {
        match value {
            CheckoutSessionStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CheckoutSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status lookup result, as returned by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub status: CheckoutSessionStatus,
    /// Present once the buyer has entered details; `None` before that
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// A freshly created embedded checkout session
#[derive(Debug, Clone)]
pub struct EmbeddedCheckout {
    /// Provider session ID (cs_...)
    pub session_id: String,
    /// Continuation token handed to the embedded widget
    pub client_secret: String,
}

/// Parameters for an embedded, single-item checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedCheckoutRequest {
    /// Configured price; forwarded as-is, the provider rejects a missing one
    pub price_id: Option<String>,
    pub quantity: u32,
    /// Where the widget sends the buyer after completion
    pub return_url: String,
}

impl EmbeddedCheckoutRequest {
    /// Single quantity of the configured price
    pub fn single_item(price_id: Option<String>, return_url: impl Into<String>) -> Self {
        Self {
            price_id,
            quantity: 1,
            return_url: return_url.into(),
        }
    }
}

/// Notification banner component settings for an account session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationBannerComponent {
    pub enabled: bool,
    pub external_account_collection: bool,
}

impl Default for NotificationBannerComponent {
    fn default() -> Self {
        Self {
            enabled: true,
            external_account_collection: true,
        }
    }
}

/// Parameters for an account session scoped to a connected account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSessionRequest {
    pub account_id: String,
    pub notification_banner: NotificationBannerComponent,
}

impl AccountSessionRequest {
    /// Account session that enables the notification banner
    pub fn notification_banner(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            notification_banner: NotificationBannerComponent::default(),
        }
    }
}

/// A created account session
#[derive(Debug, Clone)]
pub struct AccountSession {
    /// Connected account the session is scoped to
    pub account_id: String,
    pub client_secret: String,
    pub expires_at: Option<DateTime<Utc>>,
}
