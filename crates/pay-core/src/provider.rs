//! # Payment Provider Trait
//!
//! Seam between the HTTP layer and the external payments platform.
//! Implementations: Stripe (`pay-stripe`), plus in-process fakes in tests.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentProvider (trait)                   │
//! │  ├── create_embedded_checkout()                             │
//! │  ├── retrieve_checkout_session()                            │
//! │  ├── create_account_session()                               │
//! │  └── capabilities()                                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::error::PaymentResult;
use crate::session::{
    AccountSession, AccountSessionRequest, EmbeddedCheckout, EmbeddedCheckoutRequest,
    SessionStatus,
};
use async_trait::async_trait;
use std::sync::Arc;

/// APIs a provider client can serve, resolved once when the client is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Connected-account sessions for embedded Connect components
    pub account_sessions: bool,
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self {
            account_sessions: true,
        }
    }
}

/// Remote payments platform.
///
/// Every method is a single network round trip; implementations must not
/// retry or cache.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a checkout session rendered by the embedded widget.
    async fn create_embedded_checkout(
        &self,
        request: &EmbeddedCheckoutRequest,
    ) -> PaymentResult<EmbeddedCheckout>;

    /// Read back status and buyer email of an existing checkout session.
    ///
    /// The id is forwarded without validation.
    async fn retrieve_checkout_session(&self, session_id: &str) -> PaymentResult<SessionStatus>;

    /// Create a session scoped to a connected account.
    async fn create_account_session(
        &self,
        request: &AccountSessionRequest,
    ) -> PaymentResult<AccountSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;

    /// APIs available with this client's configuration.
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }
}

/// Type alias for a shared provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
