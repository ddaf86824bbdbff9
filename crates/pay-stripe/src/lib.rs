//! # pay-stripe
//!
//! Stripe provider for embedded-checkout-rs.
//!
//! `StripeClient` implements `pay_core::PaymentProvider` on top of:
//!
//! 1. **Checkout Sessions** (`ui_mode=embedded`)
//!    - Single configured price, quantity 1
//!    - Returns the client secret consumed by the embedded checkout widget
//!    - Status lookups for the return page
//!
//! 2. **Account Sessions**
//!    - Scoped to a connected account
//!    - Enables the Connect notification banner component
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeClient;
//! use pay_core::{EmbeddedCheckoutRequest, PaymentProvider};
//!
//! // Create client from environment
//! let client = StripeClient::from_env()?;
//!
//! let request = EmbeddedCheckoutRequest::single_item(
//!     client.config().price_id.clone(),
//!     "https://example.com/return?session_id={CHECKOUT_SESSION_ID}",
//! );
//! let checkout = client.create_embedded_checkout(&request).await?;
//!
//! // Hand checkout.client_secret to the browser
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::StripeClient;
pub use config::{mask_id, StripeConfig, ACCOUNT_SESSIONS_MIN_API_VERSION, DEFAULT_API_VERSION};
