//! # pay-core
//!
//! Core types and traits for the embedded-checkout service.
//!
//! This crate provides:
//! - `PaymentProvider` trait implemented by the Stripe client
//! - Session types (`SessionStatus`, `EmbeddedCheckout`, `AccountSession`)
//! - `Storefront` routes and contact details
//! - Browser-side logic shared with `pay-wasm`: the return flow, banner
//!   notification mapping and dashboard navigation
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{EmbeddedCheckoutRequest, PaymentProvider, Storefront};
//!
//! let storefront = Storefront::default();
//! let request = EmbeddedCheckoutRequest::single_item(
//!     Some("price_123".into()),
//!     storefront.return_url("https://shop.test"),
//! );
//!
//! let checkout = provider.create_embedded_checkout(&request).await?;
//! // Hand checkout.client_secret to the embedded widget
//! ```

pub mod dashboard;
pub mod error;
pub mod notifications;
pub mod provider;
pub mod return_flow;
pub mod session;
pub mod storefront;

// Re-exports for convenience
pub use dashboard::{DashboardNav, DashboardView};
pub use error::{PaymentError, PaymentResult};
pub use notifications::{BannerNotice, BannerState, MessageStyle, NotificationSummary};
pub use provider::{BoxedPaymentProvider, PaymentProvider, ProviderCapabilities};
pub use return_flow::{BlankReason, ReturnFlow, ReturnState, ReturnView};
pub use session::{
    AccountSession, AccountSessionRequest, CheckoutSessionStatus, EmbeddedCheckout,
    EmbeddedCheckoutRequest, NotificationBannerComponent, SessionStatus,
};
pub use storefront::Storefront;
