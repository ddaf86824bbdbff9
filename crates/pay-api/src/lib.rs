//! # pay-api
//!
//! HTTP API layer for embedded-checkout-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - JSON endpoints that proxy checkout and account session calls to Stripe
//! - Host pages for the embedded checkout and notification banner widgets
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/create-checkout-session` | Embedded checkout client secret |
//! | POST | `/api/create-account-session` | Notification banner client secret |
//! | GET | `/api/session-status` | Checkout session status |
//! | GET | `/checkout`, `/return` | Checkout and return pages |
//! | GET | `/checkout-with-banner`, `/connect-dashboard` | Banner pages |

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, CheckoutSettings};
