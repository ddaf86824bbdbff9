//! # Embedded Checkout RS
//!
//! Checkout and Connect banner demo backed by Stripe.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_PUBLISHABLE_KEY=pk_test_...
//! export STRIPE_PRICE_ID=price_...
//! export STRIPE_CONNECTED_ACCOUNT_ID=acct_...
//!
//! # Build the browser bundle, then run the server
//! wasm-pack build crates/pay-wasm --target web
//! embedded-checkout
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.provider.provider_name());
    info!(
        "Account sessions available: {}",
        state.capabilities.account_sessions
    );

    let checkout_path = state.storefront.checkout_path.clone();

    // Create router
    let app = routes::create_router(state);

    info!("Embedded checkout starting on http://{}", addr);

    if !is_prod {
        info!("Checkout page: http://{}{}", addr, checkout_path);
        info!("Banner page: http://{}/checkout-with-banner", addr);
        info!("Dashboard: http://{}/connect-dashboard", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
