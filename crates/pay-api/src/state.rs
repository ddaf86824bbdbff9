//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the provider client, configuration, and storefront settings.
//! Built once at startup; handlers only read it.

use pay_core::{BoxedPaymentProvider, ProviderCapabilities, Storefront};
use pay_stripe::{StripeClient, StripeConfig, ACCOUNT_SESSIONS_MIN_API_VERSION};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Origin used for return URLs when a request has no `Origin` header
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Directory holding the wasm-pack output served under `/pkg`
    pub wasm_pkg_dir: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or unparsable values fall back to defaults
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            base_url: var("BASE_URL").unwrap_or_else(|| "http://localhost:8080".to_string()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            wasm_pkg_dir: var("WASM_PKG_DIR").unwrap_or_else(|| "crates/pay-wasm/pkg".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Provider-facing settings the handlers need at request time
#[derive(Debug, Clone, Default)]
pub struct CheckoutSettings {
    /// Price sold by the embedded checkout
    pub price_id: Option<String>,
    /// Connected account for the notification banner; `None` when unset
    pub connected_account_id: Option<String>,
    /// Injected into the widget host pages
    pub publishable_key: String,
}

impl From<&StripeConfig> for CheckoutSettings {
    fn from(config: &StripeConfig) -> Self {
        Self {
            price_id: config.price_id.clone(),
            connected_account_id: config.connected_account_id.clone(),
            publishable_key: config.publishable_key.clone(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider client, shared by every handler
    pub provider: BoxedPaymentProvider,
    /// Capabilities resolved when the provider was built
    pub capabilities: ProviderCapabilities,
    /// Price, account and publishable key
    pub checkout: CheckoutSettings,
    /// Routes and contact details
    pub storefront: Arc<Storefront>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the Stripe client
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let storefront = load_storefront()?;

        let stripe_config = StripeConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load Stripe config: {}", e))?;
        let checkout = CheckoutSettings::from(&stripe_config);

        tracing::info!(
            "Stripe configured: test_mode={}, api_version={}, price_id_set={}, connected_account={}",
            stripe_config.is_test_mode(),
            stripe_config.api_version,
            stripe_config.price_id.is_some(),
            stripe_config.masked_account_id()
        );

        let client = StripeClient::new(stripe_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_provider(Arc::new(client), checkout, storefront, config))
    }

    /// Assemble state around an already-built provider
    pub fn with_provider(
        provider: BoxedPaymentProvider,
        checkout: CheckoutSettings,
        storefront: Storefront,
        config: AppConfig,
    ) -> Self {
        let capabilities = provider.capabilities();
        if !capabilities.account_sessions {
            tracing::warn!(
                "{} client cannot create account sessions; set STRIPE_API_VERSION to {} or later",
                provider.provider_name(),
                ACCOUNT_SESSIONS_MIN_API_VERSION
            );
        }

        Self {
            provider,
            capabilities,
            checkout,
            storefront: Arc::new(storefront),
            config,
        }
    }

    /// Origin for the return URL: the request's `Origin`, else `BASE_URL`
    pub fn origin_or_default<'a>(&'a self, origin: Option<&'a str>) -> &'a str {
        origin
            .filter(|o| !o.is_empty())
            .unwrap_or(self.config.base_url.as_str())
    }
}

/// Routes the server mounts itself; storefront pages may not reuse them
const SERVER_ROUTES: &[&str] = &[
    "/",
    "/health",
    "/checkout-with-banner",
    "/connect-dashboard",
];

/// Prefixes nested under the router
const SERVER_PREFIXES: &[&str] = &["/api", "/pkg"];

/// Reject storefront paths that would collide with the server's own routes
pub fn check_storefront_routes(storefront: &Storefront) -> anyhow::Result<()> {
    storefront.validate()?;

    for path in [&storefront.checkout_path, &storefront.return_path] {
        let nested = SERVER_PREFIXES
            .iter()
            .any(|prefix| path.as_str() == *prefix || path.starts_with(&format!("{}/", prefix)));
        if SERVER_ROUTES.contains(&path.as_str()) || nested {
            anyhow::bail!("Storefront path {} is already served by the application", path);
        }
    }

    Ok(())
}

/// Load storefront settings from config file
fn load_storefront() -> anyhow::Result<Storefront> {
    let config_paths = [
        "config/storefront.toml",
        "../config/storefront.toml",
        "../../config/storefront.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let storefront = Storefront::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            check_storefront_routes(&storefront)
                .map_err(|e| anyhow::anyhow!("Invalid routes in {}: {}", path, e))?;
            tracing::info!("Loaded storefront settings from {}", path);
            return Ok(storefront);
        }
    }

    tracing::warn!("No storefront settings found, using defaults");
    Ok(Storefront::default())
}
