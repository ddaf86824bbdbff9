//! # Widget Host Pages
//!
//! Minimal HTML shells that boot Stripe's embedded widgets. Browser-side
//! decisions (return flow, banner wording, tab state) run in the `pay-wasm`
//! bundle served under `/pkg`.
//!
//! Placeholders are substituted per request:
//! `{{publishable_key}}`, `{{checkout_path}}` and `{{support_email}}` become
//! JSON string literals; `{{banner_script}}` becomes [`BANNER_SCRIPT`].

use crate::state::AppState;

/// Fetches the account session once and mounts the Connect notification
/// banner. Never retries; on failure the page shows a static note.
pub const BANNER_SCRIPT: &str = r##"
function connectReady() {
  return new Promise((resolve) => {
    if (window.StripeConnect && window.StripeConnect.init) {
      resolve(window.StripeConnect);
      return;
    }
    window.StripeConnect = window.StripeConnect || {};
    window.StripeConnect.onLoad = () => resolve(window.StripeConnect);
  });
}

async function initBanner(container, style, onMessage) {
  let data;
  try {
    const res = await fetch("/api/create-account-session", { method: "POST" });
    data = await res.json();
  } catch (err) {
    console.error("Failed to initialize Connect:", err);
    onMessage(degraded_banner_message(false), true);
    return;
  }
  if (data.error) {
    console.error("Error creating account session:", data.error);
    onMessage(degraded_banner_message(true), true);
    return;
  }
  const StripeConnect = await connectReady();
  const instance = StripeConnect.init({
    publishableKey: {{publishable_key}},
    fetchClientSecret: async () => data.clientSecret,
  });
  const banner = instance.create("notification-banner");
  banner.setCollectionOptions({ fields: "currently_due", futureRequirements: "omit" });
  banner.setOnNotificationsChange((response) => onMessage(banner_message(style, response), false));
  container.replaceChildren(banner);
}

async function fetchClientSecret() {
  const res = await fetch("/api/create-checkout-session", { method: "POST" });
  const data = await res.json();
  return data.clientSecret;
}
"##;

pub const CHECKOUT_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>Checkout</title>
  <script src="https://js.stripe.com/v3/"></script>
</head>
<body>
  <div id="checkout"></div>
  <script>
    const stripe = Stripe({{publishable_key}});
    async function fetchClientSecret() {
      const res = await fetch("/api/create-checkout-session", { method: "POST" });
      const data = await res.json();
      return data.clientSecret;
    }
    stripe.initEmbeddedCheckout({ fetchClientSecret }).then((checkout) => checkout.mount("#checkout"));
  </script>
</body>
</html>
"##;

pub const RETURN_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>Order Status</title></head>
<body>
  <section id="success" hidden>
    <p id="success-message"></p>
  </section>
  <script type="module">
    import init, { run_return_page } from "/pkg/pay_wasm.js";
    await init();
    await run_return_page("success-message", {{checkout_path}}, {{support_email}});
  </script>
</body>
</html>
"##;

pub const CHECKOUT_WITH_BANNER_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>Checkout with Notification Banner</title>
  <script src="https://js.stripe.com/v3/"></script>
  <script src="https://connect-js.stripe.com/v1.0/connect.js" async></script>
</head>
<body>
  <h1>Checkout with Notification Banner</h1>
  <div class="notification-section">
    <div class="section-title">Connected Account Notifications</div>
    <div id="banner-message" class="message" hidden></div>
    <div id="banner"><div class="message">Loading notification banner...</div></div>
  </div>
  <div class="checkout-section">
    <div class="section-title">Payment Checkout</div>
    <div id="checkout"></div>
  </div>
  <script type="module">
    import init, { banner_message, degraded_banner_message } from "/pkg/pay_wasm.js";
    await init();
    {{banner_script}}
    const messageEl = document.getElementById("banner-message");
    const bannerEl = document.getElementById("banner");
    initBanner(bannerEl, "checkout", (message, degraded) => {
      if (degraded) {
        bannerEl.textContent = message;
        return;
      }
      messageEl.textContent = message;
      messageEl.hidden = message.length === 0;
    });

    const stripe = Stripe({{publishable_key}});
    stripe.initEmbeddedCheckout({ fetchClientSecret }).then((checkout) => checkout.mount("#checkout"));
  </script>
</body>
</html>
"##;

pub const CONNECT_DASHBOARD_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>Connect Hub</title>
  <script src="https://js.stripe.com/v3/"></script>
  <script src="https://connect-js.stripe.com/v1.0/connect.js" async></script>
</head>
<body>
  <div class="dashboard-container">
    <div class="sidebar">
      <h1 class="sidebar-title">Connect Hub</h1>
      <p class="sidebar-subtitle">Stripe Components</p>
      <ul class="nav-menu">
        <li class="nav-item active" data-view="notification-banner">Notification Banner</li>
        <li class="nav-item" data-view="checkout">Checkout</li>
      </ul>
    </div>
    <div class="main-content">
      <section id="view-notification-banner">
        <h2 class="content-title">Notification Banner</h2>
        <p class="content-description">View and manage notifications for your connected account</p>
        <div id="banner-message" class="status-message" hidden></div>
        <div id="banner" class="banner-container">
          <div class="loading-message">Initializing notification banner...</div>
        </div>
      </section>
      <section id="view-checkout" hidden>
        <h2 class="content-title">Checkout</h2>
        <p class="content-description">Complete your payment securely</p>
        <div class="checkout-container">
          <div id="checkout-loading" class="loading-message">Loading checkout...</div>
          <div id="checkout"></div>
        </div>
      </section>
    </div>
  </div>
  <script type="module">
    import init, { banner_message, degraded_banner_message, DashboardNavigator } from "/pkg/pay_wasm.js";
    await init();
    {{banner_script}}
    const messageEl = document.getElementById("banner-message");
    const bannerEl = document.getElementById("banner");
    initBanner(bannerEl, "dashboard", (message, degraded) => {
      if (degraded) {
        bannerEl.textContent = message;
        return;
      }
      messageEl.textContent = message;
      messageEl.hidden = message.length === 0;
    });

    const stripe = Stripe({{publishable_key}});
    const nav = new DashboardNavigator();
    for (const item of document.querySelectorAll(".nav-item")) {
      item.addEventListener("click", async () => {
        const mountCheckout = nav.select(item.dataset.view);
        const active = nav.active();
        for (const other of document.querySelectorAll(".nav-item")) {
          other.classList.toggle("active", other.dataset.view === active);
        }
        document.getElementById("view-notification-banner").hidden = active !== "notification-banner";
        document.getElementById("view-checkout").hidden = active !== "checkout";
        if (mountCheckout) {
          const checkout = await stripe.initEmbeddedCheckout({ fetchClientSecret });
          document.getElementById("checkout-loading").remove();
          checkout.mount("#checkout");
        }
      });
    }
  </script>
</body>
</html>
"##;

/// Fill a page template from application state
pub fn render(template: &str, state: &AppState) -> String {
    template
        .replace("{{banner_script}}", BANNER_SCRIPT)
        .replace(
            "{{publishable_key}}",
            &js_string(&state.checkout.publishable_key),
        )
        .replace(
            "{{checkout_path}}",
            &js_string(&state.storefront.checkout_path),
        )
        .replace(
            "{{support_email}}",
            &js_string(&state.storefront.support_email),
        )
}

/// Quote a value as a JavaScript string literal
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_quotes_and_escapes() {
        assert_eq!(js_string("pk_test_123"), "\"pk_test_123\"");
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(js_string("</script>"), "\"<\\/script>\"");
    }

    #[test]
    fn test_templates_reference_api_endpoints() {
        assert!(CHECKOUT_PAGE.contains("/api/create-checkout-session"));
        assert!(BANNER_SCRIPT.contains("/api/create-account-session"));
        assert!(RETURN_PAGE.contains("run_return_page"));
        assert!(CONNECT_DASHBOARD_PAGE.contains("DashboardNavigator"));
    }
}
