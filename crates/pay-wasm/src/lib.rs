//! # pay-wasm
//!
//! WebAssembly bindings for the embedded-checkout pages.
//!
//! This crate provides browser-side logic for:
//! - The return page: one status read, then redirect / confirm / nothing
//! - Notification banner wording
//! - Dashboard tab navigation with lazy checkout mounting
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { run_return_page, banner_message } from '/pkg/pay_wasm.js';
//!
//! await init();
//!
//! await run_return_page('success-message', '/checkout', 'orders@example.com');
//! banner.setOnNotificationsChange((r) => show(banner_message('checkout', r)));
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use pay_core::notifications::{BANNER_INIT_FAILED, BANNER_REQUIRES_ACCOUNT};
use pay_core::return_flow::SESSION_STATUS_PATH;
use pay_core::{
    BannerNotice, DashboardNav, DashboardView, MessageStyle, NotificationSummary, ReturnFlow,
    SessionStatus, Storefront,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Read `session_id` from the current URL, query its status once, and act
/// on it: redirect for open sessions, fill `message_element_id` (and reveal
/// its parent) for completed ones, leave the page blank otherwise.
#[wasm_bindgen]
pub async fn run_return_page(
    message_element_id: String,
    checkout_path: String,
    support_email: String,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let search = window.location().search()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search)?;
    let session_id = params.get("session_id");

    let storefront = Storefront {
        checkout_path,
        support_email,
        ..Storefront::default()
    };
    let mut flow = ReturnFlow::new(session_id.as_deref(), storefront);

    let Some(session_id) = flow.begin() else {
        return Ok(());
    };

    let url = format!(
        "{}?session_id={}",
        SESSION_STATUS_PATH,
        String::from(js_sys::encode_uri_component(&session_id))
    );
    let status = fetch_status(&window, &url).await;
    if status.is_none() {
        log("Session status request failed");
    }

    let Some(view) = flow.resolve(status).cloned() else {
        return Ok(());
    };

    if let Some(target) = view.redirect_target() {
        window.location().set_href(target)?;
        return Ok(());
    }

    if let Some(message) = flow.message() {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        if let Some(element) = document.get_element_by_id(&message_element_id) {
            element.set_text_content(Some(&message));
            if let Some(parent) = element.parent_element() {
                parent.remove_attribute("hidden")?;
            }
        }
    }

    Ok(())
}

/// One GET against the status endpoint; `None` on any failure
async fn fetch_status(window: &web_sys::Window, url: &str) -> Option<SessionStatus> {
    let response = JsFuture::from(window.fetch_with_str(url)).await.ok()?;
    let response: web_sys::Response = response.dyn_into().ok()?;
    let body = JsFuture::from(response.json().ok()?).await.ok()?;
    serde_wasm_bindgen::from_value(body).ok()
}

/// Status line for a banner change notification.
///
/// `style` is `"checkout"` or `"dashboard"`; `summary` is the
/// `{ actionRequired, total }` object the banner emits.
#[wasm_bindgen]
pub fn banner_message(style: &str, summary: JsValue) -> Result<String, JsValue> {
    let summary: NotificationSummary = serde_wasm_bindgen::from_value(summary)
        .map_err(|e| JsValue::from_str(&format!("Invalid notification summary: {}", e)))?;
    Ok(BannerNotice::from(summary).message(MessageStyle::parse(style)))
}

/// Static note shown instead of the banner. `had_error_field` is true when
/// the account session endpoint answered with an `error`.
#[wasm_bindgen]
pub fn degraded_banner_message(had_error_field: bool) -> String {
    if had_error_field {
        BANNER_REQUIRES_ACCOUNT.to_string()
    } else {
        BANNER_INIT_FAILED.to_string()
    }
}

/// Dashboard tab state exposed to the page
#[wasm_bindgen]
#[derive(Default)]
pub struct DashboardNavigator {
    nav: DashboardNav,
}

#[wasm_bindgen]
impl DashboardNavigator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tabs; returns true when the checkout widget must be mounted now.
    /// Unknown view names leave the state unchanged.
    pub fn select(&mut self, view: &str) -> bool {
        match DashboardView::parse(view) {
            Some(view) => {
                log(&format!("Switching to view: {}", view.as_str()));
                self.nav.select(view)
            }
            None => false,
        }
    }

    pub fn active(&self) -> String {
        self.nav.active().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn checkout_mounted(&self) -> bool {
        self.nav.checkout_mounted()
    }
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
