//! # Storefront Settings
//!
//! Routes and contact details shared by the server and the browser pages.
//! Loaded from `config/storefront.toml` when present.

use crate::error::{PaymentError, PaymentResult};
use crate::session::CHECKOUT_SESSION_ID_PLACEHOLDER;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storefront {
    /// Shown on the confirmation message
    pub support_email: String,

    /// Checkout entry route; the return page redirects here for open sessions
    pub checkout_path: String,

    /// Route the embedded widget returns to after completion
    pub return_path: String,
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            support_email: "orders@example.com".to_string(),
            checkout_path: "/checkout".to_string(),
            return_path: "/return".to_string(),
        }
    }
}

impl Storefront {
    /// Parse settings from TOML; missing keys keep their defaults
    pub fn from_toml(content: &str) -> PaymentResult<Self> {
        let storefront: Self =
            toml::from_str(content).map_err(|e| PaymentError::Configuration(e.to_string()))?;
        storefront.validate()?;
        Ok(storefront)
    }

    /// Both page routes must be distinct absolute paths without
    /// query, fragment or capture syntax.
    pub fn validate(&self) -> PaymentResult<()> {
        for (key, path) in [
            ("checkout_path", &self.checkout_path),
            ("return_path", &self.return_path),
        ] {
            let valid = path.len() > 1
                && path.starts_with('/')
                && !path.contains(|c: char| {
                    matches!(c, '?' | '#' | '{' | '}' | '*' | ':') || c.is_whitespace()
                });
            if !valid {
                return Err(PaymentError::Configuration(format!(
                    "{} must be an absolute path like /checkout, got {:?}",
                    key, path
                )));
            }
        }

        if self.checkout_path == self.return_path {
            return Err(PaymentError::Configuration(format!(
                "checkout_path and return_path are both {}",
                self.checkout_path
            )));
        }

        Ok(())
    }

    /// Return target for a new checkout session, e.g.
    /// `https://shop.test/return?session_id={CHECKOUT_SESSION_ID}`.
    ///
    /// The placeholder is resolved by the widget runtime, not by us.
    pub fn return_url(&self, origin: &str) -> String {
        format!(
            "{}{}?session_id={}",
            origin.trim_end_matches('/'),
            self.return_path,
            CHECKOUT_SESSION_ID_PLACEHOLDER
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_url() {
        let storefront = Storefront::default();
        assert_eq!(
            storefront.return_url("https://shop.test"),
            "https://shop.test/return?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(
            storefront.return_url("http://localhost:8080/"),
            "http://localhost:8080/return?session_id={CHECKOUT_SESSION_ID}"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let storefront = Storefront::from_toml(r#"support_email = "help@shop.test""#).unwrap();
        assert_eq!(storefront.support_email, "help@shop.test");
        assert_eq!(storefront.checkout_path, "/checkout");
        assert_eq!(storefront.return_path, "/return");
    }

    #[test]
    fn test_route_paths_are_validated() {
        for content in [
            r#"checkout_path = "checkout""#,
            r#"return_path = "/""#,
            r#"return_path = """#,
            r#"checkout_path = "/pay/{id}""#,
            r#"return_path = "/done?x=1""#,
            r#"return_path = "/checkout""#,
        ] {
            assert!(
                matches!(
                    Storefront::from_toml(content),
                    Err(PaymentError::Configuration(_))
                ),
                "{}",
                content
            );
        }

        let storefront = Storefront::from_toml(
            r#"
checkout_path = "/shop/pay"
return_path = "/shop/done"
"#,
        )
        .unwrap();
        assert_eq!(storefront.checkout_path, "/shop/pay");
        assert!(Storefront::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Storefront::from_toml("support_email = ["),
            Err(PaymentError::Configuration(_))
        ));
    }
}
