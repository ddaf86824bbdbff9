//! # Notification Banner
//!
//! Maps the banner widget's change notifications to the single status line
//! shown above it. Each notification replaces the previous line; nothing
//! accumulates.

use serde::{Deserialize, Serialize};

/// Shown when the account session endpoint answered with an error
pub const BANNER_REQUIRES_ACCOUNT: &str =
    "Note: Notification Banner requires STRIPE_CONNECTED_ACCOUNT_ID env variable";

/// Shown when fetching the account session failed outright
pub const BANNER_INIT_FAILED: &str = "Note: Notification Banner could not be initialized";

/// Payload of the banner's `onNotificationsChange` callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    /// Items the account holder must resolve
    pub action_required: u32,
    /// All items, including those only under review
    pub total: u32,
}

/// Which of the three mutually exclusive notices applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerNotice {
    ActionRequired(u32),
    InReview(u32),
    Clear,
}

impl From<NotificationSummary> for BannerNotice {
    fn from(summary: NotificationSummary) -> Self {
        if summary.action_required > 0 {
            BannerNotice::ActionRequired(summary.action_required)
        } else if summary.total > 0 {
            BannerNotice::InReview(summary.total)
        } else {
            BannerNotice::Clear
        }
    }
}

/// Wording used by each host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStyle {
    /// Banner above the checkout form
    #[default]
    Checkout,
    /// Connect dashboard, with counts
    Dashboard,
}

impl MessageStyle {
    pub fn parse(value: &str) -> Self {
        match value {
            "dashboard" => MessageStyle::Dashboard,
            _ => MessageStyle::Checkout,
        }
    }
}

impl BannerNotice {
    pub fn message(&self, style: MessageStyle) -> String {
        match (style, self) {
            (MessageStyle::Checkout, BannerNotice::ActionRequired(_)) => {
                "You must resolve the notifications below before proceeding.".to_string()
            }
            (MessageStyle::Checkout, BannerNotice::InReview(_)) => {
                "The items below are in review.".to_string()
            }
            (MessageStyle::Checkout, BannerNotice::Clear) => String::new(),
            (MessageStyle::Dashboard, BannerNotice::ActionRequired(n)) => {
                format!("{} notification(s) require your attention.", n)
            }
            (MessageStyle::Dashboard, BannerNotice::InReview(n)) => {
                format!("{} notification(s) in review.", n)
            }
            (MessageStyle::Dashboard, BannerNotice::Clear) => {
                "No notifications at this time.".to_string()
            }
        }
    }
}

/// Lifecycle of the banner on a host page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerState {
    /// Account session requested, widget not yet created
    Loading,
    /// Widget mounted; `message` is the latest status line
    Ready { message: String },
    /// Static fallback, never retried
    Degraded { message: String },
}

impl BannerState {
    /// Apply a change notification; ignored unless the banner is mounted
    pub fn notify(&mut self, summary: NotificationSummary, style: MessageStyle) {
        if let BannerState::Ready { message } = self {
            *message = BannerNotice::from(summary).message(style);
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            BannerState::Loading => None,
            BannerState::Ready { message } | BannerState::Degraded { message } => {
                Some(message.as_str()).filter(|m| !m.is_empty())
            }
        }
    }
}
