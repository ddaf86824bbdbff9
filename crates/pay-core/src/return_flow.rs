//! # Return Flow
//!
//! State machine behind the return page: the buyer lands on
//! `/return?session_id=...`, the page reads the session status once and
//! either redirects back to checkout, shows a confirmation, or shows nothing.
//!
//! ```text
//!   Idle ──(no session id)──▶ stays Idle
//!   Pending ──begin()──▶ one status query ──resolve()──▶ Resolved(view)
//!                                                         ├── Redirect      (open)
//!                                                         ├── Confirmation  (complete)
//!                                                         └── Blank         (anything else, or failure)
//! ```
//!
//! There is no request fencing: whatever response is passed to `resolve`
//! first is applied.

use crate::session::{CheckoutSessionStatus, SessionStatus};
use crate::storefront::Storefront;

/// Path of the status endpoint the browser queries
pub const SESSION_STATUS_PATH: &str = "/api/session-status";

/// Why the page renders nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlankReason {
    /// Neither open nor complete (e.g. expired)
    UnknownStatus(CheckoutSessionStatus),
    /// The status request failed or returned an unreadable body
    RequestFailed,
}

/// What the return page shows once the status is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnView {
    /// Session still open: navigate once to the checkout entry route
    Redirect { to: String },
    /// Session complete: thank the buyer
    Confirmation { customer_email: String },
    /// Render nothing
    Blank { reason: BlankReason },
}

impl ReturnView {
    /// Map a status read to a view
    pub fn from_status(status: SessionStatus, storefront: &Storefront) -> Self {
        match status.status {
            CheckoutSessionStatus::Open => ReturnView::Redirect {
                to: storefront.checkout_path.clone(),
            },
            CheckoutSessionStatus::Complete => ReturnView::Confirmation {
                customer_email: status.customer_email.unwrap_or_default(),
            },
            other => ReturnView::Blank {
                reason: BlankReason::UnknownStatus(other),
            },
        }
    }

    /// Confirmation text, or `None` when nothing is rendered
    pub fn message(&self, storefront: &Storefront) -> Option<String> {
        match self {
            ReturnView::Confirmation { customer_email } => Some(confirmation_message(
                customer_email,
                &storefront.support_email,
            )),
            _ => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            ReturnView::Redirect { to } => Some(to),
            _ => None,
        }
    }
}

/// Text shown after a completed checkout
pub fn confirmation_message(customer_email: &str, support_email: &str) -> String {
    format!(
        "We appreciate your business! A confirmation email will be sent to {}. \
         If you have any questions, please email {}.",
        customer_email, support_email
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnState {
    /// No session id in the URL; nothing happens
    Idle,
    /// Waiting for the single status read
    Pending { session_id: String },
    Resolved(ReturnView),
}

/// Drives one return-page visit
#[derive(Debug, Clone)]
pub struct ReturnFlow {
    state: ReturnState,
    query_issued: bool,
    storefront: Storefront,
}

impl ReturnFlow {
    /// Start a flow from the `session_id` query parameter
    pub fn new(session_id: Option<&str>, storefront: Storefront) -> Self {
        let state = match session_id {
            Some(id) if !id.is_empty() => ReturnState::Pending {
                session_id: id.to_string(),
            },
            _ => ReturnState::Idle,
        };

        Self {
            state,
            query_issued: false,
            storefront,
        }
    }

    pub fn state(&self) -> &ReturnState {
        &self.state
    }

    /// Session id to query, handed out at most once per flow
    pub fn begin(&mut self) -> Option<String> {
        match &self.state {
            ReturnState::Pending { session_id } if !self.query_issued => {
                self.query_issued = true;
                Some(session_id.clone())
            }
            _ => None,
        }
    }

    /// Apply the status read; `None` means the request failed.
    ///
    /// Only a pending flow transitions. Returns the resolved view, if any.
    pub fn resolve(&mut self, response: Option<SessionStatus>) -> Option<&ReturnView> {
        if matches!(self.state, ReturnState::Pending { .. }) {
            let view = match response {
                Some(status) => ReturnView::from_status(status, &self.storefront),
                None => ReturnView::Blank {
                    reason: BlankReason::RequestFailed,
                },
            };
            self.state = ReturnState::Resolved(view);
        }
        self.view()
    }

    pub fn view(&self) -> Option<&ReturnView> {
        match &self.state {
            ReturnState::Resolved(view) => Some(view),
            _ => None,
        }
    }

    /// Rendered text for the current state
    pub fn message(&self) -> Option<String> {
        self.view().and_then(|v| v.message(&self.storefront))
    }
}
