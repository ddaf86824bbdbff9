//! # Dashboard Navigation
//!
//! Two-tab navigation of the Connect dashboard page. The checkout widget is
//! created the first time its tab is selected and stays mounted (hidden)
//! when the user switches back.

/// Tabs of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    NotificationBanner,
    Checkout,
}

impl DashboardView {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "notification-banner" => Some(DashboardView::NotificationBanner),
            "checkout" => Some(DashboardView::Checkout),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardView::NotificationBanner => "notification-banner",
            DashboardView::Checkout => "checkout",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardNav {
    active: DashboardView,
    checkout_mounted: bool,
}

impl DashboardNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> DashboardView {
        self.active
    }

    pub fn checkout_mounted(&self) -> bool {
        self.checkout_mounted
    }

    /// Switch tabs. Returns `true` exactly once: when the checkout widget
    /// has to be created now.
    pub fn select(&mut self, view: DashboardView) -> bool {
        self.active = view;
        if view == DashboardView::Checkout && !self.checkout_mounted {
            self.checkout_mounted = true;
            return true;
        }
        false
    }
}
