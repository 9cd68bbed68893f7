//! Page initialization plan: what a freshly loaded page wires up

use crate::config::ClientConfig;
use std::time::Duration;

/// Optional controls found on the current page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageControls {
    pub logout: bool,
    pub theme_toggle: bool,
}

/// Behaviour to attach once the document is ready
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagePlan {
    pub wire_logout: bool,
    pub wire_theme_toggle: bool,
    /// Refresh the token once, right away
    pub refresh_now: bool,
    /// Keep refreshing for the lifetime of the page
    pub refresh_every: Option<Duration>,
}

impl PagePlan {
    pub fn new(controls: PageControls, has_token: bool, config: &ClientConfig) -> Self {
        let keep_fresh = has_token && config.profile.refreshes_periodically();
        Self {
            wire_logout: controls.logout,
            wire_theme_toggle: controls.theme_toggle,
            refresh_now: keep_fresh,
            refresh_every: keep_fresh.then(|| config.refresh_interval()),
        }
    }
}
