//! `window.location` as the navigator

use courier_core::Navigator;
use tracing::{debug, error};

/// Navigates by assigning `window.location.href`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        debug!(path, "navigating");
        if let Some(window) = web_sys::window()
            && let Err(e) = window.location().set_href(path)
        {
            error!(path, error = ?e, "navigation failed");
        }
    }
}
