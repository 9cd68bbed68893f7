//! The document's theme attribute and icon

use courier_core::ThemeSurface;
use tracing::warn;
use web_sys::Element;

/// Attribute on `<html>` read by the stylesheet
pub const THEME_ATTRIBUTE: &str = "data-bs-theme";

/// Element whose class list shows the sun or moon icon
pub const THEME_ICON_ID: &str = "theme-icon";

/// Theme state held by the live document
pub struct DocumentTheme {
    root: Option<Element>,
}

impl DocumentTheme {
    pub fn new() -> Self {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element());
        Self { root }
    }
}

impl Default for DocumentTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeSurface for DocumentTheme {
    fn theme_attribute(&self) -> Option<String> {
        self.root.as_ref()?.get_attribute(THEME_ATTRIBUTE)
    }

    fn set_theme_attribute(&self, value: &str) {
        if let Some(root) = &self.root
            && let Err(e) = root.set_attribute(THEME_ATTRIBUTE, value)
        {
            warn!(value, error = ?e, "failed to set theme attribute");
        }
    }

    fn replace_icon_class(&self, from: &str, to: &str) -> bool {
        let Some(icon) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(THEME_ICON_ID))
        else {
            return false;
        };
        if let Err(e) = icon.class_list().replace(from, to) {
            warn!(from, to, error = ?e, "failed to swap theme icon");
        }
        true
    }
}
