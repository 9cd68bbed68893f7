//! Theme preference and the toggle behaviour

use crate::session::SessionContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than `dark` reads as light
    pub fn from_attribute(value: &str) -> Self {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon class shown while this theme is active
    pub fn icon_class(&self) -> &'static str {
        match self {
            Theme::Light => "bi-sun",
            Theme::Dark => "bi-moon",
        }
    }
}

/// Document-level theme state: the theme attribute and the optional icon
pub trait ThemeSurface {
    fn theme_attribute(&self) -> Option<String>;

    fn set_theme_attribute(&self, value: &str);

    /// Swap `from` for `to` on the theme icon. Returns `false` when the page
    /// has no icon.
    fn replace_icon_class(&self, from: &str, to: &str) -> bool;
}

/// Flip the theme, persist it and update the icon
pub fn toggle_theme(surface: &dyn ThemeSurface, session: &SessionContext) -> Theme {
    let current = surface
        .theme_attribute()
        .map(|value| Theme::from_attribute(&value))
        .unwrap_or_default();
    let next = current.toggle();

    surface.set_theme_attribute(next.as_str());
    session.set_theme(next);

    if !surface.replace_icon_class(current.icon_class(), next.icon_class()) {
        debug!("no theme icon on this page");
    }

    debug!(theme = next.as_str(), "theme toggled");
    next
}

/// Apply a persisted preference to the document, if one exists.
///
/// Without a stored preference the server-rendered attribute is left alone.
pub fn restore_theme(surface: &dyn ThemeSurface, session: &SessionContext) -> Option<Theme> {
    let stored = session.theme()?;
    let shown = surface
        .theme_attribute()
        .map(|value| Theme::from_attribute(&value))
        .unwrap_or_default();

    if shown != stored {
        surface.set_theme_attribute(stored.as_str());
        surface.replace_icon_class(shown.icon_class(), stored.icon_class());
    }
    Some(stored)
}
