//! Session context: the token and theme preference held in browser storage

use crate::config::{AuthConfig, ClientProfile};
use crate::theme::Theme;
use std::fmt;
use std::rc::Rc;

/// Persistent key-value storage plus the document cookie string.
///
/// Implementations live on the browser main thread, so the trait carries no
/// `Send`/`Sync` bounds and storage failures are swallowed by the
/// implementation.
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str);

    fn remove_item(&self, key: &str);

    /// Raw `document.cookie` value, if the environment has one
    fn cookie_string(&self) -> Option<String> {
        None
    }
}

/// Extract a cookie value from a `document.cookie` string.
///
/// A cookie that appears more than once is treated as absent, as is an empty
/// value.
pub fn cookie_value(cookie: &str, name: &str) -> Option<String> {
    let mut matches = cookie
        .split(';')
        .map(str::trim_start)
        .filter_map(|pair| pair.strip_prefix(name)?.strip_prefix('='));

    let value = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Shared handle over the session storage, bound to a client profile.
///
/// Clones share the same store; writes are last-writer-wins.
#[derive(Clone)]
pub struct SessionContext {
    store: Rc<dyn SessionStore>,
    profile: ClientProfile,
}

impl SessionContext {
    pub fn new(store: Rc<dyn SessionStore>, profile: ClientProfile) -> Self {
        Self { store, profile }
    }

    pub fn profile(&self) -> ClientProfile {
        self.profile
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        if self.profile.reads_cookie() {
            let from_cookie = self
                .store
                .cookie_string()
                .and_then(|cookie| cookie_value(&cookie, AuthConfig::TOKEN_COOKIE));
            if from_cookie.is_some() {
                return from_cookie;
            }
        }

        self.store
            .get_item(AuthConfig::TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: &str) {
        self.store.set_item(AuthConfig::TOKEN_KEY, token);
    }

    /// Remove the locally stored token. The cookie is server-owned.
    pub fn clear_token(&self) {
        self.store.remove_item(AuthConfig::TOKEN_KEY);
    }

    /// Persisted theme preference, if one was ever stored
    pub fn theme(&self) -> Option<Theme> {
        self.store
            .get_item(AuthConfig::THEME_KEY)
            .map(|value| Theme::from_attribute(&value))
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.set_item(AuthConfig::THEME_KEY, theme.as_str());
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("profile", &self.profile)
            .field("has_token", &self.has_token())
            .finish()
    }
}
