//! Client configuration and the two deployment profiles

use crate::datetime::DateFormat;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Authentication constants shared by every crate
pub struct AuthConfig;

impl AuthConfig {
    /// Login view
    pub const LOGIN_PATH: &'static str = "/login";

    /// Landing view for an authenticated user
    pub const CHATS_PATH: &'static str = "/chats";

    /// Paths reachable without a token
    pub const PUBLIC_PATHS: [&'static str; 2] = ["/login", "/"];

    /// Local storage key holding the bearer token
    pub const TOKEN_KEY: &'static str = "token";

    /// Cookie holding the bearer token (read-only on the client)
    pub const TOKEN_COOKIE: &'static str = "token";

    /// Local storage key holding the theme preference
    pub const THEME_KEY: &'static str = "theme";

    pub const REFRESH_ENDPOINT: &'static str = "/api/auth/refresh";
    pub const LOGOUT_ENDPOINT: &'static str = "/api/auth/logout";
    pub const LOGIN_ENDPOINT: &'static str = "/api/auth/login";
    pub const ME_ENDPOINT: &'static str = "/api/auth/me";

    /// Token refresh interval in seconds
    pub const TOKEN_REFRESH_INTERVAL_SECS: u64 = 30 * 60;

    /// Refresh attempts a single request may make after a 401
    pub const MAX_REFRESH_RETRIES: u32 = 1;
}

/// Selects between the two deployments of the client.
///
/// With `server_redirect` set the server owns the login redirect and keeps the
/// token in a cookie as well: the guard only reports, requests carry cookies,
/// a 401 triggers one refresh, logout goes through the server and the token is
/// refreshed periodically. Without it the client works from local storage
/// alone and treats every 401 as terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    pub server_redirect: bool,
}

impl ClientProfile {
    pub fn server_redirect() -> Self {
        Self {
            server_redirect: true,
        }
    }

    pub fn local_only() -> Self {
        Self {
            server_redirect: false,
        }
    }

    /// Token lookup consults the `token` cookie before local storage
    pub fn reads_cookie(&self) -> bool {
        self.server_redirect
    }

    /// The guard leaves the redirect to `/login` to the server
    pub fn defers_login_redirect(&self) -> bool {
        self.server_redirect
    }

    pub fn refreshes_on_unauthorized(&self) -> bool {
        self.server_redirect
    }

    /// Requests carry browser-managed cookies
    pub fn includes_credentials(&self) -> bool {
        self.server_redirect
    }

    pub fn logout_calls_server(&self) -> bool {
        self.server_redirect
    }

    pub fn refreshes_periodically(&self) -> bool {
        self.server_redirect
    }
}

/// Runtime configuration of the client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base that relative request URLs resolve against; empty means the page URL
    pub base_url: String,
    pub profile: ClientProfile,
    pub refresh_interval_secs: u64,
    pub date_format: DateFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            profile: ClientProfile::default(),
            refresh_interval_secs: AuthConfig::TOKEN_REFRESH_INTERVAL_SECS,
            date_format: DateFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(source: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(source)
            .map_err(|e| CoreError::invalid_config(format!("malformed client config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.refresh_interval_secs == 0 {
            return Err(CoreError::invalid_config(
                "refresh_interval_secs must be greater than zero",
            ));
        }
        self.date_format.validate()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
