//! Auth guard: decides whether the current page may be shown

use crate::config::{AuthConfig, ClientProfile};
use crate::navigation::Navigator;
use crate::session::SessionContext;
use tracing::debug;

/// Outcome of an auth check for one page load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthDecision {
    /// Stay on the current page
    Proceed,
    /// No token on a protected page; go to the login view
    RedirectToLogin,
    /// No token on a protected page, but the server performs the redirect
    DeferToServer,
    /// Already signed in and looking at the login view
    RedirectToChats,
}

impl AuthDecision {
    /// Whether the current page may be shown
    pub fn allows(&self) -> bool {
        matches!(self, Self::Proceed)
    }

    /// Where the client navigates for this decision, if anywhere
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin => Some(AuthConfig::LOGIN_PATH),
            Self::RedirectToChats => Some(AuthConfig::CHATS_PATH),
            Self::Proceed | Self::DeferToServer => None,
        }
    }
}

pub fn is_public_path(path: &str) -> bool {
    AuthConfig::PUBLIC_PATHS.contains(&path)
}

/// Pure form of the guard
pub fn decide(has_token: bool, path: &str, profile: ClientProfile) -> AuthDecision {
    if !has_token && !is_public_path(path) {
        return if profile.defers_login_redirect() {
            AuthDecision::DeferToServer
        } else {
            AuthDecision::RedirectToLogin
        };
    }

    if has_token && path == AuthConfig::LOGIN_PATH {
        return AuthDecision::RedirectToChats;
    }

    AuthDecision::Proceed
}

/// Run the guard against the current location, navigating at most once.
///
/// Returns `true` when the page may stay.
pub fn check_auth(session: &SessionContext, navigator: &dyn Navigator) -> bool {
    let path = navigator.current_path();
    let decision = decide(session.has_token(), &path, session.profile());
    debug!(%path, ?decision, "auth check");

    if let Some(target) = decision.redirect_target() {
        navigator.navigate(target);
    }

    decision.allows()
}
