//! Page initialization: guard, controls and the refresh timer

use crate::theme::DocumentTheme;
use courier_core::{ClientConfig, PageControls, PagePlan, restore_theme, toggle_theme};
use courier_http::AuthenticatedClient;
use gloo_events::EventListener;
use gloo_timers::callback::Interval;
use std::time::Duration;
use tracing::debug;
use wasm_bindgen_futures::spawn_local;

/// Logout control
pub const LOGOUT_BUTTON_ID: &str = "logout-btn";

/// Theme toggle control
pub const THEME_TOGGLE_ID: &str = "theme-toggle";

/// Listeners and timer attached to the page.
///
/// Dropping it detaches everything; [`PageSession::keep_alive`] ties them to
/// the page lifetime instead.
#[must_use = "dropping a PageSession detaches its listeners"]
pub struct PageSession {
    listeners: Vec<EventListener>,
    refresh: Option<Interval>,
}

impl PageSession {
    pub fn keep_alive(self) {
        for listener in self.listeners {
            listener.forget();
        }
        if let Some(interval) = self.refresh {
            interval.forget();
        }
    }
}

/// Wire the current document to `client`
pub fn init_page(client: &AuthenticatedClient, config: &ClientConfig) -> PageSession {
    let session = client.session().clone();
    restore_theme(&DocumentTheme::new(), &session);
    client.check_auth();

    let document = gloo_utils::document();
    let logout_button = document.get_element_by_id(LOGOUT_BUTTON_ID);
    let theme_toggle = document.get_element_by_id(THEME_TOGGLE_ID);

    let controls = PageControls {
        logout: logout_button.is_some(),
        theme_toggle: theme_toggle.is_some(),
    };
    let plan = PagePlan::new(controls, session.has_token(), config);
    debug!(?plan, "initializing page");

    let mut listeners = Vec::new();

    if plan.wire_logout
        && let Some(button) = logout_button
    {
        let client = client.clone();
        listeners.push(EventListener::new(&button, "click", move |event| {
            event.prevent_default();
            let client = client.clone();
            spawn_local(async move { client.logout().await });
        }));
    }

    if plan.wire_theme_toggle
        && let Some(toggle) = theme_toggle
    {
        listeners.push(EventListener::new(&toggle, "click", move |_| {
            toggle_theme(&DocumentTheme::new(), &session);
        }));
    }

    if plan.refresh_now {
        spawn_refresh(client.clone());
    }

    let refresh = plan.refresh_every.map(|every| {
        let client = client.clone();
        Interval::new(interval_millis(every), move || spawn_refresh(client.clone()))
    });

    PageSession { listeners, refresh }
}

fn spawn_refresh(client: AuthenticatedClient) {
    spawn_local(async move {
        if !client.refresh_token().await {
            debug!("scheduled token refresh did not renew the token");
        }
    });
}

fn interval_millis(every: Duration) -> u32 {
    u32::try_from(every.as_millis()).unwrap_or(u32::MAX)
}
