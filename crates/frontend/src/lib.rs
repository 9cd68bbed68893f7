//! Browser bindings for the courier chat client

pub mod client;
pub mod config;
pub mod exports;
pub mod logging;
pub mod navigation;
pub mod page;
pub mod storage;
pub mod theme;

pub use client::{create_client, installed_client};
pub use config::load_config;
pub use navigation::BrowserNavigator;
pub use page::{PageSession, init_page};
pub use storage::BrowserStore;
pub use theme::DocumentTheme;

use courier_core::ClientConfig;
use courier_http::AuthenticatedClient;
use gloo_events::EventListener;
use tracing::error;

/// Install the client and initialize the page once the DOM is ready
pub fn start() {
    logging::init();

    let config = load_config();
    let api = match create_client(&config) {
        Ok(api) => api,
        Err(e) => {
            error!(error = %e, "cannot create API client");
            return;
        }
    };
    client::install(api.clone(), &config);

    let document = gloo_utils::document();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| {
            on_ready(&api, &config);
        })
        .forget();
    } else {
        on_ready(&api, &config);
    }
}

fn on_ready(client: &AuthenticatedClient, config: &ClientConfig) {
    init_page(client, config).keep_alive();
}
