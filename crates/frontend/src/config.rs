//! Frontend configuration

use courier_core::ClientConfig;
use tracing::warn;

/// `<meta>` element carrying the client configuration as JSON
pub const CONFIG_META_SELECTOR: &str = r#"meta[name="courier-config"]"#;

/// Read the page's client configuration.
///
/// A missing or invalid `<meta name="courier-config">` falls back to the
/// defaults; an empty base URL becomes the page URL, so relative request
/// URLs resolve as `fetch` would resolve them.
pub fn load_config() -> ClientConfig {
    let mut config = read_meta_config().unwrap_or_default();
    if config.base_url.is_empty() {
        config.base_url = page_url();
    }
    config
}

fn read_meta_config() -> Option<ClientConfig> {
    let content = web_sys::window()?
        .document()?
        .query_selector(CONFIG_META_SELECTOR)
        .ok()??
        .get_attribute("content")?;

    match ClientConfig::from_json(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(error = %e, "ignoring page client config");
            None
        }
    }
}

fn page_url() -> String {
    web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default()
}
