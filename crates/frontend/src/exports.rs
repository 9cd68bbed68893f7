//! Global functions for page scripts: `apiRequest`, `formatDate`, `checkAuth`,
//! `logout` and `refreshToken`

use crate::client::{date_format, installed_client};
use courier_http::{FetchInit, RequestOptions};
use serde::Serialize;
use tracing::{error, warn};
use wasm_bindgen::prelude::*;

/// Read the fetch-style options bag handed to `apiRequest`
fn request_options(options: JsValue) -> Result<RequestOptions, String> {
    if options.is_undefined() || options.is_null() {
        return Ok(RequestOptions::new());
    }
    let init: FetchInit = serde_wasm_bindgen::from_value(options).map_err(|e| e.to_string())?;
    RequestOptions::try_from(init).map_err(|e| e.to_string())
}

/// `apiRequest(url, options)`: resolves to the JSON body or `null`
#[wasm_bindgen(js_name = apiRequest)]
pub async fn api_request(url: String, options: JsValue) -> JsValue {
    let Some(client) = installed_client() else {
        warn!("apiRequest called before the client was started");
        return JsValue::NULL;
    };

    let options = match request_options(options) {
        Ok(options) => options,
        Err(e) => {
            error!(url, error = %e, "unusable request options");
            return JsValue::NULL;
        }
    };

    match client.api_request(&url, options).await {
        Some(body) => body
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}

/// `formatDate(dateString)`; unparseable input is returned unchanged
#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(date: &str) -> String {
    courier_core::format_date(date, &date_format()).unwrap_or_else(|e| {
        warn!(error = %e, "cannot format date");
        date.to_string()
    })
}

/// `checkAuth()`: `true` when the page may stay
#[wasm_bindgen(js_name = checkAuth)]
pub fn check_auth() -> bool {
    installed_client().is_some_and(|client| client.check_auth())
}

#[wasm_bindgen(js_name = logout)]
pub async fn logout() {
    if let Some(client) = installed_client() {
        client.logout().await;
    }
}

#[wasm_bindgen(js_name = refreshToken)]
pub async fn refresh_token() -> bool {
    match installed_client() {
        Some(client) => client.refresh_token().await,
        None => false,
    }
}
