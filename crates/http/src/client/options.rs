//! Per-request options for authorized calls

use super::error::ClientError;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Text(String),
    Form(Vec<(String, String)>),
}

/// Options for [`AuthenticatedClient::api_request`](super::AuthenticatedClient::api_request).
///
/// Caller headers are applied after `Authorization` and replace any header of
/// the same name.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// Merge the bearer header, caller headers and body into `request`
    pub(crate) fn apply(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> Result<RequestBuilder, ClientError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            ClientError::InvalidHeader {
                name: AUTHORIZATION.to_string(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, bearer);

        for (name, value) in &self.headers {
            let invalid = |reason: String| ClientError::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.insert(header_name, header_value);
        }

        let request = request.headers(headers);
        Ok(match &self.body {
            None => request,
            Some(RequestBody::Json(body)) => request.json(body),
            Some(RequestBody::Text(body)) => request.body(body.clone()),
            Some(RequestBody::Form(fields)) => request.form(fields),
        })
    }
}

/// The subset of a fetch `RequestInit` the client understands
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FetchInit {
    pub method: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl TryFrom<FetchInit> for RequestOptions {
    type Error = ClientError;

    fn try_from(init: FetchInit) -> Result<Self, Self::Error> {
        let mut options = Self::new();
        if let Some(method) = init.method {
            let parsed = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|e| {
                ClientError::InvalidMethod {
                    method: method.clone(),
                    reason: e.to_string(),
                }
            })?;
            options = options.method(parsed);
        }
        for (name, value) in init.headers {
            options = options.header(name, value);
        }
        // `JSON.stringify` output arrives as a string and is sent verbatim
        options = match init.body {
            None | Some(Value::Null) => options,
            Some(Value::String(text)) => options.text(text),
            Some(json) => options.json(json),
        };
        Ok(options)
    }
}
