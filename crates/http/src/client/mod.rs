//! Authenticated client for the chat application's HTTP API

pub mod error;
mod options;

pub use options::{FetchInit, RequestBody, RequestOptions};

use crate::types::{LoginForm, TokenResponse, UserProfile};
use courier_core::{AuthConfig, ClientConfig, Navigator, SessionContext};
use error::ClientError;
use reqwest::{Client, ClientBuilder as HttpClientBuilder, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// HTTP client bound to the browser session.
///
/// Every authorized call reads the current token, so a refresh that lands
/// between two requests is picked up by the second one.
#[derive(Clone)]
pub struct AuthenticatedClient {
    client: Client,
    base_url: Url,
    session: SessionContext,
    navigator: Rc<dyn Navigator>,
}

impl AuthenticatedClient {
    /// Create a new client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Build a client from runtime configuration
    pub fn from_config(
        config: &ClientConfig,
        session: SessionContext,
        navigator: Rc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        config
            .validate()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        Self::builder()
            .base_url(config.base_url.clone())
            .build(session, navigator)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn navigator(&self) -> &Rc<dyn Navigator> {
        &self.navigator
    }

    /// Resolve `path` against the base URL the way `fetch` resolves against
    /// the document; absolute URLs pass through
    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Configuration(format!("cannot resolve {path}: {e}")))
    }

    /// Create a request builder, carrying cookies when the profile asks for it
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        Ok(self.with_credentials(self.client.request(method, url)))
    }

    #[cfg(target_arch = "wasm32")]
    fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        if self.session.profile().includes_credentials() {
            request.fetch_credentials_include()
        } else {
            request
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        // The native cookie store stands in for the browser's
        request
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }

    /// Run the auth guard against the current location
    pub fn check_auth(&self) -> bool {
        courier_core::check_auth(&self.session, &*self.navigator)
    }

    /// Authorized request returning the decoded JSON body.
    ///
    /// Every failure is logged and comes back as `None`; an absent or
    /// rejected credential has already sent the page to `/login`.
    pub async fn api_request(&self, url: &str, options: RequestOptions) -> Option<Value> {
        self.api_request_as(url, options).await
    }

    /// Typed form of [`api_request`](Self::api_request)
    pub async fn api_request_as<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Option<T> {
        match self.send_authorized(url, &options).await {
            Ok(body) => Some(body),
            Err(err) if err.is_auth_expired() => {
                debug!(url, error = %err, "session ended");
                None
            }
            Err(err) => {
                error!(url, status = ?err.status(), error = %err, "API request failed");
                None
            }
        }
    }

    /// Authorized request keeping the failure kind.
    ///
    /// [`ClientError::MissingToken`] and [`ClientError::AuthenticationFailed`]
    /// mean the session ended and the page was sent to `/login`. A single
    /// call refreshes at most [`AuthConfig::MAX_REFRESH_RETRIES`] times.
    pub async fn send_authorized<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<T, ClientError> {
        let Some(mut token) = self.session.token() else {
            debug!(url, "no token, sending to login");
            self.navigator.navigate(AuthConfig::LOGIN_PATH);
            return Err(ClientError::MissingToken);
        };

        let mut refreshes = 0;
        loop {
            let request = options.apply(self.request(options.method.clone(), url)?, &token)?;
            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if self.session.profile().refreshes_on_unauthorized()
                    && refreshes < AuthConfig::MAX_REFRESH_RETRIES
                {
                    refreshes += 1;
                    if let Some(fresh) = self.refresh_access_token().await {
                        debug!(url, "retrying with refreshed token");
                        token = fresh;
                        continue;
                    }
                }

                let message = response.text().await.unwrap_or_else(|_| status.to_string());
                warn!(url, "credential rejected, ending session");
                self.end_session();
                return Err(ClientError::AuthenticationFailed(message));
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_else(|_| status.to_string());
                return Err(ClientError::from_status(status, message));
            }

            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }
    }

    /// Exchange the current token for a new one.
    ///
    /// Returns `false` without any I/O when there is no token. A failed
    /// refresh leaves the stored token alone.
    pub async fn refresh_token(&self) -> bool {
        self.refresh_access_token().await.is_some()
    }

    async fn refresh_access_token(&self) -> Option<String> {
        let token = self.session.token()?;
        let request = match self.request(Method::POST, AuthConfig::REFRESH_ENDPOINT) {
            Ok(request) => request.bearer_auth(token),
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                return None;
            }
        };

        match self.execute::<TokenResponse>(request).await {
            Ok(response) => {
                self.session.set_token(&response.access_token);
                debug!("access token refreshed");
                Some(response.access_token)
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                None
            }
        }
    }

    /// Sign out and leave for `/login`, whatever the server says
    pub async fn logout(&self) {
        if self.session.profile().logout_calls_server() {
            let sent = match self.request(Method::POST, AuthConfig::LOGOUT_ENDPOINT) {
                Ok(request) => request.send().await.map_err(ClientError::from),
                Err(err) => Err(err),
            };
            match sent {
                Ok(response) if response.status().is_success() => debug!("server session closed"),
                Ok(response) => warn!(status = %response.status(), "logout endpoint refused"),
                Err(err) => error!(error = %err, "logout request failed"),
            }
        }
        self.end_session();
    }

    /// Password login; stores the issued token on success
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self
            .request(Method::POST, AuthConfig::LOGIN_ENDPOINT)?
            .form(&form);

        let token: TokenResponse = self.execute(request).await?;
        self.session.set_token(&token.access_token);
        debug!(username, "signed in");
        Ok(token)
    }

    /// Profile of the signed-in user
    pub async fn current_user(&self) -> Option<UserProfile> {
        self.api_request_as(AuthConfig::ME_ENDPOINT, RequestOptions::new())
            .await
    }

    fn end_session(&self) {
        self.session.clear_token();
        self.navigator.navigate(AuthConfig::LOGIN_PATH);
    }
}

/// Builder for AuthenticatedClient
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout. Ignored on wasm32.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(
        self,
        session: SessionContext,
        navigator: Rc<dyn Navigator>,
    ) -> Result<AuthenticatedClient, ClientError> {
        let base_url = self
            .base_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url}: {e}")))?;

        let mut client_builder = HttpClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(timeout) = self.timeout {
                client_builder = client_builder.timeout(timeout);
            }
            client_builder = client_builder.cookie_store(session.profile().includes_credentials());
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        client_builder = client_builder
            .user_agent(self.user_agent.unwrap_or_else(|| "courier-client/0.1.0".to_string()));

        let client = client_builder.build()?;

        Ok(AuthenticatedClient {
            client,
            base_url,
            session,
            navigator,
        })
    }
}
