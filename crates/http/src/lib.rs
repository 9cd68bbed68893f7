//! Courier HTTP client

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::{AuthenticatedClient, ClientBuilder, FetchInit, RequestBody, RequestOptions};
pub use reqwest::Method;
pub use types::{TokenResponse, UserProfile};
