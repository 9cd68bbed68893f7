//! Wire types of the chat application's auth API

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Body returned by the login and refresh endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Form fields of the password login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Signed-in user as returned by `/api/auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    /// Server-local ISO timestamps, sent without an offset
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_true() -> bool {
    true
}
