//! Wire types shared between the session layer and the backend API.
//!
//! DESIGN
//! ======
//! These mirror the backend's JSON contract. Optional fields default to
//! `None` so older or trimmed-down backends still deserialize cleanly.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Authenticated identity returned by `GET /api/v1/users/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Login name.
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Backend user identifier.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    /// Default language model selected in the user's profile.
    #[serde(default)]
    pub preferred_model: Option<String>,
}

impl Identity {
    /// Identity carrying only a username.
    #[must_use]
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            full_name: None,
            id: None,
            is_active: None,
            is_superuser: None,
            preferred_model: None,
        }
    }

    /// Name suitable for a header avatar: full name when set, else username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Credentials submitted by the login form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Stored as an advisory flag only.
    pub remember: bool,
}

/// Form-encoded body of `POST /api/v1/auth/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// JSON body of `POST /api/v1/auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Error body returned with non-200 responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    /// Machine-readable error code, when the backend provides one.
    #[serde(default)]
    pub code: Option<String>,
}
