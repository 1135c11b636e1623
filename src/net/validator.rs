//! Identity validation for stored bearer tokens.
//!
//! A token's validity is decided solely by the backend. This module only
//! classifies the answer so the caller knows whether the stored credential
//! is stale (clear it) or the failure was transient (keep it for next boot).

#[cfg(test)]
#[path = "validator_test.rs"]
mod validator_test;

use std::rc::Rc;

use super::api::AuthApi;
use super::error::AuthError;
use super::types::Identity;

/// What the caller must do with stored credentials after a failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialAction {
    /// The token was rejected; drop token and username.
    Clear,
    /// The failure was transient; keep the token for the next attempt.
    Retain,
}

impl CredentialAction {
    #[must_use]
    pub fn for_error(err: &AuthError) -> Self {
        match err {
            AuthError::Unauthorized => Self::Clear,
            _ => Self::Retain,
        }
    }
}

/// Asks the backend who owns a token.
#[derive(Clone)]
pub struct IdentityValidator {
    api: Rc<dyn AuthApi>,
}

impl IdentityValidator {
    #[must_use]
    pub fn new(api: Rc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Resolve the identity for `token`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if the token is blank or rejected, `Network` if the
    /// backend is unreachable, `Format` if its reply is malformed.
    pub async fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::Unauthorized);
        }
        self.api.fetch_current_user(token).await
    }
}
