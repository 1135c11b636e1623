//! Auth-session snapshot for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard and identity-aware views. The identity lives
//! inside the `Authenticated` variant, so "identity present iff
//! authenticated" holds by construction.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::Identity;

/// Coarse authentication status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthStatus {
    Unknown,
    Authenticating,
    Authenticated,
    Unauthenticated,
}

/// Authentication state observed by views.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Boot has not run yet.
    #[default]
    Unknown,
    /// A validation request is in flight.
    Authenticating,
    Authenticated(Identity),
    Unauthenticated,
}

impl AuthState {
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        match self {
            Self::Unknown => AuthStatus::Unknown,
            Self::Authenticating => AuthStatus::Authenticating,
            Self::Authenticated(_) => AuthStatus::Authenticated,
            Self::Unauthenticated => AuthStatus::Unauthenticated,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Whether a status decision is still pending (views show a spinner).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unknown | Self::Authenticating)
    }
}
