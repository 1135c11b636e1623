//! Error taxonomy for authentication and session operations.
//!
//! ERROR HANDLING
//! ==============
//! Every network or validation failure is converted into one of these kinds
//! at the point of the asynchronous call. Nothing here is meant to reach the
//! rendering layer as an uncaught failure: `Unauthorized` and `Network`
//! drive silent state transitions, `ValidationRejected` becomes an inline
//! form message, and `Format` falls back to defaults.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::types::ErrorBody;

/// Errors produced by the session layer and its backend collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend rejected the bearer token, or it is malformed/expired.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// Submitted credentials or registration data were rejected.
    #[error("{detail}")]
    ValidationRejected { detail: String, code: Option<String> },

    /// A response or stored value did not have the expected shape.
    #[error("format error: {0}")]
    Format(String),

    /// Another validation or login is already in flight.
    #[error("another authentication request is in progress")]
    Busy,

    /// A newer transition (e.g. logout) superseded this request's result.
    #[error("authentication request superseded")]
    Superseded,
}

impl AuthError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Network(_) => "E_NETWORK",
            Self::ValidationRejected { .. } => "E_VALIDATION_REJECTED",
            Self::Format(_) => "E_FORMAT",
            Self::Busy => "E_BUSY",
            Self::Superseded => "E_SUPERSEDED",
        }
    }

    /// Whether retrying the same request later may succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Busy)
    }

    /// Backend-provided structured code for a rejected submission.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ValidationRejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Build a `ValidationRejected` from a non-200 response body.
    ///
    /// Falls back to `fallback` when the body is not JSON or has no `detail`.
    #[must_use]
    pub fn rejected_from_body(body: &str, fallback: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        Self::ValidationRejected {
            detail: parsed
                .detail
                .filter(|detail| !detail.trim().is_empty())
                .unwrap_or_else(|| fallback.to_owned()),
            code: parsed.code,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Format(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
