//! REST API client for the SimSynAI backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session layer only talks to the backend through [`AuthApi`], so tests
//! and alternative transports can stand in for the `reqwest` implementation.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures become `AuthError::Network`; any non-200 from
//! `/users/me` is `AuthError::Unauthorized`; non-200 login/register replies
//! become `AuthError::ValidationRejected` carrying the backend's `detail`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use super::error::AuthError;
use super::types::{Identity, LoginForm, RegisterRequest, TokenResponse};
use crate::config::ClientConfig;

const LOGIN_FALLBACK_MESSAGE: &str = "login failed";
const REGISTER_FALLBACK_MESSAGE: &str = "registration failed";

/// Backend operations consumed by the session layer.
///
/// Futures are not required to be `Send`: everything runs on one cooperative
/// UI-style executor.
#[async_trait::async_trait(?Send)]
pub trait AuthApi {
    /// Resolve the identity owning `token` via `GET /api/v1/users/me`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for any non-200 reply, `Network` if unreachable,
    /// `Format` if the identity body is malformed.
    async fn fetch_current_user(&self, token: &str) -> Result<Identity, AuthError>;

    /// Exchange credentials for a bearer token via `POST /api/v1/auth/login`.
    ///
    /// # Errors
    ///
    /// `ValidationRejected` with the backend's `detail` on a non-200 reply.
    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError>;

    /// Create an account via `POST /api/v1/auth/register`.
    ///
    /// # Errors
    ///
    /// `ValidationRejected` with the backend's `detail` on a non-200 reply.
    async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError>;
}

fn current_user_endpoint(base_url: &str) -> String {
    format!("{base_url}/api/v1/users/me")
}

fn login_endpoint(base_url: &str) -> String {
    format!("{base_url}/api/v1/auth/login")
}

fn register_endpoint(base_url: &str) -> String {
    format!("{base_url}/api/v1/auth/register")
}

/// [`AuthApi`] over HTTP using `reqwest`.
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Build a client for `base_url` with the given request/connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Network` if the HTTP client cannot be built.
    pub fn new(base_url: &str, request_timeout: Duration, connect_timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AuthError::Network(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    /// Build a client from typed configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Network` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AuthError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.timeouts.request_secs),
            Duration::from_secs(config.timeouts.connect_secs),
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn fetch_current_user(&self, token: &str) -> Result<Identity, AuthError> {
        let resp = self
            .http
            .get(current_user_endpoint(&self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            tracing::debug!(status = %resp.status(), "identity lookup rejected");
            return Err(AuthError::Unauthorized);
        }

        resp.json::<Identity>()
            .await
            .map_err(|e| AuthError::Format(format!("identity body: {e}")))
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let resp = self
            .http
            .post(login_endpoint(&self.base_url))
            .form(&LoginForm { username, password })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(%status, "login rejected");
            return Err(AuthError::rejected_from_body(&body, LOGIN_FALLBACK_MESSAGE));
        }

        let body: TokenResponse = resp.json().await?;
        if body.access_token.is_empty() {
            return Err(AuthError::Format("empty access_token".to_owned()));
        }
        Ok(body.access_token)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        let resp = self
            .http
            .post(register_endpoint(&self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(%status, "registration rejected");
            return Err(AuthError::rejected_from_body(&body, REGISTER_FALLBACK_MESSAGE));
        }
        Ok(())
    }
}
