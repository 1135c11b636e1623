//! Session state machine.
//!
//! ARCHITECTURE
//! ============
//! `Unknown` → (boot) → `Authenticating` → `Authenticated` | `Unauthenticated`.
//! A boot without a stored token goes straight to `Unauthenticated`. Login
//! stores the issued token and re-enters `Authenticating`; logout clears the
//! store and lands in `Unauthenticated`. Nothing re-enters `Unknown`.
//!
//! Every published [`AuthState`] goes through one `watch` channel, and the
//! identity lives inside `AuthState::Authenticated`, so no observer can see
//! an identity without the authenticated status or vice versa.
//!
//! ORDERING
//! ========
//! Only one boot/login may be in flight per machine; a second one is
//! rejected with `AuthError::Busy`. Each attempt takes a ticket from a
//! monotonic generation counter, and `logout` bumps the counter too. A
//! result whose ticket is no longer current is discarded instead of applied,
//! so a slow validation can never overwrite a newer logout.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::Cell;
use std::rc::Rc;

use tokio::sync::watch;

use super::auth::{AuthState, AuthStatus};
use super::credentials::CredentialStore;
use crate::net::api::AuthApi;
use crate::net::error::AuthError;
use crate::net::types::{Identity, LoginRequest};
use crate::net::validator::{CredentialAction, IdentityValidator};

/// Releases the single-flight slot when an attempt finishes or is dropped.
struct FlightGuard<'a>(&'a Cell<bool>);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Owns the in-memory authentication state for one app runtime.
pub struct SessionMachine {
    store: Rc<CredentialStore>,
    api: Rc<dyn AuthApi>,
    validator: IdentityValidator,
    state: watch::Sender<AuthState>,
    generation: Cell<u64>,
    in_flight: Cell<bool>,
}

impl SessionMachine {
    /// Create a machine in `Unknown`. Call [`SessionMachine::boot`] next.
    #[must_use]
    pub fn new(store: Rc<CredentialStore>, api: Rc<dyn AuthApi>) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self {
            store,
            validator: IdentityValidator::new(Rc::clone(&api)),
            api,
            state,
            generation: Cell::new(0),
            in_flight: Cell::new(false),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Observe every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Whether a boot or login is currently awaiting the backend.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Derive the initial state from stored credentials.
    ///
    /// Only acts from `Unknown`; later calls return the current state.
    /// Validation failures are absorbed here: a rejected token is cleared,
    /// a transient failure keeps it for the next boot.
    pub async fn boot(&self) -> AuthState {
        if self.status() != AuthStatus::Unknown {
            tracing::debug!(status = ?self.status(), "boot skipped; session already initialized");
            return self.state();
        }

        let Some(token) = self.store.token() else {
            self.transition(AuthState::Unauthenticated);
            tracing::info!("no stored token; session unauthenticated");
            return self.state();
        };

        let Ok((_flight, ticket)) = self.begin() else {
            tracing::debug!("boot skipped; login already in flight");
            return self.state();
        };

        self.transition(AuthState::Authenticating);
        match self.settle_validation(ticket, &token).await {
            Ok(identity) => tracing::info!(username = %identity.username, "restored session"),
            Err(e) => tracing::info!(error = %e, "stored session not restored"),
        }
        self.state()
    }

    /// Exchange credentials for a token, store it, then validate it.
    ///
    /// # Errors
    ///
    /// - `Busy` if another boot/login is in flight.
    /// - `ValidationRejected`/`Network` from the login exchange; the state and
    ///   the credential store are left untouched.
    /// - `Unauthorized`/`Network`/`Format` from validating the new token.
    /// - `Superseded` if a logout happened while this login was pending.
    pub async fn login(&self, request: &LoginRequest) -> Result<Identity, AuthError> {
        let (_flight, ticket) = self.begin()?;

        let token = match self.api.login(&request.username, &request.password).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "login exchange failed");
                return Err(e);
            }
        };

        if !self.is_current(ticket) {
            tracing::debug!("discarding login superseded by logout");
            return Err(AuthError::Superseded);
        }

        self.store.set_token(&token, &request.username, request.remember);
        self.transition(AuthState::Authenticating);
        let identity = self.settle_validation(ticket, &token).await?;
        tracing::info!(username = %identity.username, "logged in");
        Ok(identity)
    }

    /// Clear stored credentials and drop to `Unauthenticated`.
    ///
    /// Any boot/login still awaiting the backend is superseded.
    pub fn logout(&self) {
        self.generation.set(self.generation.get() + 1);
        self.store.clear();
        self.transition(AuthState::Unauthenticated);
        tracing::info!("logged out");
    }

    fn begin(&self) -> Result<(FlightGuard<'_>, u64), AuthError> {
        if self.in_flight.get() {
            return Err(AuthError::Busy);
        }
        self.in_flight.set(true);
        let ticket = self.generation.get() + 1;
        self.generation.set(ticket);
        Ok((FlightGuard(&self.in_flight), ticket))
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.get() == ticket
    }

    async fn settle_validation(&self, ticket: u64, token: &str) -> Result<Identity, AuthError> {
        let result = self.validator.validate(token).await;

        if !self.is_current(ticket) {
            tracing::debug!("discarding superseded validation result");
            return Err(AuthError::Superseded);
        }

        match result {
            Ok(identity) => {
                self.transition(AuthState::Authenticated(identity.clone()));
                Ok(identity)
            }
            Err(e) => {
                match CredentialAction::for_error(&e) {
                    CredentialAction::Clear => {
                        tracing::warn!("stored token rejected; clearing credentials");
                        self.store.clear();
                    }
                    CredentialAction::Retain => {
                        tracing::warn!(error = %e, "token validation failed; keeping stored token");
                    }
                }
                self.transition(AuthState::Unauthenticated);
                Err(e)
            }
        }
    }

    fn transition(&self, next: AuthState) {
        let from = self.state.send_replace(next).status();
        tracing::debug!(?from, to = ?self.status(), "session transition");
    }
}
