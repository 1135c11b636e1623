//! Presentation-facing application context.
//!
//! DESIGN
//! ======
//! One `App` is created at process start and passed by reference to the
//! navigation layer and views. It owns the single credential store, session
//! machine and language controller, and exposes the read-only auth state
//! plus the login/logout/register/language actions.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::{broadcast, watch};

use crate::net::api::AuthApi;
use crate::net::error::AuthError;
use crate::net::types::Identity;
use crate::state::auth::AuthState;
use crate::state::credentials::CredentialStore;
use crate::state::language::{Language, LanguageController, TranslationsInvalidated};
use crate::state::session::SessionMachine;
use crate::util::forms::{FormError, RegisterForm, validate_login_input, validate_register_input};
use crate::util::route_guard::{self, LOGIN_PATH, Route, RouteDecision};
use crate::util::storage::KeyValueStorage;

/// Failure of a user-initiated action, ready to show inline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub struct App {
    store: Rc<CredentialStore>,
    api: Rc<dyn AuthApi>,
    session: SessionMachine,
    language: LanguageController,
    /// Original path carried through one login round trip.
    return_to: RefCell<Option<String>>,
}

impl App {
    #[must_use]
    pub fn new(storage: Rc<dyn KeyValueStorage>, api: Rc<dyn AuthApi>) -> Self {
        let store = Rc::new(CredentialStore::new(storage));
        Self {
            session: SessionMachine::new(Rc::clone(&store), Rc::clone(&api)),
            language: LanguageController::new(Rc::clone(&store)),
            store,
            api,
            return_to: RefCell::new(None),
        }
    }

    /// Apply the stored language, then restore the session.
    pub async fn boot(&self) -> AuthState {
        self.language.load_initial_language();
        self.session.boot().await
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.session.identity()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.session.subscribe()
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    /// Consult the route guard for `path`, remembering the requested path
    /// when it bounces to login.
    ///
    /// The carried path lives for one redirect round trip: it survives
    /// landing on the login view and is dropped by any other navigation.
    pub fn navigate(&self, path: &str) -> RouteDecision {
        let decision = route_guard::decide(self.session.status(), path);
        let mut return_to = self.return_to.borrow_mut();
        match &decision {
            RouteDecision::Redirect { from: Some(from), .. } => *return_to = Some(from.clone()),
            RouteDecision::Render(Route::Login) => {}
            _ => *return_to = None,
        }
        decision
    }

    /// Log in and return the path to forward to.
    ///
    /// # Errors
    ///
    /// `Form` for missing input, `Auth` for backend rejections. On failure the
    /// carried return path is kept so a retry still forwards there.
    pub async fn login(&self, username: &str, password: &str, remember: bool) -> Result<&'static str, ActionError> {
        let request = validate_login_input(username, password, remember)?;
        self.session.login(&request).await?;
        let from = self.return_to.borrow_mut().take();
        Ok(route_guard::post_login_target(from.as_deref()))
    }

    /// Log out and return the login path.
    pub fn logout(&self) -> &'static str {
        self.session.logout();
        *self.return_to.borrow_mut() = None;
        LOGIN_PATH
    }

    /// Create an account and return the login path. Never logs in.
    ///
    /// # Errors
    ///
    /// `Form` for invalid input, `Auth` when the backend rejects it.
    pub async fn register(&self, form: &RegisterForm) -> Result<&'static str, ActionError> {
        let request = validate_register_input(form)?;
        self.api.register(&request).await?;
        tracing::info!(username = %request.username, "registered");
        Ok(LOGIN_PATH)
    }

    pub fn change_language(&self, language: Language) {
        self.language.set_language(language);
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language.active()
    }

    #[must_use]
    pub fn subscribe_translations(&self) -> broadcast::Receiver<TranslationsInvalidated> {
        self.language.subscribe()
    }
}
