//! In-crate test doubles for the backend collaborator.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tokio::sync::oneshot;

use crate::net::api::AuthApi;
use crate::net::error::AuthError;
use crate::net::types::{Identity, RegisterRequest};
use crate::state::credentials::CredentialStore;
use crate::util::storage::MemoryStorage;

/// Scriptable [`AuthApi`] backed by in-memory maps.
#[derive(Default)]
pub struct MockApi {
    /// token -> identity answered by `/users/me`.
    pub users: RefCell<HashMap<String, Identity>>,
    /// (username, password) -> issued token.
    pub accounts: RefCell<HashMap<(String, String), String>>,
    /// Usernames the register endpoint reports as taken.
    pub taken: RefCell<Vec<String>>,
    pub registered: RefCell<Vec<RegisterRequest>>,
    /// When set, every call fails with `Network`.
    pub unreachable: Cell<bool>,
    pub validate_calls: Cell<usize>,
    pub login_calls: Cell<usize>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl MockApi {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with_user(self: &Rc<Self>, token: &str, username: &str) -> Rc<Self> {
        self.users.borrow_mut().insert(token.to_owned(), Identity::named(username));
        Rc::clone(self)
    }

    pub fn with_account(self: &Rc<Self>, username: &str, password: &str, token: &str) -> Rc<Self> {
        self.accounts
            .borrow_mut()
            .insert((username.to_owned(), password.to_owned()), token.to_owned());
        self.with_user(token, username)
    }

    /// Hold the next `fetch_current_user` until the returned sender fires.
    pub fn gate_next_validation(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.borrow_mut() = Some(rx);
        tx
    }
}

#[async_trait::async_trait(?Send)]
impl AuthApi for MockApi {
    async fn fetch_current_user(&self, token: &str) -> Result<Identity, AuthError> {
        self.validate_calls.set(self.validate_calls.get() + 1);
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.unreachable.get() {
            return Err(AuthError::Network("connection refused".into()));
        }
        self.users.borrow().get(token).cloned().ok_or(AuthError::Unauthorized)
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.login_calls.set(self.login_calls.get() + 1);
        if self.unreachable.get() {
            return Err(AuthError::Network("connection refused".into()));
        }
        self.accounts
            .borrow()
            .get(&(username.to_owned(), password.to_owned()))
            .cloned()
            .ok_or_else(|| AuthError::ValidationRejected { detail: "bad credentials".into(), code: None })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        if self.unreachable.get() {
            return Err(AuthError::Network("connection refused".into()));
        }
        if self.taken.borrow().contains(&request.username) {
            return Err(AuthError::ValidationRejected { detail: "Username already taken".into(), code: None });
        }
        self.registered.borrow_mut().push(request.clone());
        Ok(())
    }
}

/// Credential store over fresh in-memory storage, plus a handle to that storage.
pub fn memory_store() -> (Rc<CredentialStore>, Rc<MemoryStorage>) {
    let storage = Rc::new(MemoryStorage::default());
    let store = Rc::new(CredentialStore::new(storage.clone()));
    (store, storage)
}
