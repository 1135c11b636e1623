//! Persisted credential record.
//!
//! Wraps client key-value storage holding the bearer token, the last-known
//! username, the "remember" flag and the preferred language. There is no
//! logic here beyond get/set/clear; absence of a key is a valid state.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::rc::Rc;

use super::language::Language;
use crate::util::storage::KeyValueStorage;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const REMEMBER_KEY: &str = "remember";
pub const LANGUAGE_KEY: &str = "language";

/// Snapshot of everything persisted for this client profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    pub token: Option<String>,
    /// Advisory display name; never trusted as identity.
    pub username: Option<String>,
    /// Stored only. Persistence scope is decided outside this crate.
    pub remember: bool,
    pub language: Language,
}

/// Typed view over [`KeyValueStorage`] using the fixed key layout.
pub struct CredentialStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the full record. Missing fields come back absent/default.
    #[must_use]
    pub fn get(&self) -> CredentialRecord {
        CredentialRecord {
            token: self.token(),
            username: self.non_empty(USERNAME_KEY),
            remember: self.storage.get(REMEMBER_KEY).as_deref() == Some("true"),
            language: self.language(),
        }
    }

    /// Stored bearer token, treating an empty string as absent.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.non_empty(TOKEN_KEY)
    }

    /// Stored language; unrecognized values fall back to the default.
    #[must_use]
    pub fn language(&self) -> Language {
        let Some(raw) = self.storage.get(LANGUAGE_KEY) else {
            return Language::default();
        };
        raw.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring stored language");
            Language::default()
        })
    }

    pub fn set_token(&self, token: &str, username: &str, remember: bool) {
        self.storage.set(TOKEN_KEY, token);
        self.storage.set(USERNAME_KEY, username);
        if remember {
            self.storage.set(REMEMBER_KEY, "true");
        } else {
            self.storage.remove(REMEMBER_KEY);
        }
    }

    pub fn set_language(&self, language: Language) {
        self.storage.set(LANGUAGE_KEY, language.code());
    }

    /// Remove token, username and remember. Language is preserved.
    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USERNAME_KEY);
        self.storage.remove(REMEMBER_KEY);
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.storage.get(key).filter(|value| !value.is_empty())
    }
}
