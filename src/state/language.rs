//! Preferred display language.
//!
//! Independent of authentication, but persisted in the same credential
//! store. A language change is broadcast as a `TranslationsInvalidated`
//! event: every subscriber must drop all cached translated text, so no view
//! rendered in the previous language survives the switch.

#[cfg(test)]
#[path = "language_test.rs"]
mod language_test;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use tokio::sync::broadcast;

use super::credentials::CredentialStore;

const EVENT_CAPACITY: usize = 16;

/// Presentation language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    /// Storage code (`"zh"` / `"en"`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Locale tag for the presentation toolkit.
    #[must_use]
    pub fn locale_tag(self) -> &'static str {
        match self {
            Self::Zh => "zh-CN",
            Self::En => "en-US",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language code: {0:?}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "zh" => Ok(Self::Zh),
            "en" => Ok(Self::En),
            other => Err(UnknownLanguage(other.to_owned())),
        }
    }
}

/// Broadcast to presentation subscribers when the active language changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranslationsInvalidated {
    pub language: Language,
}

/// Reads, writes and applies the preferred language.
pub struct LanguageController {
    store: Rc<CredentialStore>,
    active: Cell<Language>,
    events: broadcast::Sender<TranslationsInvalidated>,
}

impl LanguageController {
    #[must_use]
    pub fn new(store: Rc<CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, active: Cell::new(Language::default()), events }
    }

    /// Apply the stored language before any text is rendered.
    pub fn load_initial_language(&self) -> Language {
        let language = self.store.language();
        self.active.set(language);
        tracing::debug!(%language, "initial language applied");
        language
    }

    /// Persist and apply `language`, invalidating all translated text.
    pub fn set_language(&self, language: Language) {
        self.store.set_language(language);
        self.active.set(language);
        let _ = self.events.send(TranslationsInvalidated { language });
        tracing::info!(%language, "language changed");
    }

    #[must_use]
    pub fn active(&self) -> Language {
        self.active.get()
    }

    /// Subscribe to translation invalidation events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TranslationsInvalidated> {
        self.events.subscribe()
    }
}
