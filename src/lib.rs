//! # simsyn-session
//!
//! Client-side session and access-control layer for the SimSynAI front end.
//!
//! This crate decides, on boot and on every navigation, whether the user is
//! authenticated. It holds the authenticated identity, gates protected views,
//! and keeps that decision consistent with the bearer token kept in client
//! key-value storage. Views, translations and the backend itself are external
//! collaborators reached through [`net::api::AuthApi`] and [`app::App`].

pub mod app;
pub mod config;
pub mod net;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::App;
pub use net::error::AuthError;
pub use state::auth::{AuthState, AuthStatus};
