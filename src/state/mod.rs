//! Client-side session state.
//!
//! DESIGN
//! ======
//! State is split by concern (`auth` snapshots, persisted `credentials`,
//! `language` preference, the `session` state machine) so views and the
//! route guard can depend on small focused models.

pub mod auth;
pub mod credentials;
pub mod language;
pub mod session;
