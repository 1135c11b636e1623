//! Backend collaborator contract: wire types, error taxonomy, HTTP client,
//! and the identity validator built on top of it.

pub mod api;
pub mod error;
pub mod types;
pub mod validator;
