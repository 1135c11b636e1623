//! Shared helpers: storage backends, the route guard and form validation.

pub mod forms;
pub mod route_guard;
pub mod storage;
