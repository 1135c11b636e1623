//! Route guard consulted before rendering any view.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation goes through [`decide`]. Protected views require an
//! authenticated session; public auth views bounce authenticated users to
//! the dashboard; the root path always redirects; unknown paths render the
//! not-found view without looking at the session.

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

use crate::state::auth::AuthStatus;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Known application views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Register,
    Dashboard,
    Chat,
    Simulation,
    Visualization,
    Profile,
    NotFound,
}

impl Route {
    /// Match a navigation path, ignoring ASCII case. Query strings,
    /// fragments and a trailing slash are ignored; sub-paths are not matched.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_matches('/').to_ascii_lowercase();
        match path.as_str() {
            "" => Self::Root,
            "login" => Self::Login,
            "register" => Self::Register,
            "dashboard" => Self::Dashboard,
            "chat" => Self::Chat,
            "simulation" => Self::Simulation,
            "visualization" => Self::Visualization,
            "profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// Canonical path, or `None` for the not-found view.
    #[must_use]
    pub fn path(self) -> Option<&'static str> {
        match self {
            Self::Root => Some("/"),
            Self::Login => Some(LOGIN_PATH),
            Self::Register => Some(REGISTER_PATH),
            Self::Dashboard => Some(DASHBOARD_PATH),
            Self::Chat => Some("/chat"),
            Self::Simulation => Some("/simulation"),
            Self::Visualization => Some("/visualization"),
            Self::Profile => Some("/profile"),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard | Self::Chat | Self::Simulation | Self::Visualization | Self::Profile)
    }

    #[must_use]
    pub fn is_public_auth(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// Outcome of a guard check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    /// Navigate to `target` instead. `from` carries the originally requested
    /// path for one login round trip; it is never persisted.
    Redirect { target: &'static str, from: Option<String> },
}

impl RouteDecision {
    fn redirect(target: &'static str) -> Self {
        Self::Redirect { target, from: None }
    }
}

/// Decide whether `path` may render under `status`.
#[must_use]
pub fn decide(status: AuthStatus, path: &str) -> RouteDecision {
    let route = Route::parse(path);
    let authenticated = status == AuthStatus::Authenticated;

    match route {
        Route::NotFound => RouteDecision::Render(Route::NotFound),
        Route::Root if authenticated => RouteDecision::redirect(DASHBOARD_PATH),
        Route::Root => RouteDecision::redirect(LOGIN_PATH),
        r if r.is_public_auth() && authenticated => RouteDecision::redirect(DASHBOARD_PATH),
        r if r.is_protected() && !authenticated => RouteDecision::Redirect {
            target: LOGIN_PATH,
            from: r.path().map(str::to_owned),
        },
        r => RouteDecision::Render(r),
    }
}

/// Where to go after a successful login.
///
/// Only a carried path naming a protected view is honored; anything else
/// falls back to the dashboard.
#[must_use]
pub fn post_login_target(from: Option<&str>) -> &'static str {
    from.map(Route::parse)
        .filter(|route| route.is_protected())
        .and_then(Route::path)
        .unwrap_or(DASHBOARD_PATH)
}
