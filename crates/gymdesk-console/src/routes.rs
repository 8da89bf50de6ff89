//! Console routes and the login guard in front of them

use gymdesk_client::{Session, SessionStore};
use gymdesk_core::{MemberId, Result};
use std::fmt;
use tracing::debug;

/// A screen of the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Credentials form
    Login,
    /// Landing screen after login
    Dashboard,
    /// Member list with filters
    Members,
    /// One member's profile and history
    MemberDetail(MemberId),
}

impl Route {
    /// Whether the route requires a stored session
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Path form, as used in navigation hints
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Members => "/members".to_string(),
            Self::MemberDetail(id) => format!("/members/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Result of checking a route against the session store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Route needs no session
    Open,
    /// Session present; proceed with it
    Granted(Session),
    /// No session; go here instead
    Redirect(Route),
}

/// Gate for protected routes
///
/// Only checks that a token exists. Its validity is up to the server.
#[derive(Debug, Clone)]
pub struct RouteGuard<S> {
    store: S,
}

impl<S: SessionStore> RouteGuard<S> {
    /// Guard backed by `store`
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Decide whether `route` may be entered
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub fn check(&self, route: &Route) -> Result<Access> {
        if !route.is_protected() {
            return Ok(Access::Open);
        }

        let access = match self.store.load()? {
            Some(session) => Access::Granted(session),
            None => Access::Redirect(Route::Login),
        };
        debug!(%route, granted = matches!(access, Access::Granted(_)), "route checked");
        Ok(access)
    }
}
