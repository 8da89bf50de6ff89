//! Login screen

use gymdesk_client::{Authenticator, SessionStore};
use gymdesk_core::Credentials;
use tracing::{error, info, warn};

use crate::notice::messages;
use crate::routes::Route;

/// Progress of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    /// Waiting for credentials
    Idle,
    /// Request in flight
    Submitting,
    /// Session stored
    Authenticated,
    /// Attempt failed; carries the message shown to the user
    Failed(String),
}

/// State of the login screen
#[derive(Debug)]
pub struct LoginView<A, S> {
    auth: A,
    store: S,
    state: LoginState,
}

impl<A: Authenticator, S: SessionStore> LoginView<A, S> {
    /// New login screen
    pub const fn new(auth: A, store: S) -> Self {
        Self {
            auth,
            store,
            state: LoginState::Idle,
        }
    }

    /// Current state
    pub const fn state(&self) -> &LoginState {
        &self.state
    }

    /// Skip the form when a session is already stored
    ///
    /// Returns the route to continue at, without contacting the server.
    /// An unreadable store counts as logged out.
    pub fn mount(&mut self) -> Option<Route> {
        match self.store.load() {
            Ok(Some(_)) => {
                self.state = LoginState::Authenticated;
                Some(Route::Dashboard)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "cannot read stored session");
                None
            }
        }
    }

    /// Log in and store the session
    ///
    /// Returns the route to continue at on success. Every failure ends in
    /// the same generic message.
    pub async fn submit(&mut self, credentials: &Credentials) -> Option<Route> {
        self.state = LoginState::Submitting;

        let outcome = match self.auth.login(credentials).await {
            Ok(session) => self.store.save(&session),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                info!(username = %credentials.username, "login succeeded");
                self.state = LoginState::Authenticated;
                Some(Route::Dashboard)
            }
            Err(e) => {
                error!(username = %credentials.username, error = %e, "login failed");
                self.state = LoginState::Failed(messages::LOGIN_FAILED.to_string());
                None
            }
        }
    }
}
