//! View state machines
//!
//! Each view owns its state and is driven through `&mut self`, so at most
//! one request per view is in flight and results always land in order.

pub mod login;
pub mod member_detail;
pub mod member_list;

pub use login::{LoginState, LoginView};
pub use member_detail::{DetailAction, DetailState, MemberDetailView};
pub use member_list::{EditForm, MemberListView, Modal, RenewForm};

/// Progress of a fetch that backs a whole view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Request in flight
    Loading,
    /// Data arrived
    Loaded(T),
    /// Request failed; carries the message shown instead of the data
    Errored(String),
}

impl<T> FetchState<T> {
    /// Whether a request is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded data, if any
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Error message, if the fetch failed
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Errored(message) => Some(message),
            _ => None,
        }
    }
}
