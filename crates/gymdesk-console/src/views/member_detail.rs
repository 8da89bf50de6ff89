//! Read-only member profile with membership and attendance history

use gymdesk_client::MemberQuery;
use gymdesk_core::{MemberDetails, MemberId};
use tracing::{debug, error};

use crate::notice::messages;
use crate::routes::Route;

/// Progress of the detail fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// Request in flight
    Loading,
    /// Details arrived; `member` is always present
    Loaded(Box<MemberDetails>),
    /// Request failed
    Errored(String),
    /// No such member, or the answer was unusable
    NotFound,
}

/// What the operator can do from the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    /// Navigate away
    Back(Route),
    /// Fetch again
    Reload,
}

/// State of the member detail screen
#[derive(Debug)]
pub struct MemberDetailView<Q> {
    query: Q,
    member_id: MemberId,
    state: DetailState,
}

impl<Q: MemberQuery> MemberDetailView<Q> {
    /// View for one member; nothing is fetched until [`Self::mount`]
    pub const fn new(query: Q, member_id: MemberId) -> Self {
        Self {
            query,
            member_id,
            state: DetailState::Loading,
        }
    }

    /// Member shown by this view
    pub const fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    /// Current state
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// Where "back" leads
    pub const fn back_route() -> Route {
        Route::Members
    }

    /// Actions offered in the current state
    pub fn actions(&self) -> Vec<DetailAction> {
        match self.state {
            DetailState::Loading => Vec::new(),
            DetailState::Loaded(_) | DetailState::NotFound => {
                vec![DetailAction::Back(Self::back_route())]
            }
            DetailState::Errored(_) => {
                vec![DetailAction::Back(Self::back_route()), DetailAction::Reload]
            }
        }
    }

    /// Initial load
    pub async fn mount(&mut self) {
        self.fetch().await;
    }

    /// Fetch again after an error
    pub async fn reload(&mut self) {
        self.fetch().await;
    }

    async fn fetch(&mut self) {
        self.state = DetailState::Loading;
        debug!(member_id = %self.member_id, "loading member details");

        self.state = match self.query.member_details(&self.member_id).await {
            Ok(Some(details)) if details.member.is_some() => DetailState::Loaded(Box::new(details)),
            Ok(_) => DetailState::NotFound,
            Err(e) if e.is_malformed() => {
                error!(member_id = %self.member_id, error = %e, "invalid member details response");
                DetailState::NotFound
            }
            Err(e) => {
                error!(member_id = %self.member_id, error = %e, "failed to load member details");
                DetailState::Errored(messages::LOAD_DETAILS_FAILED.to_string())
            }
        };
    }
}
