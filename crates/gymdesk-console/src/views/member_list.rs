//! Member list: filters, table and the edit/renew/delete flows

use chrono::NaiveDate;
use gymdesk_client::{MemberMutation, MemberQuery};
use gymdesk_core::types::normalize_search;
use gymdesk_core::{
    Error, Member, MemberFilter, MemberId, MemberStatus, MemberUpdate, PlanType, Result,
};
use tracing::{debug, error, info, warn};

use super::FetchState;
use crate::notice::{Notice, messages};
use crate::prompt::Confirm;

/// Edit form, pre-filled from the member row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    /// Member being edited
    pub member_id: MemberId,
    /// Every editable field; sent as a whole on save
    pub fields: MemberUpdate,
}

/// Renew form, pre-filled with the current end date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewForm {
    /// Member being renewed
    pub member_id: MemberId,
    /// Start of the current membership, lower bound for the new end date
    pub start_date: NaiveDate,
    /// Chosen end date, `None` when cleared
    pub new_end_date: Option<NaiveDate>,
}

/// At most one open dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    /// Nothing open
    #[default]
    None,
    /// Edit dialog
    Editing(EditForm),
    /// Renew dialog
    Renewing(RenewForm),
}

/// State and behavior of the member list screen
///
/// The search box is two-phase: typing only changes [`Self::search_input`],
/// [`Self::apply_search`] commits it. Status and plan filters apply at once.
#[derive(Debug)]
pub struct MemberListView<Q, M> {
    query: Q,
    mutation: M,
    filter: MemberFilter,
    search_input: String,
    state: FetchState<Vec<Member>>,
    modal: Modal,
    notices: Vec<Notice>,
}

impl<Q: MemberQuery, M: MemberMutation> MemberListView<Q, M> {
    /// New view with no filters applied; nothing is fetched until [`Self::mount`]
    pub fn new(query: Q, mutation: M) -> Self {
        Self {
            query,
            mutation,
            filter: MemberFilter::default(),
            search_input: String::new(),
            state: FetchState::Loading,
            modal: Modal::None,
            notices: Vec::new(),
        }
    }

    /// Start with `filter` already applied
    #[must_use]
    pub fn with_filter(mut self, filter: MemberFilter) -> Self {
        self.search_input = filter.search.clone().unwrap_or_default();
        self.filter = filter;
        self
    }

    /// Fetch state of the table
    pub const fn state(&self) -> &FetchState<Vec<Member>> {
        &self.state
    }

    /// Loaded rows, empty while loading or after an error
    pub fn rows(&self) -> &[Member] {
        self.state.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    /// Applied filter
    pub const fn filter(&self) -> &MemberFilter {
        &self.filter
    }

    /// Uncommitted search text
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Open dialog
    pub const fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Initial load
    pub async fn mount(&mut self) {
        self.fetch().await;
    }

    /// Load the table again with the applied filter
    pub async fn reload(&mut self) {
        self.fetch().await;
    }

    async fn fetch(&mut self) {
        self.state = FetchState::Loading;
        debug!(filter = ?self.filter, "loading members");

        self.state = match self.query.list_members(&self.filter).await {
            Ok(rows) => {
                debug!(count = rows.len(), "members loaded");
                FetchState::Loaded(rows)
            }
            Err(e) if e.is_malformed() => {
                error!(error = %e, "invalid members response");
                FetchState::Loaded(Vec::new())
            }
            Err(e) => {
                error!(error = %e, "failed to load members");
                FetchState::Errored(messages::LOAD_MEMBERS_FAILED.to_string())
            }
        };
    }

    /// Edit the search box; never fetches
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
    }

    /// Commit the search box, fetching only if the applied search changed
    pub async fn apply_search(&mut self) {
        let search = normalize_search(self.search_input.clone());
        if search == self.filter.search {
            debug!("search unchanged");
            return;
        }
        self.filter.search = search;
        self.fetch().await;
    }

    /// Change the status filter, fetching if it changed
    pub async fn set_status_filter(&mut self, status: Option<MemberStatus>) {
        if self.filter.status == status {
            return;
        }
        self.filter.status = status;
        self.fetch().await;
    }

    /// Change the plan filter, fetching if it changed
    pub async fn set_plan_filter(&mut self, plan_type: Option<PlanType>) {
        if self.filter.plan_type == plan_type {
            return;
        }
        self.filter.plan_type = plan_type;
        self.fetch().await;
    }

    fn row(&self, member_id: &MemberId) -> Result<&Member> {
        self.rows()
            .iter()
            .find(|m| &m.member_id == member_id)
            .ok_or_else(|| Error::NotFound {
                resource: format!("member {member_id}"),
            })
    }

    /// Open the edit dialog for a loaded row
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the member is not among the loaded rows.
    pub fn open_edit(&mut self, member_id: &MemberId) -> Result<()> {
        let fields = MemberUpdate::from(self.row(member_id)?);
        self.modal = Modal::Editing(EditForm {
            member_id: member_id.clone(),
            fields,
        });
        Ok(())
    }

    /// Fields of the open edit dialog
    pub fn edit_form_mut(&mut self) -> Option<&mut MemberUpdate> {
        match &mut self.modal {
            Modal::Editing(form) => Some(&mut form.fields),
            _ => None,
        }
    }

    /// Send the edit dialog
    ///
    /// On success the dialog closes and the table reloads. On failure the
    /// dialog and the rows stay as they were.
    pub async fn save_edit(&mut self) {
        let Modal::Editing(form) = &self.modal else {
            debug!("save_edit without an open edit dialog");
            return;
        };
        let EditForm { member_id, fields } = form.clone();

        let result = match fields.check() {
            Ok(()) => self.mutation.update_member(&member_id, &fields).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(%member_id, "member updated");
                self.notices.push(Notice::success(messages::UPDATE_OK));
                self.modal = Modal::None;
                self.fetch().await;
            }
            Err(e) => {
                warn!(%member_id, error = %e, "update failed");
                self.notices.push(Notice::error(messages::UPDATE_FAILED));
            }
        }
    }

    /// Close any dialog without sending anything
    pub fn cancel_modal(&mut self) {
        self.modal = Modal::None;
    }

    /// Open the renew dialog for a loaded row
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the member is not among the loaded rows.
    pub fn open_renew(&mut self, member_id: &MemberId) -> Result<()> {
        let member = self.row(member_id)?;
        self.modal = Modal::Renewing(RenewForm {
            member_id: member_id.clone(),
            start_date: member.start_date,
            new_end_date: Some(member.end_date),
        });
        Ok(())
    }

    /// Pick or clear the date in the renew dialog
    pub fn set_renew_date(&mut self, new_end_date: Option<NaiveDate>) {
        if let Modal::Renewing(form) = &mut self.modal {
            form.new_end_date = new_end_date;
        }
    }

    /// Send the renew dialog
    pub async fn confirm_renew(&mut self) {
        let Modal::Renewing(form) = &self.modal else {
            debug!("confirm_renew without an open renew dialog");
            return;
        };
        let RenewForm {
            member_id,
            start_date,
            new_end_date,
        } = form.clone();

        let Some(new_end_date) = new_end_date else {
            self.notices.push(Notice::error(messages::RENEW_NEEDS_DATE));
            return;
        };

        if new_end_date < start_date {
            warn!(%member_id, %new_end_date, %start_date, "renewal ends before membership start");
            self.notices.push(Notice::error(messages::RENEW_FAILED));
            return;
        }

        match self.mutation.renew_member(&member_id, new_end_date).await {
            Ok(()) => {
                info!(%member_id, %new_end_date, "membership renewed");
                self.notices.push(Notice::success(messages::RENEW_OK));
                self.modal = Modal::None;
                self.fetch().await;
            }
            Err(e) => {
                warn!(%member_id, error = %e, "renewal failed");
                self.notices.push(Notice::error(messages::RENEW_FAILED));
            }
        }
    }

    /// Delete a member after asking `confirm`
    ///
    /// A declined or failed prompt sends nothing. Returns whether the member
    /// was deleted.
    pub async fn delete_member(&mut self, member_id: &MemberId, confirm: &impl Confirm) -> bool {
        match confirm.confirm(messages::DELETE_PROMPT) {
            Ok(true) => {}
            Ok(false) => {
                debug!(%member_id, "delete declined");
                return false;
            }
            Err(e) => {
                warn!(%member_id, error = %e, "delete confirmation failed");
                return false;
            }
        }

        match self.mutation.delete_member(member_id).await {
            Ok(()) => {
                info!(%member_id, "member deleted");
                self.fetch().await;
                true
            }
            Err(e) => {
                warn!(%member_id, error = %e, "delete failed");
                self.notices.push(Notice::error(messages::DELETE_FAILED));
                false
            }
        }
    }
}
