//! Command handlers behind the `gymdesk` binary
//!
//! Each handler drives one view through a complete flow and returns a
//! [`Report`] instead of printing, so the flows run the same against the HTTP
//! client and the in-memory backend.

use chrono::NaiveDate;
use gymdesk_client::{Authenticator, MemberMutation, MemberQuery, SessionStore};
use gymdesk_core::utils::parse_optional_date;
use gymdesk_core::{Credentials, MemberFilter, MemberId, MemberUpdate, PlanType, Result};
use std::fmt::Write;
use std::sync::Arc;
use tracing::warn;

use crate::notice::Notice;
use crate::prompt::Confirm;
use crate::render::Render;
use crate::routes::Route;
use crate::views::{
    DetailState, FetchState, LoginState, LoginView, MemberDetailView, MemberListView,
};

/// Outcome of a command: text for stdout and whether it succeeded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Text to print
    pub text: String,
    /// `false` makes the binary exit non-zero
    pub success: bool,
}

impl Report {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }

    /// Build a report from view notices; any error notice marks failure
    fn from_notices(notices: &[Notice]) -> Self {
        Self {
            text: notices.iter().map(Notice::render).collect(),
            success: !notices.iter().any(Notice::is_error),
        }
    }

    fn push_line(&mut self, line: impl AsRef<str>) {
        let _ = writeln!(self.text, "{}", line.as_ref());
    }
}

/// Field changes for `members update`; unset fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberChanges {
    /// New name
    pub name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New email, empty to clear
    pub email: Option<String>,
    /// New plan
    pub plan_type: Option<PlanType>,
    /// New start date
    pub start_date: Option<NaiveDate>,
    /// New end date
    pub end_date: Option<NaiveDate>,
}

impl MemberChanges {
    /// Whether no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.plan_type.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Write the set fields into an edit form
    pub fn apply_to(&self, fields: &mut MemberUpdate) {
        if let Some(name) = &self.name {
            fields.name.clone_from(name);
        }
        if let Some(phone) = &self.phone {
            fields.phone.clone_from(phone);
        }
        if let Some(email) = &self.email {
            fields.email.clone_from(email);
        }
        if let Some(plan_type) = self.plan_type {
            fields.plan_type = plan_type;
        }
        if let Some(start_date) = self.start_date {
            fields.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            fields.end_date = end_date;
        }
    }
}

fn not_found(member_id: &MemberId) -> Report {
    Report::failed(format!(
        "Member {member_id} not found.\nBack: {}\n",
        Route::Members
    ))
}

/// Mount the list view, or report why it cannot be shown
async fn mounted_list<B>(
    backend: &Arc<B>,
    filter: MemberFilter,
) -> std::result::Result<MemberListView<Arc<B>, Arc<B>>, Report>
where
    B: MemberQuery + MemberMutation + ?Sized,
{
    let mut view =
        MemberListView::new(Arc::clone(backend), Arc::clone(backend)).with_filter(filter);
    view.mount().await;

    if let FetchState::Errored(message) = view.state() {
        return Err(Report::failed(format!("{message}\n")));
    }
    Ok(view)
}

/// Report the notices of a finished mutation, plus a failed reload
fn mutation_report<Q, M>(view: &mut MemberListView<Q, M>) -> Report
where
    Q: MemberQuery,
    M: MemberMutation,
{
    let mut report = Report::from_notices(&view.take_notices());
    if let FetchState::Errored(message) = view.state() {
        report.push_line(message);
        report.success = false;
    }
    report
}

/// `members list`
pub async fn list_members<B>(backend: &Arc<B>, filter: MemberFilter) -> Report
where
    B: MemberQuery + MemberMutation + ?Sized,
{
    match mounted_list(backend, filter).await {
        Ok(view) => Report::ok(view.rows().render()),
        Err(report) => report,
    }
}

/// `members show`
pub async fn show_member<Q>(query: &Arc<Q>, member_id: MemberId) -> Report
where
    Q: MemberQuery + ?Sized,
{
    let mut view = MemberDetailView::new(Arc::clone(query), member_id);
    view.mount().await;

    match view.state() {
        DetailState::Loaded(details) => {
            let mut report = Report::ok(details.render());
            report.push_line(format!(
                "\nBack: {}",
                MemberDetailView::<Arc<Q>>::back_route()
            ));
            report
        }
        DetailState::NotFound => not_found(view.member_id()),
        DetailState::Errored(message) => Report::failed(format!(
            "{message}\nBack: {}\nRetry: gymdesk members show {}\n",
            MemberDetailView::<Arc<Q>>::back_route(),
            view.member_id()
        )),
        DetailState::Loading => Report::failed("Still loading\n"),
    }
}

/// `members update`
pub async fn update_member<B>(
    backend: &Arc<B>,
    member_id: &MemberId,
    changes: &MemberChanges,
) -> Report
where
    B: MemberQuery + MemberMutation + ?Sized,
{
    if changes.is_empty() {
        return Report::failed("Nothing to update\n");
    }

    let mut view = match mounted_list(backend, MemberFilter::new()).await {
        Ok(view) => view,
        Err(report) => return report,
    };
    if view.open_edit(member_id).is_err() {
        return not_found(member_id);
    }
    if let Some(fields) = view.edit_form_mut() {
        changes.apply_to(fields);
    }

    view.save_edit().await;
    mutation_report(&mut view)
}

/// `members renew`
///
/// `end_date` of `None` keeps the pre-filled current end date; an empty
/// string clears it.
pub async fn renew_member<B>(
    backend: &Arc<B>,
    member_id: &MemberId,
    end_date: Option<&str>,
) -> Report
where
    B: MemberQuery + MemberMutation + ?Sized,
{
    let mut view = match mounted_list(backend, MemberFilter::new()).await {
        Ok(view) => view,
        Err(report) => return report,
    };
    if view.open_renew(member_id).is_err() {
        return not_found(member_id);
    }

    if let Some(raw) = end_date {
        match parse_optional_date(raw) {
            Ok(date) => view.set_renew_date(date),
            Err(e) => return Report::failed(format!("{e}\n")),
        }
    }

    view.confirm_renew().await;
    mutation_report(&mut view)
}

/// `members delete`
pub async fn delete_member<B>(
    backend: &Arc<B>,
    member_id: &MemberId,
    confirm: &impl Confirm,
) -> Report
where
    B: MemberQuery + MemberMutation + ?Sized,
{
    let mut view = MemberListView::new(Arc::clone(backend), Arc::clone(backend));
    let deleted = view.delete_member(member_id, confirm).await;
    let mut report = Report::from_notices(&view.take_notices());

    if deleted {
        report.push_line(format!("Member {member_id} deleted"));
        if let FetchState::Errored(message) = view.state() {
            report.push_line(message);
            report.success = false;
        }
    } else if report.success {
        report.push_line("Cancelled");
    }
    report
}

/// `login`
pub async fn login<A, S>(auth: A, store: S, credentials: &Credentials) -> Report
where
    A: Authenticator,
    S: SessionStore,
{
    let mut view = LoginView::new(auth, store);
    if let Some(route) = view.mount() {
        return Report::ok(format!("Already logged in. Continue at {route}\n"));
    }

    match view.submit(credentials).await {
        Some(route) => Report::ok(format!(
            "Logged in as {}. Continue at {route}\n",
            credentials.username
        )),
        None => match view.state() {
            LoginState::Failed(message) => Report::failed(format!("{message}\n")),
            state => {
                warn!(?state, "login ended without a result");
                Report::failed("Login did not complete\n")
            }
        },
    }
}

/// `logout`
///
/// # Errors
///
/// Returns an error if the stored session cannot be removed.
pub fn logout<S: SessionStore>(store: &S) -> Result<Report> {
    store.clear()?;
    Ok(Report::ok("Logged out\n"))
}
