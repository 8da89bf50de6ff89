//! In-memory membership backend for testing
//!
//! Applies the same filter semantics as the server and records every call,
//! so view logic can be exercised without a network.

use async_trait::async_trait;
use chrono::NaiveDate;
use gymdesk_core::{
    AttendanceRecord, Credentials, Error, Member, MemberDetails, MemberFilter, MemberId,
    MemberStatus, MemberUpdate, MembershipHistoryEntry, Result,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use crate::service::{Authenticator, MemberMutation, MemberQuery};
use crate::session::Session;

/// Backend operation, used for failure injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `list_members`
    List,
    /// `member_details`
    Details,
    /// `update_member`
    Update,
    /// `delete_member`
    Delete,
    /// `renew_member`
    Renew,
    /// `login`
    Login,
}

/// How an injected failure surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Server answered 500
    Server,
    /// Request never got an answer
    Network,
    /// Server answered with a body of the wrong shape
    Malformed,
}

/// A call as seen by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `list_members`
    List(MemberFilter),
    /// `member_details`
    Details(MemberId),
    /// `update_member`
    Update(MemberId, MemberUpdate),
    /// `delete_member`
    Delete(MemberId),
    /// `renew_member`
    Renew(MemberId, NaiveDate),
    /// `login`, with the username only
    Login(String),
}

impl Call {
    /// Operation this call belongs to
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::List(_) => Operation::List,
            Self::Details(_) => Operation::Details,
            Self::Update(..) => Operation::Update,
            Self::Delete(_) => Operation::Delete,
            Self::Renew(..) => Operation::Renew,
            Self::Login(_) => Operation::Login,
        }
    }
}

#[derive(Debug, Default)]
struct History {
    membership: Vec<MembershipHistoryEntry>,
    attendance: Vec<AttendanceRecord>,
}

/// In-memory backend implementing every service trait
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    members: Mutex<Vec<Member>>,
    history: Mutex<HashMap<MemberId, History>>,
    users: Mutex<HashMap<String, (String, String)>>,
    failures: Mutex<HashMap<Operation, FailureKind>>,
    calls: Mutex<Vec<Call>>,
}

impl InMemoryBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed members, kept in the given order
    #[must_use]
    pub fn with_members(self, members: impl IntoIterator<Item = Member>) -> Self {
        self.members.lock().extend(members);
        self
    }

    /// Seed membership and attendance history for a member
    #[must_use]
    pub fn with_history(
        self,
        member_id: &MemberId,
        membership: Vec<MembershipHistoryEntry>,
        attendance: Vec<AttendanceRecord>,
    ) -> Self {
        self.history.lock().insert(
            member_id.clone(),
            History {
                membership,
                attendance,
            },
        );
        self
    }

    /// Register an admin account
    #[must_use]
    pub fn with_user(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.users
            .lock()
            .insert(username.into(), (password.into(), token.into()));
        self
    }

    /// Make an operation fail until [`Self::recover`] is called
    pub fn fail(&self, operation: Operation, kind: FailureKind) {
        self.failures.lock().insert(operation, kind);
    }

    /// Stop failing an operation
    pub fn recover(&self, operation: Operation) {
        self.failures.lock().remove(&operation);
    }

    /// Operations currently set to fail
    #[must_use]
    pub fn failing(&self) -> HashSet<Operation> {
        self.failures.lock().keys().copied().collect()
    }

    /// Current member rows
    #[must_use]
    pub fn members(&self) -> Vec<Member> {
        self.members.lock().clone()
    }

    /// Look up a member by id
    #[must_use]
    pub fn member(&self, member_id: &MemberId) -> Option<Member> {
        self.members
            .lock()
            .iter()
            .find(|m| &m.member_id == member_id)
            .cloned()
    }

    /// Every call received so far
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Number of calls received for one operation
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    fn record(&self, call: Call) -> Result<()> {
        let operation = call.operation();
        self.calls.lock().push(call);

        match self.failures.lock().get(&operation) {
            None => Ok(()),
            Some(FailureKind::Server) => Err(Error::Status {
                status: 500,
                endpoint: format!("{operation:?}"),
            }),
            Some(FailureKind::Network) => Err(Error::http("connection refused")),
            Some(FailureKind::Malformed) => Err(Error::malformed(
                format!("{operation:?}"),
                "unexpected response shape",
            )),
        }
    }

    fn not_found(member_id: &MemberId) -> Error {
        Error::Status {
            status: 404,
            endpoint: format!("/members/{member_id}"),
        }
    }

    fn with_member_mut<F>(&self, member_id: &MemberId, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Member),
    {
        let mut members = self.members.lock();
        let member = members
            .iter_mut()
            .find(|m| &m.member_id == member_id)
            .ok_or_else(|| Self::not_found(member_id))?;
        apply(member);
        Ok(())
    }
}

#[async_trait]
impl MemberQuery for InMemoryBackend {
    async fn list_members(&self, filter: &MemberFilter) -> Result<Vec<Member>> {
        self.record(Call::List(filter.clone()))?;
        Ok(self
            .members
            .lock()
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }

    async fn member_details(&self, member_id: &MemberId) -> Result<Option<MemberDetails>> {
        self.record(Call::Details(member_id.clone()))?;

        let Some(member) = self.member(member_id) else {
            return Ok(None);
        };
        let history = self.history.lock();
        let (membership_history, attendance_history) = history
            .get(member_id)
            .map(|h| (h.membership.clone(), h.attendance.clone()))
            .unwrap_or_default();

        Ok(Some(MemberDetails {
            member: Some(member),
            membership_history,
            attendance_history,
        }))
    }
}

#[async_trait]
impl MemberMutation for InMemoryBackend {
    async fn update_member(&self, member_id: &MemberId, update: &MemberUpdate) -> Result<()> {
        self.record(Call::Update(member_id.clone(), update.clone()))?;
        update.check()?;

        self.with_member_mut(member_id, |member| {
            member.name.clone_from(&update.name);
            member.phone.clone_from(&update.phone);
            member.email = Some(update.email.clone()).filter(|e| !e.is_empty());
            member.plan_type = update.plan_type;
            member.start_date = update.start_date;
            member.end_date = update.end_date;
        })
    }

    async fn delete_member(&self, member_id: &MemberId) -> Result<()> {
        self.record(Call::Delete(member_id.clone()))?;

        let mut members = self.members.lock();
        let before = members.len();
        members.retain(|m| &m.member_id != member_id);
        if members.len() == before {
            return Err(Self::not_found(member_id));
        }
        drop(members);

        self.history.lock().remove(member_id);
        Ok(())
    }

    async fn renew_member(&self, member_id: &MemberId, new_end_date: NaiveDate) -> Result<()> {
        self.record(Call::Renew(member_id.clone(), new_end_date))?;

        self.with_member_mut(member_id, |member| {
            member.end_date = new_end_date;
            member.status = MemberStatus::Active;
        })
    }
}

#[async_trait]
impl Authenticator for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.record(Call::Login(credentials.username.clone()))?;

        let users = self.users.lock();
        match users.get(&credentials.username) {
            Some((password, token)) if password == &credentials.password => {
                Session::new(token.clone())
            }
            _ => Err(Error::Authentication("invalid credentials".to_string())),
        }
    }
}
