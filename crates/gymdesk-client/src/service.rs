//! Service traits between the console views and the membership backend
//!
//! The views only see these traits, so the HTTP client and the in-memory
//! backend are interchangeable.

use async_trait::async_trait;
use chrono::NaiveDate;
use gymdesk_core::{
    Credentials, Member, MemberDetails, MemberFilter, MemberId, MemberUpdate, Result,
};
use std::sync::Arc;

use crate::session::Session;

/// Read side: member listing and member details
#[async_trait]
pub trait MemberQuery: Send + Sync {
    /// List members matching every set field of `filter`, in store order
    ///
    /// Fails with `MalformedResponse` when the backend does not answer with
    /// a sequence of members.
    async fn list_members(&self, filter: &MemberFilter) -> Result<Vec<Member>>;

    /// Fetch one member with history, `None` when the member does not exist
    async fn member_details(&self, member_id: &MemberId) -> Result<Option<MemberDetails>>;
}

/// Write side: update, delete and renew
///
/// None of these take a version or precondition; concurrent edits elsewhere
/// are silently overwritten.
#[async_trait]
pub trait MemberMutation: Send + Sync {
    /// Replace all editable fields of a member
    async fn update_member(&self, member_id: &MemberId, update: &MemberUpdate) -> Result<()>;

    /// Remove a member permanently
    async fn delete_member(&self, member_id: &MemberId) -> Result<()>;

    /// Set a new membership end date
    async fn renew_member(&self, member_id: &MemberId, new_end_date: NaiveDate) -> Result<()>;
}

/// Exchanges admin credentials for a session
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Log in and return the new session
    async fn login(&self, credentials: &Credentials) -> Result<Session>;
}

#[async_trait]
impl<T: MemberQuery + ?Sized> MemberQuery for Arc<T> {
    async fn list_members(&self, filter: &MemberFilter) -> Result<Vec<Member>> {
        (**self).list_members(filter).await
    }

    async fn member_details(&self, member_id: &MemberId) -> Result<Option<MemberDetails>> {
        (**self).member_details(member_id).await
    }
}

#[async_trait]
impl<T: MemberMutation + ?Sized> MemberMutation for Arc<T> {
    async fn update_member(&self, member_id: &MemberId, update: &MemberUpdate) -> Result<()> {
        (**self).update_member(member_id, update).await
    }

    async fn delete_member(&self, member_id: &MemberId) -> Result<()> {
        (**self).delete_member(member_id).await
    }

    async fn renew_member(&self, member_id: &MemberId, new_end_date: NaiveDate) -> Result<()> {
        (**self).renew_member(member_id, new_end_date).await
    }
}

#[async_trait]
impl<T: Authenticator + ?Sized> Authenticator for Arc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        (**self).login(credentials).await
    }
}
