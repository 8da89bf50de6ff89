//! Core data types for gymdesk

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use validator::{Validate, ValidationError};

use crate::utils::{date_only, timestamp};
use crate::{Error, Result};

/// Stable external identifier of a member
///
/// The API is not consistent about whether it sends ids as strings or
/// numbers, so both are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create a member id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as it appears in request paths
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl FromStr for MemberId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("member_id", "must not be empty"));
        }
        Ok(Self::new(trimmed))
    }
}

impl<'de> Deserialize<'de> for MemberId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

/// Membership plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    /// One month
    Monthly,
    /// Three months
    Quarterly,
    /// Twelve months
    Yearly,
}

impl PlanType {
    /// All plans, in display order
    pub const ALL: [Self; 3] = [Self::Monthly, Self::Quarterly, Self::Yearly];

    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|plan| plan.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(
                    "plan_type",
                    format!("unknown plan '{s}', expected Monthly, Quarterly or Yearly"),
                )
            })
    }
}

/// Membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    /// Membership currently valid
    Active,
    /// Membership ran out
    Expired,
}

impl MemberStatus {
    /// All statuses, in display order
    pub const ALL: [Self; 2] = [Self::Active, Self::Expired];

    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(
                    "status",
                    format!("unknown status '{s}', expected Active or Expired"),
                )
            })
    }
}

/// A gym member as returned by the listing and detail endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// External identifier
    pub member_id: MemberId,

    /// Full name
    pub name: String,

    /// Phone number
    pub phone: String,

    /// Email address, if known
    #[serde(default)]
    pub email: Option<String>,

    /// Current plan
    pub plan_type: PlanType,

    /// Current status
    pub status: MemberStatus,

    /// Start of the current membership
    #[serde(with = "date_only")]
    pub start_date: NaiveDate,

    /// End of the current membership
    #[serde(with = "date_only")]
    pub end_date: NaiveDate,
}

impl Member {
    /// Email for display, `None` when missing or blank
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// One past or current plan of a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipHistoryEntry {
    /// Plan of this period
    pub plan_type: PlanType,

    /// Period start
    #[serde(with = "date_only")]
    pub start_date: NaiveDate,

    /// Period end
    #[serde(with = "date_only")]
    pub end_date: NaiveDate,

    /// Status of this period
    pub status: MemberStatus,
}

/// A single gym check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// When the member checked in
    #[serde(with = "timestamp")]
    pub check_time: DateTime<Utc>,
}

/// Body of `GET /members/{id}/details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetails {
    /// The member, absent when the id is unknown
    #[serde(default)]
    pub member: Option<Member>,

    /// Plan history, newest first as delivered
    #[serde(default)]
    pub membership_history: Vec<MembershipHistoryEntry>,

    /// Check-ins, as delivered
    #[serde(default)]
    pub attendance_history: Vec<AttendanceRecord>,
}

/// Filter state for the member listing
///
/// Unset fields impose no constraint. An empty search string is treated as
/// unset, never as "match the empty string".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFilter {
    /// Substring of the member name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Exact status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,

    /// Exact plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<PlanType>,
}

impl MemberFilter {
    /// Filter with no constraints
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain by name substring; blank text clears the constraint
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = normalize_search(search.into());
        self
    }

    /// Constrain by status
    #[must_use]
    pub const fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Constrain by plan
    #[must_use]
    pub const fn with_plan_type(mut self, plan_type: PlanType) -> Self {
        self.plan_type = Some(plan_type);
        self
    }

    /// Query parameters for `GET /members`, one per set field
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(plan_type) = self.plan_type {
            pairs.push(("plan_type", plan_type.as_str().to_string()));
        }
        pairs
    }

    /// Whether a member satisfies every set constraint
    ///
    /// Mirrors the server: case-insensitive substring match on the name,
    /// exact match on status and plan.
    #[must_use]
    pub fn matches(&self, member: &Member) -> bool {
        let name_ok = self.search.as_deref().is_none_or(|needle| {
            member.name.to_lowercase().contains(&needle.to_lowercase())
        });
        let status_ok = self.status.is_none_or(|s| s == member.status);
        let plan_ok = self.plan_type.is_none_or(|p| p == member.plan_type);
        name_ok && status_ok && plan_ok
    }
}

/// Map blank search text to `None`; anything else is kept as typed
#[must_use]
pub fn normalize_search(search: String) -> Option<String> {
    if search.trim().is_empty() {
        None
    } else {
        Some(search)
    }
}

/// Body of `PUT /members/update/{id}`
///
/// Always carries every editable field; the server replaces them as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MemberUpdate {
    /// Full name
    #[validate(custom(function = "not_blank", message = "name must not be empty"))]
    pub name: String,

    /// Phone number
    #[validate(custom(function = "not_blank", message = "phone must not be empty"))]
    pub phone: String,

    /// Email address, empty when unknown
    pub email: String,

    /// Plan
    pub plan_type: PlanType,

    /// Membership start
    #[serde(with = "date_only")]
    pub start_date: NaiveDate,

    /// Membership end
    #[serde(with = "date_only")]
    pub end_date: NaiveDate,
}

impl MemberUpdate {
    /// Check the update before it is sent
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for blank name or phone, or when
    /// `end_date` is before `start_date`.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.end_date < self.start_date {
            return Err(Error::validation(
                "end_date",
                format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            ));
        }
        Ok(())
    }
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl From<&Member> for MemberUpdate {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            phone: member.phone.clone(),
            email: member.email.clone().unwrap_or_default(),
            plan_type: member.plan_type,
            start_date: member.start_date,
            end_date: member.end_date,
        }
    }
}

/// Body of `POST /members/{id}/renew`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewRequest {
    /// New membership end date
    #[serde(with = "date_only")]
    pub new_end_date: NaiveDate,
}

/// Body of `POST /auth/login`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Admin user name
    pub username: String,
    /// Admin password
    pub password: String,
}

impl Credentials {
    /// Bundle a username and password
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful response of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token
    pub token: String,
}
