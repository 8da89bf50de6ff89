//! Transient user-facing messages raised by the views

use std::fmt;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// An operation went through
    Success,
    /// An operation failed; the cause is only logged
    Error,
}

/// A one-shot message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,
    /// Text shown to the user
    pub message: String,
}

impl Notice {
    /// Successful operation
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Failed operation
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Whether this notice reports a failure
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Error)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Fixed notice texts
pub mod messages {
    /// Member list could not be fetched
    pub const LOAD_MEMBERS_FAILED: &str = "Failed to load members. Please try again.";
    /// Member details could not be fetched
    pub const LOAD_DETAILS_FAILED: &str = "Failed to load member details. Please try again.";
    /// Update went through
    pub const UPDATE_OK: &str = "Member updated successfully";
    /// Update was rejected or never sent
    pub const UPDATE_FAILED: &str = "Update failed";
    /// Renew confirmed without a date
    pub const RENEW_NEEDS_DATE: &str = "Select new end date";
    /// Renew went through
    pub const RENEW_OK: &str = "Membership renewed";
    /// Renew was rejected or never sent
    pub const RENEW_FAILED: &str = "Renewal failed";
    /// Delete confirmation question
    pub const DELETE_PROMPT: &str = "Delete this member?";
    /// Delete was rejected
    pub const DELETE_FAILED: &str = "Delete failed";
    /// Any login failure
    pub const LOGIN_FAILED: &str = "Invalid username or password. Please try again.";
}
