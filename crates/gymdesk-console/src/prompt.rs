//! Interactive prompts
//!
//! Views ask for confirmation through [`Confirm`] so they can be driven by a
//! terminal, a `--yes` flag or a test with the same code path.

use gymdesk_core::{Error, Result};
use inquire::InquireError;

/// Yes/no question put to the operator
pub trait Confirm {
    /// Ask `question`; `true` means go ahead
    ///
    /// # Errors
    ///
    /// Returns an error if the question cannot be asked at all.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Asks on the terminal; Esc or Ctrl+C count as "no"
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        match inquire::Confirm::new(question).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(prompt_error(e)),
        }
    }
}

/// Always gives the same answer without asking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl FixedAnswer {
    /// Accept everything
    pub const YES: Self = Self(true);
    /// Decline everything
    pub const NO: Self = Self(false);
}

impl Confirm for FixedAnswer {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}

impl<T: Confirm + ?Sized> Confirm for &T {
    fn confirm(&self, question: &str) -> Result<bool> {
        (**self).confirm(question)
    }
}

/// Read a password without echoing it
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or the prompt is cancelled.
pub fn read_password() -> Result<String> {
    inquire::Password::new("Password:")
        .without_confirmation()
        .prompt()
        .map_err(prompt_error)
}

fn prompt_error(e: InquireError) -> Error {
    match e {
        InquireError::IO(io) => Error::Io(io),
        other => Error::Io(std::io::Error::other(other.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_answers() {
        assert!(FixedAnswer::YES.confirm("Delete this member?").unwrap());
        assert!(!FixedAnswer::NO.confirm("Delete this member?").unwrap());
        assert!((&FixedAnswer::YES).confirm("?").unwrap());
    }
}
