//! Core types and utilities for the gymdesk membership console
//!
//! Holds the member data model exchanged with the gym API, the shared error
//! type, configuration loading and logging setup.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use types::{
    AttendanceRecord, Credentials, LoginResponse, Member, MemberDetails, MemberFilter, MemberId,
    MemberStatus, MemberUpdate, MembershipHistoryEntry, PlanType, RenewRequest,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level`. `format` is either `json` or
/// anything else for human readable output.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|e| Error::configuration(format!("logging already initialized: {e}")))
}
