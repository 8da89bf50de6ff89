//! Typed client for the gym membership API
//!
//! [`ApiClient`] speaks HTTP to the membership server. The views in
//! `gymdesk-console` only depend on the [`MemberQuery`], [`MemberMutation`]
//! and [`Authenticator`] traits; [`mock::InMemoryBackend`] implements the same
//! traits without a network.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod client;
pub mod mock;
pub mod service;
pub mod session;

pub use client::ApiClient;
pub use service::{Authenticator, MemberMutation, MemberQuery};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
