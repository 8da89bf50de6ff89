//! Terminal admin console for gym membership records
//!
//! The screens are state machines in [`views`], driven by the handlers in
//! [`commands`] and rendered as text by [`render`]. They talk to the backend
//! only through the service traits of `gymdesk-client`.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod commands;
pub mod notice;
pub mod prompt;
pub mod render;
pub mod routes;
pub mod views;

pub use commands::{MemberChanges, Report};
pub use notice::{Notice, NoticeKind};
pub use prompt::{Confirm, FixedAnswer, TerminalConfirm};
pub use routes::{Access, Route, RouteGuard};
pub use views::{FetchState, LoginView, MemberDetailView, MemberListView};
