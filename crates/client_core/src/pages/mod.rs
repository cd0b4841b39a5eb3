//! View-models for each screen: plain state plus the calls that feed it.
//!
//! Every async operation is also split into a `begin_*` / `finish_*` pair so
//! event-driven front ends can run the network call on a worker and apply
//! the outcome on the UI thread.

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod home;
pub mod navbar;
pub mod pricing;

pub use auth::{LoginPage, RegisterPage};
pub use chat::{ChatError, ChatPage, ChatStatus};
pub use dashboard::DashboardPage;
pub use navbar::{NavAction, NavbarState};

#[cfg(test)]
#[path = "../tests/fake_api.rs"]
pub(crate) mod fake_api;
