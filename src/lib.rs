//! Client side of the admin console: a persisted session, a REST client for
//! the admin backend, and the login, registration and user dashboard pages
//! that keep local state in step with it.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod popup;
pub mod session;

pub use error::ClientError;

#[cfg(test)]
pub mod testing;
