//! Request extractors shared by handlers.
//!
//! - [`auth::SessionToken`] -- The caller's bearer token, if any.

pub mod auth;
