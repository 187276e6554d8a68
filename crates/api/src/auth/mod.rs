//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`session`] -- [`session::JwtSessions`], the session collaborator handed to
//!   the access guard.

pub mod jwt;
pub mod password;
pub mod session;
