//! Domain core of the Folio wiki.
//!
//! Contains the page model, the history codec, the revision store algorithm,
//! and the access guard. The crate performs no I/O of its own; persistence and
//! session handling are supplied through the traits in [`revision`] and
//! [`access`].

pub mod access;
pub mod codec;
pub mod error;
pub mod page;
pub mod page_service;
pub mod revision;
pub mod types;

#[cfg(test)]
mod testing;
