//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the database row and,
//! where the table is written from outside the core, a create DTO.

pub mod history_entry;
pub mod page;
pub mod session;
pub mod user;
