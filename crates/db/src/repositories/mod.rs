//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument, or `&mut PgConnection` for statements that
//! must run inside a caller-owned transaction.

pub mod history_repo;
pub mod page_repo;
pub mod session_repo;
pub mod user_repo;

pub use history_repo::HistoryRepo;
pub use page_repo::PageRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
