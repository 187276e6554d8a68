use std::sync::Arc;

use folio_core::access::AccessGuard;
use folio_core::page_service::PageService;
use folio_core::revision::RevisionStore;
use folio_db::store::{PgIdentityDirectory, PgPageStore};

use crate::auth::session::JwtSessions;
use crate::config::ServerConfig;

/// The page service wired to Postgres and JWT sessions.
pub type WikiService = PageService<PgPageStore, PgIdentityDirectory, JwtSessions>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Page operations, constructed once at startup.
    pub pages: Arc<WikiService>,
}

impl AppState {
    /// Wire the page service and its collaborators around a pool.
    pub fn new(pool: folio_db::DbPool, config: ServerConfig) -> Self {
        let revisions = RevisionStore::new(PgPageStore::new(pool.clone()));
        let guard = AccessGuard::new(
            PgIdentityDirectory::new(pool.clone()),
            JwtSessions::new(config.jwt.clone(), pool.clone()),
        );

        Self {
            pool,
            config: Arc::new(config),
            pages: Arc::new(PageService::new(revisions, guard)),
        }
    }
}
