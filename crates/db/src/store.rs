//! Postgres implementations of the core persistence and identity traits.
//!
//! A save runs in one Postgres transaction: the page row is read with
//! `SELECT ... FOR UPDATE`, the snapshot is appended, the page is updated,
//! and the transaction commits. Dropping a [`PgPageTx`] before commit rolls
//! every statement back.

use folio_core::access::{Identity, IdentityDirectory};
use folio_core::error::CoreError;
use folio_core::page::{HistoryEntry, NewHistoryEntry, NewPage, Page, PageUpdate};
use folio_core::revision::{PageStore, PageTx};
use folio_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::repositories::{HistoryRepo, PageRepo, UserRepo};

/// Convert a driver error into the core's storage failure.
fn storage(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Storage failure");
    CoreError::Storage(err.to_string())
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// [`PageStore`] backed by the `pages` and `page_history` tables.
#[derive(Debug, Clone)]
pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PageStore for PgPageStore {
    type Tx = PgPageTx;

    async fn find_page(&self, id: DbId) -> Result<Option<Page>, CoreError> {
        let row = PageRepo::find_by_id(&self.pool, id).await.map_err(storage)?;
        Ok(row.map(Page::from))
    }

    async fn insert_page(&self, page: &NewPage) -> Result<Page, CoreError> {
        let row = PageRepo::create(&self.pool, page).await.map_err(storage)?;
        Ok(row.into())
    }

    async fn list_history(&self, page_id: DbId) -> Result<Vec<HistoryEntry>, CoreError> {
        let rows = HistoryRepo::list_by_page(&self.pool, page_id)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    async fn begin(&self) -> Result<PgPageTx, CoreError> {
        let tx = self.pool.begin().await.map_err(storage)?;
        Ok(PgPageTx { tx })
    }
}

/// An open Postgres transaction for one save.
pub struct PgPageTx {
    tx: Transaction<'static, Postgres>,
}

impl PageTx for PgPageTx {
    async fn lock_page(&mut self, id: DbId) -> Result<Option<Page>, CoreError> {
        let row = PageRepo::find_for_update(&mut self.tx, id)
            .await
            .map_err(storage)?;
        Ok(row.map(Page::from))
    }

    async fn insert_history(&mut self, entry: &NewHistoryEntry) -> Result<HistoryEntry, CoreError> {
        let row = HistoryRepo::create(&mut self.tx, entry)
            .await
            .map_err(storage)?;
        Ok(row.into())
    }

    async fn update_page(&mut self, id: DbId, update: &PageUpdate) -> Result<Page, CoreError> {
        let row = PageRepo::update(&mut self.tx, id, update)
            .await
            .map_err(storage)?;
        Ok(row.into())
    }

    async fn commit(self) -> Result<(), CoreError> {
        self.tx.commit().await.map_err(storage)
    }
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// [`IdentityDirectory`] backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgIdentityDirectory {
    pool: PgPool,
}

impl PgIdentityDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityDirectory for PgIdentityDirectory {
    async fn find_active(&self, id: DbId) -> Result<Option<Identity>, CoreError> {
        let user = UserRepo::find_active_by_id(&self.pool, id)
            .await
            .map_err(storage)?;
        Ok(user.map(|u| u.identity()))
    }
}
