//! The revision store: page creation, loading, and history-preserving saves.
//!
//! Every save snapshots the page's prior state into an append-only history
//! table and overwrites the page row, both inside one unit of work. The
//! persistence backend is abstracted behind [`PageStore`] / [`PageTx`] so the
//! algorithm is independent of the database driver.
//!
//! Concurrent saves to one page are last-write-wins. The backend locks the
//! page row for the duration of the unit of work, so every snapshot captures
//! the state the save actually replaced and no edit is lost from history.

use std::future::Future;

use chrono::Utc;

use crate::codec;
use crate::error::CoreError;
use crate::page::{HistoryEntry, NewHistoryEntry, NewPage, Page, PageUpdate, Revision};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Persistence collaborator
// ---------------------------------------------------------------------------

/// Persistence backend for pages and their history.
///
/// "No row" is reported as `Ok(None)`; `Err` is reserved for real failures.
pub trait PageStore: Send + Sync {
    /// Unit of work returned by [`PageStore::begin`].
    type Tx: PageTx;

    /// Point lookup of a page by id.
    fn find_page(&self, id: DbId)
        -> impl Future<Output = Result<Option<Page>, CoreError>> + Send;

    /// Insert a new page, returning it with its assigned id.
    fn insert_page(&self, page: &NewPage) -> impl Future<Output = Result<Page, CoreError>> + Send;

    /// All history entries for a page, oldest first.
    fn list_history(
        &self,
        page_id: DbId,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, CoreError>> + Send;

    /// Start a unit of work. Dropping it without [`PageTx::commit`] discards
    /// every write made through it.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx, CoreError>> + Send;
}

/// An open unit of work against a [`PageStore`].
pub trait PageTx: Send {
    /// Load a page and hold a write lock on it until the unit of work ends.
    fn lock_page(
        &mut self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Page>, CoreError>> + Send;

    /// Append a history entry.
    fn insert_history(
        &mut self,
        entry: &NewHistoryEntry,
    ) -> impl Future<Output = Result<HistoryEntry, CoreError>> + Send;

    /// Overwrite an existing page row.
    fn update_page(
        &mut self,
        id: DbId,
        update: &PageUpdate,
    ) -> impl Future<Output = Result<Page, CoreError>> + Send;

    /// Make every write in this unit of work visible atomically.
    fn commit(self) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ---------------------------------------------------------------------------
// Revision store
// ---------------------------------------------------------------------------

/// Owns page and history persistence and implements the save algorithm.
pub struct RevisionStore<S> {
    store: S,
}

impl<S: PageStore> RevisionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying persistence backend.
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Insert a brand-new page. Never writes history.
    pub async fn create_page(
        &self,
        title: &str,
        body: &str,
        editor_id: DbId,
    ) -> Result<Page, CoreError> {
        let page = self
            .store
            .insert_page(&NewPage {
                title: title.to_string(),
                body: body.to_string(),
                editor_id,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(page_id = page.id, editor_id, "Page created");
        Ok(page)
    }

    /// Load the current state of a page, or fail with `NotFound`.
    pub async fn load_page(&self, id: DbId) -> Result<Page, CoreError> {
        self.try_load(id).await?.ok_or(CoreError::NotFound {
            entity: "page",
            id,
        })
    }

    /// Load the current state of a page if it exists.
    pub async fn try_load(&self, id: DbId) -> Result<Option<Page>, CoreError> {
        let page = self.store.find_page(id).await?;
        tracing::debug!(page_id = id, found = page.is_some(), "Page lookup");
        Ok(page)
    }

    pub async fn exists(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.try_load(id).await?.is_some())
    }

    /// Replace a page's title and body, recording its prior state in history.
    ///
    /// Fails with `NotFound` (writing nothing) when the page does not exist.
    pub async fn save_page(
        &self,
        id: DbId,
        title: &str,
        body: &str,
        editor_id: DbId,
    ) -> Result<Page, CoreError> {
        self.commit_revision(id, Some(title), body, editor_id).await
    }

    /// Like [`RevisionStore::save_page`], but keeps the title the page has at
    /// the moment the save takes its lock.
    pub async fn save_body(
        &self,
        id: DbId,
        body: &str,
        editor_id: DbId,
    ) -> Result<Page, CoreError> {
        self.commit_revision(id, None, body, editor_id).await
    }

    /// Decoded history of a page, oldest first.
    ///
    /// A corrupted snapshot fails this read with `Codec`; nothing else is
    /// affected.
    pub async fn list_history(&self, page_id: DbId) -> Result<Vec<Revision>, CoreError> {
        if !self.exists(page_id).await? {
            return Err(CoreError::NotFound {
                entity: "page",
                id: page_id,
            });
        }

        let entries = self.store.list_history(page_id).await?;
        entries
            .into_iter()
            .map(|entry| {
                let revision = decode_entry(&entry);
                if let Err(ref e) = revision {
                    tracing::error!(
                        history_id = entry.id,
                        page_id,
                        error = %e,
                        "Corrupted history snapshot"
                    );
                }
                revision
            })
            .collect()
    }

    async fn commit_revision(
        &self,
        id: DbId,
        title: Option<&str>,
        body: &str,
        editor_id: DbId,
    ) -> Result<Page, CoreError> {
        let mut tx = self.store.begin().await?;

        let current = tx
            .lock_page(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "page", id })?;

        // Encoding happens before the first write so a codec failure leaves
        // nothing to roll back.
        let snapshot = snapshot_of(&current)?;

        let update = PageUpdate {
            title: title.map_or_else(|| current.title.clone(), str::to_string),
            body: body.to_string(),
            editor_id,
            modified_at: Utc::now(),
        };

        let entry = tx.insert_history(&snapshot).await?;
        let page = tx.update_page(id, &update).await?;
        tx.commit().await?;

        tracing::info!(
            page_id = id,
            history_id = entry.id,
            editor_id,
            previous_editor_id = current.last_modified_by,
            "Page saved"
        );
        Ok(page)
    }
}

/// Build the history row capturing `page` as it is right now.
fn snapshot_of(page: &Page) -> Result<NewHistoryEntry, CoreError> {
    Ok(NewHistoryEntry {
        page_id: page.id,
        title: codec::encode(&page.title)?,
        body: codec::encode(&page.body)?,
        modified_by: page.last_modified_by,
        modified_at: page.last_modified_at,
    })
}

fn decode_entry(entry: &HistoryEntry) -> Result<Revision, CoreError> {
    Ok(Revision {
        id: entry.id,
        page_id: entry.page_id,
        title: codec::decode(&entry.title)?,
        body: codec::decode(&entry.body)?,
        modified_by: entry.modified_by,
        modified_at: entry.modified_at,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
