//! In-memory collaborators for unit tests, with fault injection.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::access::{Identity, IdentityDirectory, SessionResolver};
use crate::error::CoreError;
use crate::page::{HistoryEntry, NewHistoryEntry, NewPage, Page, PageUpdate};
use crate::revision::{PageStore, PageTx};
use crate::types::DbId;

#[derive(Debug, Clone, Default)]
struct Tables {
    pages: BTreeMap<DbId, Page>,
    history: Vec<HistoryEntry>,
    next_page_id: DbId,
    next_history_id: DbId,
}

#[derive(Debug, Default)]
struct Faults {
    fail_update: AtomicBool,
    fail_commit: AtomicBool,
}

/// A [`PageStore`] whose unit of work holds a store-wide lock and stages
/// writes on a copy of the tables until commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageStore {
    tables: Arc<AsyncMutex<Tables>>,
    faults: Arc<Faults>,
}

impl MemoryPageStore {
    pub fn fail_next_update(&self) {
        self.faults.fail_update.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_commit(&self) {
        self.faults.fail_commit.store(true, Ordering::SeqCst);
    }

    pub async fn page_count(&self) -> usize {
        self.tables.lock().await.pages.len()
    }

    pub async fn history_count(&self) -> usize {
        self.tables.lock().await.history.len()
    }

    /// Overwrite every history blob of a page with garbage.
    pub async fn corrupt_history(&self, page_id: DbId) {
        let mut tables = self.tables.lock().await;
        for entry in tables.history.iter_mut().filter(|e| e.page_id == page_id) {
            entry.body = vec![0xFF; 3];
        }
    }
}

impl PageStore for MemoryPageStore {
    type Tx = MemoryTx;

    async fn find_page(&self, id: DbId) -> Result<Option<Page>, CoreError> {
        Ok(self.tables.lock().await.pages.get(&id).cloned())
    }

    async fn insert_page(&self, page: &NewPage) -> Result<Page, CoreError> {
        let mut tables = self.tables.lock().await;
        tables.next_page_id += 1;
        let row = Page {
            id: tables.next_page_id,
            title: page.title.clone(),
            body: page.body.clone(),
            last_modified_by: page.editor_id,
            last_modified_at: page.created_at,
        };
        tables.pages.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_history(&self, page_id: DbId) -> Result<Vec<HistoryEntry>, CoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .history
            .iter()
            .filter(|e| e.page_id == page_id)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<MemoryTx, CoreError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = guard.clone();
        Ok(MemoryTx {
            guard,
            staged,
            faults: Arc::clone(&self.faults),
        })
    }
}

/// Unit of work for [`MemoryPageStore`]; dropping it discards `staged`.
pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    faults: Arc<Faults>,
}

impl PageTx for MemoryTx {
    async fn lock_page(&mut self, id: DbId) -> Result<Option<Page>, CoreError> {
        Ok(self.staged.pages.get(&id).cloned())
    }

    async fn insert_history(&mut self, entry: &NewHistoryEntry) -> Result<HistoryEntry, CoreError> {
        self.staged.next_history_id += 1;
        let row = HistoryEntry {
            id: self.staged.next_history_id,
            page_id: entry.page_id,
            title: entry.title.clone(),
            body: entry.body.clone(),
            modified_by: entry.modified_by,
            modified_at: entry.modified_at,
        };
        self.staged.history.push(row.clone());
        Ok(row)
    }

    async fn update_page(&mut self, id: DbId, update: &PageUpdate) -> Result<Page, CoreError> {
        if self.faults.fail_update.swap(false, Ordering::SeqCst) {
            return Err(CoreError::Storage("injected update failure".into()));
        }
        let page = self
            .staged
            .pages
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "page", id })?;
        page.title = update.title.clone();
        page.body = update.body.clone();
        page.last_modified_by = update.editor_id;
        page.last_modified_at = update.modified_at;
        Ok(page.clone())
    }

    async fn commit(mut self) -> Result<(), CoreError> {
        if self.faults.fail_commit.swap(false, Ordering::SeqCst) {
            return Err(CoreError::Storage("injected commit failure".into()));
        }
        *self.guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}

/// Identity directory backed by a map; identities can be revoked.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    identities: Mutex<HashMap<DbId, Identity>>,
}

impl MemoryDirectory {
    pub fn with(identities: &[(DbId, &str)]) -> Self {
        let directory = Self::default();
        for &(id, name) in identities {
            directory.add(id, name);
        }
        directory
    }

    pub fn add(&self, id: DbId, name: &str) {
        self.identities.lock().unwrap().insert(
            id,
            Identity {
                id,
                name: name.to_string(),
            },
        );
    }

    pub fn revoke(&self, id: DbId) {
        self.identities.lock().unwrap().remove(&id);
    }
}

impl IdentityDirectory for MemoryDirectory {
    async fn find_active(&self, id: DbId) -> Result<Option<Identity>, CoreError> {
        Ok(self.identities.lock().unwrap().get(&id).cloned())
    }
}

/// Session resolver mapping literal tokens to identity ids.
#[derive(Debug, Default)]
pub struct MemorySessions {
    tokens: Mutex<HashMap<String, DbId>>,
    invalidated: Mutex<HashSet<DbId>>,
    invalidations: AtomicUsize,
}

impl MemorySessions {
    pub fn with(tokens: &[(&str, DbId)]) -> Self {
        let sessions = Self::default();
        {
            let mut map = sessions.tokens.lock().unwrap();
            for &(token, id) in tokens {
                map.insert(token.to_string(), id);
            }
        }
        sessions
    }

    pub fn was_invalidated(&self, id: DbId) -> bool {
        self.invalidated.lock().unwrap().contains(&id)
    }

    pub fn invalidation_count(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

impl SessionResolver for MemorySessions {
    fn resolve(&self, token: &str) -> Option<DbId> {
        self.tokens.lock().unwrap().get(token).copied()
    }

    async fn invalidate(&self, identity_id: DbId) -> Result<(), CoreError> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.invalidated.lock().unwrap().insert(identity_id);
        Ok(())
    }
}
