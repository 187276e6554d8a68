//! Caller-facing page operations: access checks in front of the revision store.

use serde::Serialize;

use crate::access::{AccessGuard, Identity, IdentityDirectory, SessionResolver};
use crate::error::CoreError;
use crate::page::{title_or_default, validate_body, validate_title, Page, Revision, SavePage};
use crate::revision::{PageStore, RevisionStore};
use crate::types::DbId;

/// A page together with the (optional) identity viewing it.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub page: Page,
    pub viewer: Option<Identity>,
}

/// Composes an [`AccessGuard`] and a [`RevisionStore`].
///
/// Mutating operations resolve the caller first and fail with
/// `Unauthorized` before the store is touched.
pub struct PageService<S, D, R> {
    revisions: RevisionStore<S>,
    guard: AccessGuard<D, R>,
}

impl<S, D, R> PageService<S, D, R>
where
    S: PageStore,
    D: IdentityDirectory,
    R: SessionResolver,
{
    pub fn new(revisions: RevisionStore<S>, guard: AccessGuard<D, R>) -> Self {
        Self { revisions, guard }
    }

    pub fn revisions(&self) -> &RevisionStore<S> {
        &self.revisions
    }

    pub fn guard(&self) -> &AccessGuard<D, R> {
        &self.guard
    }

    /// Create a page. A missing or blank title becomes the default title.
    pub async fn create(
        &self,
        title: Option<&str>,
        body: Option<&str>,
        token: Option<&str>,
    ) -> Result<Page, CoreError> {
        let identity = self.guard.require_identity(token).await?;

        let title = title_or_default(title)?;
        let body = body.unwrap_or_default();
        validate_body(body)?;

        self.revisions.create_page(&title, body, identity.id).await
    }

    /// View a page. Anonymous callers are allowed.
    pub async fn view(&self, id: DbId, token: Option<&str>) -> Result<PageView, CoreError> {
        let viewer = self.guard.resolve_viewer(token).await?;
        let page = self.revisions.load_page(id).await?;
        Ok(PageView { page, viewer })
    }

    /// Load a page for editing.
    pub async fn edit(&self, id: DbId, token: Option<&str>) -> Result<Page, CoreError> {
        self.guard.require_identity(token).await?;
        self.revisions.load_page(id).await
    }

    /// Save new content. A `None` title keeps the page's current title.
    pub async fn save(
        &self,
        id: DbId,
        input: &SavePage,
        token: Option<&str>,
    ) -> Result<Page, CoreError> {
        let identity = self.guard.require_identity(token).await?;

        validate_body(&input.body)?;
        match input.title.as_deref() {
            Some(title) => {
                validate_title(title)?;
                self.revisions
                    .save_page(id, title, &input.body, identity.id)
                    .await
            }
            None => self.revisions.save_body(id, &input.body, identity.id).await,
        }
    }

    /// Decoded history of a page, oldest first.
    pub async fn history(&self, id: DbId, token: Option<&str>) -> Result<Vec<Revision>, CoreError> {
        self.guard.require_identity(token).await?;
        self.revisions.list_history(id).await
    }
}
