//! Repository for the `pages` table.

use folio_core::page::{NewPage, PageUpdate};
use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::page::PageRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, body, last_modified_by, last_modified_at";

/// Provides insert, lookup, and transactional update operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page, returning the created row with its assigned id.
    pub async fn create(pool: &PgPool, input: &NewPage) -> Result<PageRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (title, body, last_modified_by, last_modified_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.editor_id)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a page by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, PageRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a page by ID and lock its row until the surrounding transaction ends.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, PageRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite a page's content and modification stamp.
    ///
    /// Fails with `RowNotFound` if the page does not exist.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &PageUpdate,
    ) -> Result<PageRow, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                title = $2,
                body = $3,
                last_modified_by = $4,
                last_modified_at = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.editor_id)
            .bind(input.modified_at)
            .fetch_one(conn)
            .await
    }
}
