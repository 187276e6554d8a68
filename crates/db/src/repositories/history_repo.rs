//! Repository for the `page_history` table.
//!
//! History is append-only: there are no update or delete methods, and the
//! table itself rejects both.

use folio_core::page::NewHistoryEntry;
use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::history_entry::HistoryRow;

/// Column list for page_history queries.
const COLUMNS: &str = "id, page_id, title, body, modified_by, modified_at, recorded_at";

/// Provides append and read operations for page history.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Append a history snapshot inside the caller's transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewHistoryEntry,
    ) -> Result<HistoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_history (page_id, title, body, modified_by, modified_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(input.page_id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.modified_by)
            .bind(input.modified_at)
            .fetch_one(conn)
            .await
    }

    /// List all snapshots for a page, oldest first.
    pub async fn list_by_page(pool: &PgPool, page_id: DbId) -> Result<Vec<HistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_history
             WHERE page_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// Count snapshots for a page.
    pub async fn count_by_page(pool: &PgPool, page_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM page_history WHERE page_id = $1")
            .bind(page_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
