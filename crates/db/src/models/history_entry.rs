//! Row model for the `page_history` table.
//!
//! History rows are immutable snapshots; the table rejects updates and deletes.

use folio_core::page::HistoryEntry;
use folio_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `page_history` table. `title` and `body` are LZ4 blobs.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: DbId,
    pub page_id: DbId,
    pub title: Vec<u8>,
    pub body: Vec<u8>,
    pub modified_by: DbId,
    pub modified_at: Timestamp,
    pub recorded_at: Timestamp,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry {
            id: row.id,
            page_id: row.page_id,
            title: row.title,
            body: row.body,
            modified_by: row.modified_by,
            modified_at: row.modified_at,
        }
    }
}
