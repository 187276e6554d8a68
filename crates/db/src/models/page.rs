//! Row model for the `pages` table.

use folio_core::page::Page;
use folio_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow)]
pub struct PageRow {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub last_modified_by: DbId,
    pub last_modified_at: Timestamp,
}

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Page {
            id: row.id,
            title: row.title,
            body: row.body,
            last_modified_by: row.last_modified_by,
            last_modified_at: row.last_modified_at,
        }
    }
}
