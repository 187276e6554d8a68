//! Page and history domain types, plus content validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Title given to pages created without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum body length in bytes (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The current, mutable state of a wiki page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub last_modified_by: DbId,
    pub last_modified_at: Timestamp,
}

/// An immutable, compressed snapshot of a page's state before an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: DbId,
    pub page_id: DbId,
    pub title: Vec<u8>,
    pub body: Vec<u8>,
    pub modified_by: DbId,
    pub modified_at: Timestamp,
}

/// A decoded [`HistoryEntry`] as returned by history reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub id: DbId,
    pub page_id: DbId,
    pub title: String,
    pub body: String,
    pub modified_by: DbId,
    pub modified_at: Timestamp,
}

/// Values for a brand-new page row.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub title: String,
    pub body: String,
    pub editor_id: DbId,
    pub created_at: Timestamp,
}

/// Values for a history row; `title` and `body` are already encoded.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub page_id: DbId,
    pub title: Vec<u8>,
    pub body: Vec<u8>,
    pub modified_by: DbId,
    pub modified_at: Timestamp,
}

/// Replacement state for an existing page row.
#[derive(Debug, Clone)]
pub struct PageUpdate {
    pub title: String,
    pub body: String,
    pub editor_id: DbId,
    pub modified_at: Timestamp,
}

/// Request to save a page. A `None` title keeps the current one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavePage {
    pub title: Option<String>,
    pub body: String,
}

/// Validate a page title (non-blank, at most [`MAX_TITLE_LEN`] characters).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a page body (at most [`MAX_BODY_BYTES`] bytes).
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.len() > MAX_BODY_BYTES {
        return Err(CoreError::Validation(format!(
            "Body must be at most {MAX_BODY_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Resolve the title for a new page, falling back to [`DEFAULT_TITLE`] when
/// none (or only whitespace) is given.
pub fn title_or_default(title: Option<&str>) -> Result<String, CoreError> {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => {
            validate_title(t)?;
            Ok(t.to_string())
        }
        None => Ok(DEFAULT_TITLE.to_string()),
    }
}
