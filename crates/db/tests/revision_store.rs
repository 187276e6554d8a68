//! Integration tests for the revision store against a real database.
//!
//! Exercises `RevisionStore<PgPageStore>`:
//! - Creation assigns fresh ids and writes no history
//! - Saves append one compressed snapshot of the prior state each
//! - Saves to a missing page write nothing
//! - A failure in the page update rolls back the history insert
//! - History rows cannot be updated or deleted
//! - Concurrent saves serialize without losing a prior state

use assert_matches::assert_matches;
use folio_core::codec;
use folio_core::error::CoreError;
use folio_core::revision::RevisionStore;
use folio_db::repositories::{HistoryRepo, PageRepo};
use folio_db::store::PgPageStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ALICE: i64 = 1;
const BOB: i64 = 2;

fn revisions(pool: &PgPool) -> RevisionStore<PgPageStore> {
    RevisionStore::new(PgPageStore::new(pool.clone()))
}

async fn total_history_rows(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM page_history")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_assigns_fresh_ids(pool: PgPool) {
    let store = revisions(&pool);
    let first = store.create_page("Untitled", "", ALICE).await.unwrap();
    let second = store.create_page("Untitled", "", ALICE).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(total_history_rows(&pool).await, 0);

    let loaded = store.load_page(first.id).await.unwrap();
    assert_eq!(loaded.title, "Untitled");
    assert_eq!(loaded.last_modified_by, ALICE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_saves_record_prior_states(pool: PgPool) {
    let store = revisions(&pool);
    let page = store.create_page("Untitled", "", ALICE).await.unwrap();

    store.save_body(page.id, "hello", ALICE).await.unwrap();
    let saved = store.save_body(page.id, "world", BOB).await.unwrap();
    assert_eq!(saved.body, "world");
    assert_eq!(saved.last_modified_by, BOB);

    let history = store.list_history(page.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].title, "Untitled");
    assert_eq!(history[0].body, "");
    assert_eq!(history[0].modified_by, ALICE);
    assert_eq!(history[1].title, "Untitled");
    assert_eq!(history[1].body, "hello");
    assert_eq!(history[1].modified_by, ALICE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_is_stored_compressed(pool: PgPool) {
    let store = revisions(&pool);
    let long_body = "the same sentence again and again. ".repeat(200);
    let page = store.create_page("Big", &long_body, ALICE).await.unwrap();
    store.save_body(page.id, "short", ALICE).await.unwrap();

    let rows = HistoryRepo::list_by_page(&pool, page.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].body.len() < long_body.len());
    assert_eq!(codec::decode(&rows[0].body).unwrap(), long_body);
    assert_eq!(codec::decode(&rows[0].title).unwrap(), "Big");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_missing_page_writes_nothing(pool: PgPool) {
    let store = revisions(&pool);
    assert_matches!(
        store.save_page(999_999, "t", "b", ALICE).await,
        Err(CoreError::NotFound { id: 999_999, .. })
    );
    assert_eq!(total_history_rows(&pool).await, 0);
    assert!(!store.exists(999_999).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_update_rolls_back_history(pool: PgPool) {
    let store = revisions(&pool);
    let page = store.create_page("Stable", "before", ALICE).await.unwrap();

    // Make the page update half of the save fail.
    sqlx::raw_sql(
        "CREATE FUNCTION fail_page_update() RETURNS TRIGGER AS $$
         BEGIN
             RAISE EXCEPTION 'injected failure';
         END;
         $$ LANGUAGE plpgsql;
         CREATE TRIGGER trg_fail_page_update
             BEFORE UPDATE ON pages
             FOR EACH ROW EXECUTE FUNCTION fail_page_update();",
    )
    .execute(&pool)
    .await
    .unwrap();

    assert_matches!(
        store.save_body(page.id, "after", BOB).await,
        Err(CoreError::Storage(_))
    );

    assert_eq!(HistoryRepo::count_by_page(&pool, page.id).await.unwrap(), 0);
    let row = PageRepo::find_by_id(&pool, page.id).await.unwrap().unwrap();
    assert_eq!(row.body, "before");
    assert_eq!(row.last_modified_by, ALICE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_is_append_only(pool: PgPool) {
    let store = revisions(&pool);
    let page = store.create_page("T", "one", ALICE).await.unwrap();
    store.save_body(page.id, "two", ALICE).await.unwrap();

    let update = sqlx::query("UPDATE page_history SET modified_by = 0 WHERE page_id = $1")
        .bind(page.id)
        .execute(&pool)
        .await;
    assert!(update.is_err(), "history rows must not be updatable");

    let delete = sqlx::query("DELETE FROM page_history WHERE page_id = $1")
        .bind(page.id)
        .execute(&pool)
        .await;
    assert!(delete.is_err(), "history rows must not be deletable");

    assert_eq!(HistoryRepo::count_by_page(&pool, page.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_saves_keep_both_prior_states(pool: PgPool) {
    let store = revisions(&pool);
    let page = store.create_page("Race", "start", ALICE).await.unwrap();

    let other = revisions(&pool);
    let (x, y) = tokio::join!(
        store.save_body(page.id, "x", ALICE),
        other.save_body(page.id, "y", BOB),
    );
    x.unwrap();
    y.unwrap();

    let current = store.load_page(page.id).await.unwrap();
    let history = store.list_history(page.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].body, "start");

    let superseded = history[1].body.as_str();
    assert!(
        (current.body == "x" && superseded == "y") || (current.body == "y" && superseded == "x"),
        "unexpected final state: current={} superseded={superseded}",
        current.body
    );
}
