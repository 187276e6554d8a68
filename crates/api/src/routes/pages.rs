//! Route definitions for wiki pages, registered under `/pages`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// ```text
/// POST   /                create_page
/// GET    /{id}            view_page
/// PUT    /{id}            save_page
/// GET    /{id}/edit       edit_page
/// GET    /{id}/history    page_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(pages::create_page))
        .route("/{id}", get(pages::view_page).put(pages::save_page))
        .route("/{id}/edit", get(pages::edit_page))
        .route("/{id}/history", get(pages::page_history))
}
