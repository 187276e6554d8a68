//! Handlers for the `/pages` resource.
//!
//! Every handler passes the caller's bearer token straight to the page
//! service, which decides whether the caller may proceed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::page::SavePage;
use folio_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::SessionToken;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /pages`. Both fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePageRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// POST /api/v1/pages
///
/// Create a page. A missing title becomes "Untitled".
pub async fn create_page(
    State(state): State<AppState>,
    token: SessionToken,
    Json(input): Json<CreatePageRequest>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .pages
        .create(input.title.as_deref(), input.body.as_deref(), token.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// GET /api/v1/pages/{id}
///
/// View a page along with the signed-in viewer, if any.
pub async fn view_page(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = state.pages.view(id, token.as_deref()).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/pages/{id}/edit
///
/// Load a page for editing. Requires a signed-in caller.
pub async fn edit_page(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = state.pages.edit(id, token.as_deref()).await?;
    Ok(Json(DataResponse { data: page }))
}

/// PUT /api/v1/pages/{id}
///
/// Save new content. Omitting `title` keeps the current title.
pub async fn save_page(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<DbId>,
    Json(input): Json<SavePage>,
) -> AppResult<impl IntoResponse> {
    let page = state.pages.save(id, &input, token.as_deref()).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/pages/{id}/history
///
/// Prior versions of a page, oldest first.
pub async fn page_history(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let revisions = state.pages.history(id, token.as_deref()).await?;
    Ok(Json(DataResponse { data: revisions }))
}
