pub mod auth;
pub mod health;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                 signup (public)
/// /auth/login                  login (public)
/// /auth/refresh                refresh (public)
/// /auth/logout                 logout (requires auth)
/// /auth/me                     current identity (anonymous ok)
///
/// /pages                       create (requires auth)
/// /pages/{id}                  view (anonymous ok), save (requires auth)
/// /pages/{id}/edit             load for editing (requires auth)
/// /pages/{id}/history          decoded history (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/pages", pages::router())
}
