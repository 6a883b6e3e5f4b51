pub mod auth;
pub mod designs;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register      register (public)
/// /auth/login         login (public)
///
/// /designs            list, create        (requires auth)
/// /designs/{id}       get, update, delete (requires auth, owner only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/designs", designs::router())
}
