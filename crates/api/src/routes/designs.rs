//! Route definitions for the design resource.

use atelier_core::design::MAX_IMAGE_BYTES;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::designs;
use crate::state::AppState;

/// Design routes mounted at `/designs`. All require a Bearer token.
///
/// ```text
/// GET       /      -> list
/// POST      /      -> create (multipart)
/// GET       /{id}  -> get_by_id
/// PUT/PATCH /{id}  -> update (multipart)
/// DELETE    /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(designs::list).post(designs::create))
        .route(
            "/{id}",
            get(designs::get_by_id)
                .put(designs::update)
                .patch(designs::update)
                .delete(designs::delete),
        )
        // Ceiling well above the accepted image size so a moderately
        // oversized upload is read in full and rejected by validation
        // with an `image` field error instead of a transport error.
        .layer(DefaultBodyLimit::max(4 * MAX_IMAGE_BYTES))
}
