//! Route definitions for rating endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::rating;
use crate::state::AppState;

/// Routes mounted at `/ratings`.
///
/// ```text
/// POST   /                 -> list_ratings
/// POST   /create           -> create_rating
/// GET    /{id}             -> get_rating
/// PUT    /{id}             -> update_rating
/// DELETE /{id}             -> delete_rating
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(rating::list_ratings))
        .route("/create", post(rating::create_rating))
        .route(
            "/{id}",
            get(rating::get_rating)
                .put(rating::update_rating)
                .delete(rating::delete_rating),
        )
}
