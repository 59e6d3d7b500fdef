//! Route definitions for script endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::script;
use crate::state::AppState;

/// Routes mounted at `/scripts`.
///
/// Static segments win over `{id}`, so `rankings` and `options` never reach
/// the id handlers.
///
/// ```text
/// POST   /                 -> list_scripts
/// POST   /create           -> create_script
/// GET    /rankings         -> rankings
/// GET    /options          -> options
/// GET    /{id}             -> get_script
/// PUT    /{id}             -> update_script
/// DELETE /{id}             -> delete_script
/// GET    /{id}/ratings     -> list_script_ratings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(script::list_scripts))
        .route("/create", post(script::create_script))
        .route("/rankings", get(script::rankings))
        .route("/options", get(script::options))
        .route(
            "/{id}",
            get(script::get_script)
                .put(script::update_script)
                .delete(script::delete_script),
        )
        .route("/{id}/ratings", get(script::list_script_ratings))
}
