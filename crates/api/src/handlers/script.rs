//! Handlers for the `/scripts` resource.
//!
//! Listing is a `POST` so the open-ended filter object travels in the body.

use axum::extract::State;
use deepdrama_core::error::CoreError;
use deepdrama_core::types::DbId;
use deepdrama_db::models::rating::Rating;
use deepdrama_db::models::script::{
    CreateScript, RankedScript, Script, ScriptOptions, ScriptQuery, UpdateScript,
};
use deepdrama_db::repositories::{RatingRepo, ScriptRepo};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::RankingParams;
use crate::response::{ApiResponse, PageResult};
use crate::state::AppState;

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Script",
        id,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/scripts
///
/// One page of scripts matching the filter body, plus the total count.
pub async fn list_scripts(
    State(state): State<AppState>,
    AppJson(query): AppJson<ScriptQuery>,
) -> AppResult<ApiResponse<PageResult<Script>>> {
    let listing = query.resolve(&state.config.tab_presets);
    let total = ScriptRepo::count(&state.pool, &listing.filter).await?;
    let list = ScriptRepo::list(&state.pool, &listing).await?;
    Ok(ApiResponse::ok(PageResult::new(total, listing.page, list)))
}

/// GET /api/scripts/{id}
pub async fn get_script(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<Script>> {
    let script = ScriptRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::ok(script))
}

/// POST /api/scripts/create
pub async fn create_script(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateScript>,
) -> AppResult<ApiResponse<Script>> {
    let script = ScriptRepo::create(&state.pool, &input).await?;
    tracing::info!(script_id = script.id, code = ?script.script_id, "Script created");
    Ok(ApiResponse::with_message("Created", script))
}

/// PUT /api/scripts/{id}
///
/// Only fields present in the body change; `null` clears a nullable field.
pub async fn update_script(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateScript>,
) -> AppResult<ApiResponse<Script>> {
    let script = ScriptRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(script_id = id, "Script updated");
    Ok(ApiResponse::with_message("Updated", script))
}

/// DELETE /api/scripts/{id}
pub async fn delete_script(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<bool>> {
    if !ScriptRepo::delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    tracing::info!(script_id = id, "Script deleted");
    Ok(ApiResponse::with_message("Deleted", true))
}

/// GET /api/scripts/rankings?limit=N
pub async fn rankings(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<RankingParams>,
) -> AppResult<ApiResponse<Vec<RankedScript>>> {
    let ranked = ScriptRepo::rankings(&state.pool, params.limit).await?;
    Ok(ApiResponse::ok(ranked))
}

/// GET /api/scripts/options
pub async fn options(State(state): State<AppState>) -> AppResult<ApiResponse<ScriptOptions>> {
    Ok(ApiResponse::ok(ScriptRepo::options(&state.pool).await?))
}

/// GET /api/scripts/{id}/ratings
pub async fn list_script_ratings(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<Vec<Rating>>> {
    ScriptRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let ratings = RatingRepo::list_by_script(&state.pool, id).await?;
    Ok(ApiResponse::ok(ratings))
}
