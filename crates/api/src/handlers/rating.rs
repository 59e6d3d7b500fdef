//! Handlers for the `/ratings` resource.

use axum::extract::State;
use deepdrama_core::error::CoreError;
use deepdrama_core::types::DbId;
use deepdrama_db::models::rating::{CreateRating, Rating, RatingQuery, UpdateRating};
use deepdrama_db::repositories::{RatingRepo, RatingWrite};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::{ApiResponse, PageResult};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    CoreError::NotFound {
        entity: "Rating",
        id,
    }
    .into()
}

/// Map a write outcome onto the envelope, treating lock and absence as errors.
fn applied<T>(id: DbId, outcome: RatingWrite<T>) -> AppResult<T> {
    match outcome {
        RatingWrite::Applied(value) => Ok(value),
        RatingWrite::NotFound => Err(not_found(id)),
        RatingWrite::Locked => {
            Err(CoreError::Forbidden(format!("Rating {id} is locked and cannot be modified")).into())
        }
    }
}

/// POST /api/ratings
pub async fn list_ratings(
    State(state): State<AppState>,
    AppJson(query): AppJson<RatingQuery>,
) -> AppResult<ApiResponse<PageResult<Rating>>> {
    let listing = query.resolve();
    let total = RatingRepo::count(&state.pool, &listing.filter).await?;
    let list = RatingRepo::list(&state.pool, &listing).await?;
    Ok(ApiResponse::ok(PageResult::new(total, listing.page, list)))
}

/// GET /api/ratings/{id}
pub async fn get_rating(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<Rating>> {
    let rating = RatingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::ok(rating))
}

/// POST /api/ratings/create
///
/// Scores outside `[0, 100]` are rejected before anything is written.
pub async fn create_rating(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateRating>,
) -> AppResult<ApiResponse<Rating>> {
    input.scores().validate()?;

    let rating = RatingRepo::create(&state.pool, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Script",
            id: input.script_id,
        })?;
    tracing::info!(
        rating_id = rating.id,
        script_id = rating.script_id,
        total = ?rating.total_score,
        "Rating recorded",
    );
    Ok(ApiResponse::with_message("Created", rating))
}

/// PUT /api/ratings/{id}
pub async fn update_rating(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateRating>,
) -> AppResult<ApiResponse<Rating>> {
    input.patched_scores().validate()?;

    let outcome = RatingRepo::update(&state.pool, id, &input).await?;
    let rating = applied(id, outcome)?;
    tracing::info!(rating_id = id, script_id = rating.script_id, "Rating updated");
    Ok(ApiResponse::with_message("Updated", rating))
}

/// DELETE /api/ratings/{id}
pub async fn delete_rating(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<bool>> {
    let outcome = RatingRepo::delete(&state.pool, id).await?;
    applied(id, outcome)?;
    tracing::info!(rating_id = id, "Rating deleted");
    Ok(ApiResponse::with_message("Deleted", true))
}
