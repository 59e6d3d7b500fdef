//! Handlers for the read-only `/dashboard` aggregates.

use axum::extract::State;
use deepdrama_core::dashboard::DistributionDimension;
use deepdrama_db::models::dashboard::{DateRange, DistributionBucket, Kpi, TrendPoint};
use deepdrama_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::query::TrendParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/dashboard/kpi
pub async fn kpi(State(state): State<AppState>) -> AppResult<ApiResponse<Kpi>> {
    Ok(ApiResponse::ok(DashboardRepo::kpi(&state.pool).await?))
}

async fn distribution(
    state: &AppState,
    dimension: DistributionDimension,
    range: &DateRange,
) -> AppResult<ApiResponse<Vec<DistributionBucket>>> {
    let (from, to) = range.bounds();
    let buckets = DashboardRepo::distribution(&state.pool, dimension, from, to).await?;
    Ok(ApiResponse::ok(buckets))
}

/// GET /api/dashboard/status-distribution?startDate&endDate
pub async fn status_distribution(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<DateRange>,
) -> AppResult<ApiResponse<Vec<DistributionBucket>>> {
    distribution(&state, DistributionDimension::Status, &range).await
}

/// GET /api/dashboard/source-distribution?startDate&endDate
pub async fn source_distribution(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<DateRange>,
) -> AppResult<ApiResponse<Vec<DistributionBucket>>> {
    distribution(&state, DistributionDimension::SourceType, &range).await
}

/// GET /api/dashboard/team-distribution?startDate&endDate
pub async fn team_distribution(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<DateRange>,
) -> AppResult<ApiResponse<Vec<DistributionBucket>>> {
    distribution(&state, DistributionDimension::Team, &range).await
}

/// GET /api/dashboard/score-trend?period=day|week|month
pub async fn score_trend(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TrendParams>,
) -> AppResult<ApiResponse<Vec<TrendPoint>>> {
    let points = DashboardRepo::score_trend(&state.pool, params.period()).await?;
    Ok(ApiResponse::ok(points))
}
