use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Read-only aggregate routes mounted at `/dashboard`.
///
/// ```text
/// GET  /kpi                     -> kpi
/// GET  /status-distribution     -> status_distribution
/// GET  /source-distribution     -> source_distribution
/// GET  /team-distribution       -> team_distribution
/// GET  /score-trend             -> score_trend
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kpi", get(dashboard::kpi))
        .route("/status-distribution", get(dashboard::status_distribution))
        .route("/source-distribution", get(dashboard::source_distribution))
        .route("/team-distribution", get(dashboard::team_distribution))
        .route("/score-trend", get(dashboard::score_trend))
}
