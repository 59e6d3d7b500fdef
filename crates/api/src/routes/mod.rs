pub mod dashboard;
pub mod health;
pub mod ratings;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /scripts                     filtered page of scripts (POST)
/// /scripts/create              create (POST)
/// /scripts/rankings            top scripts by average score (GET)
/// /scripts/options             distinct filter values (GET)
/// /scripts/{id}                get, update, delete
/// /scripts/{id}/ratings        ratings of one script (GET)
///
/// /ratings                     filtered page of ratings (POST)
/// /ratings/create              create (POST)
/// /ratings/{id}                get, update, delete
///
/// /dashboard/kpi               headline counters (GET)
/// /dashboard/status-distribution
/// /dashboard/source-distribution
/// /dashboard/team-distribution
/// /dashboard/score-trend       average rating score per period (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/scripts", scripts::router())
        .nest("/ratings", ratings::router())
        .nest("/dashboard", dashboard::router())
}
