//! Integration tests for the `/api/scripts` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_fills_defaults_and_generates_code(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/scripts/create",
        json!({"name": "逆袭之路", "genre": "都市"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["code"], 200);
    assert_eq!(json["message"], "Created");

    let data = &json["data"];
    let id = data["id"].as_i64().unwrap();
    assert_eq!(data["scriptId"], format!("SP{id:03}"));
    assert_eq!(data["name"], "逆袭之路");
    assert_eq!(data["isProject"], false);
    assert_eq!(data["avgScore"], 0.0);
    assert_eq!(data["ratingCount"], 0);
    assert!(data["submitDate"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_accepts_numeric_project_flag(pool: PgPool) {
    let data = common::create_script(
        &pool,
        json!({"name": "项目剧", "isProject": 1, "submitDate": "2025-03-04"}),
    )
    .await;

    assert_eq!(data["isProject"], true);
    assert_eq!(data["submitDate"], "2025-03-04");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_coerces_numeric_name_and_ignores_wrong_types(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/scripts/create",
        json!({"name": 123, "genre": {"nested": true}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["name"], "123");
    assert!(data["genre"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_script_code_returns_409(pool: PgPool) {
    common::create_script(&pool, json!({"scriptId": "X-1"})).await;

    let response = post_json(
        build_test_app(pool),
        "/api/scripts/create",
        json!({"scriptId": "X-1"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], 409);
    assert!(json["data"].is_null());
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_pages_and_reports_total(pool: PgPool) {
    for i in 0..12 {
        common::create_script(&pool, json!({"name": format!("script-{i}")})).await;
    }

    let response = post_json(
        build_test_app(pool),
        "/api/scripts",
        json!({"page": 3, "limit": 5, "sortBy": "id", "sortOrder": "asc"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total"], 12);
    assert_eq!(data["page"], 3);
    assert_eq!(data["limit"], 5);
    let names: Vec<&str> = data["list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["script-10", "script-11"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_accepts_empty_filter_and_bad_paging(pool: PgPool) {
    common::create_script(&pool, json!({"name": "only"})).await;

    let response = post_json(
        build_test_app(pool),
        "/api/scripts",
        json!({"page": 0, "limit": -3, "sortBy": "nonsense"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["page"], 1);
    assert_eq!(data["limit"], 10);
    assert_eq!(data["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_accepts_string_paging_and_skips_bad_scores(pool: PgPool) {
    for i in 0..3 {
        common::create_script(&pool, json!({"name": format!("script-{i}")})).await;
    }

    let response = post_json(
        build_test_app(pool),
        "/api/scripts",
        json!({"page": "2", "limit": "2", "minScore": "abc", "maxScore": "80"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["page"], 2);
    assert_eq!(data["limit"], 2);
    assert_eq!(data["total"], 3);
    assert_eq!(data["list"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_keyword_and_tab(pool: PgPool) {
    common::create_script(&pool, json!({"name": "霸总归来", "isProject": true})).await;
    common::create_script(&pool, json!({"name": "乡村教师", "scriptId": "霸总-02"})).await;
    common::create_script(&pool, json!({"name": "星际迷航"})).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/scripts",
        json!({"keyword": "霸总"}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["total"], 2);

    let response = post_json(
        build_test_app(pool),
        "/api/scripts",
        json!({"keyword": "霸总", "tab": "project"}),
    )
    .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total"], 1);
    assert_eq!(data["list"][0]["name"], "霸总归来");
}

// ---------------------------------------------------------------------------
// Get / update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_script_returns_404_envelope(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/scripts/9999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], 404);
    assert_eq!(json["message"], "Script with id 9999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_changes_only_present_fields(pool: PgPool) {
    let created =
        common::create_script(&pool, json!({"name": "原名", "genre": "悬疑", "team": "A组"})).await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/scripts/{id}"),
        json!({"name": "新名", "genre": null}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Updated");
    let data = &json["data"];
    assert_eq!(data["name"], "新名");
    assert!(data["genre"].is_null());
    assert_eq!(data["team"], "A组");
    assert_eq!(data["scriptId"], created["scriptId"]);
    assert_eq!(data["submitDate"], created["submitDate"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_script_code(pool: PgPool) {
    let created = common::create_script(&pool, json!({"scriptId": "KEEP-1"})).await;
    let id = created["id"].as_i64().unwrap();

    for body in [json!({"scriptId": null}), json!({"scriptId": "OTHER", "name": "x"})] {
        let response = put_json(build_test_app(pool.clone()), &format!("/api/scripts/{id}"), body).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["scriptId"], "KEEP-1");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_script_returns_404(pool: PgPool) {
    let response = put_json(
        build_test_app(pool),
        "/api/scripts/424242",
        json!({"name": "ghost"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_then_get_is_404(pool: PgPool) {
    let id = common::create_script(&pool, json!({"name": "temp"})).await["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/scripts/{id}");

    let response = delete(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Deleted");
    assert_eq!(json["data"], true);

    let response = get(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Rankings / options / per-script ratings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rankings_attach_rank_and_grade(pool: PgPool) {
    let top = common::create_script(&pool, json!({"name": "top"})).await;
    let mid = common::create_script(&pool, json!({"name": "mid"})).await;
    common::create_script(&pool, json!({"name": "unrated"})).await;

    for (script, score) in [(&top, 92), (&mid, 75)] {
        common::create_rating(
            &pool,
            json!({
                "scriptId": script["id"],
                "userId": 1,
                "contentScore": score,
                "marketScore": score,
                "complianceScore": score,
                "commercialScore": score,
            }),
        )
        .await;
    }

    let response = get(build_test_app(pool), "/api/scripts/rankings?limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let ranked = body_json(response).await["data"].clone();
    let ranked = ranked.as_array().unwrap();

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["rank"], 1);
    assert_eq!(ranked[0]["name"], "top");
    assert_eq!(ranked[0]["grade"], "S");
    assert_eq!(ranked[1]["rank"], 2);
    assert_eq!(ranked[1]["grade"], "B+");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn options_lists_distinct_non_blank_values(pool: PgPool) {
    common::create_script(&pool, json!({"team": "B组", "genre": "古装"})).await;
    common::create_script(&pool, json!({"team": "A组", "genre": "  "})).await;
    common::create_script(&pool, json!({"team": "A组"})).await;

    let response = get(build_test_app(pool), "/api/scripts/options").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["teams"], json!(["A组", "B组"]));
    assert_eq!(data["genres"], json!(["古装"]));
    assert_eq!(data["writers"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn script_ratings_require_existing_script(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/scripts/77/ratings").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Script with id 77 not found");
}
