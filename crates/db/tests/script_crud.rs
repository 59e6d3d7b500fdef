//! Integration tests for script create / update / delete and options.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use deepdrama_core::dates::today;
use deepdrama_db::models::script::{CreateScript, UpdateScript};
use deepdrama_db::repositories::ScriptRepo;
use rust_decimal::Decimal;
use sqlx::PgPool;

fn named(name: &str) -> CreateScript {
    CreateScript {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn patch(json: serde_json::Value) -> UpdateScript {
    serde_json::from_value(json).unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults(pool: PgPool) {
    let script = ScriptRepo::create(&pool, &named("Fresh")).await.unwrap();

    assert_eq!(script.submit_date, today());
    assert_eq!(script.avg_score, Decimal::ZERO);
    assert_eq!(script.rating_count, 0);
    assert!(!script.is_project);
    assert_eq!(script.script_id, Some(format!("SP{:03}", script.id)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_keeps_supplied_code_and_date(pool: PgPool) {
    let input: CreateScript = serde_json::from_value(serde_json::json!({
        "scriptId": "EXT-9",
        "name": "Imported",
        "submitDate": "2025-03-04",
        "isProject": "1",
        "unknownField": {"nested": true},
    }))
    .unwrap();
    let script = ScriptRepo::create(&pool, &input).await.unwrap();

    assert_eq!(script.script_id.as_deref(), Some("EXT-9"));
    assert_eq!(script.submit_date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    assert!(script.is_project);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_code_violates_unique_constraint(pool: PgPool) {
    let input = CreateScript {
        script_id: Some("DUP".into()),
        ..Default::default()
    };
    ScriptRepo::create(&pool, &input).await.unwrap();
    let err = ScriptRepo::create(&pool, &input).await.unwrap_err();

    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_scripts_script_id")
    );
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn single_field_update_changes_only_that_field(pool: PgPool) {
    let before = ScriptRepo::create(
        &pool,
        &CreateScript {
            name: Some("Before".into()),
            status: Some("一卡初稿".into()),
            remarks: Some("note".into()),
            writer: Some("Lin".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let after = ScriptRepo::update(&pool, before.id, &patch(serde_json::json!({"status": "终稿"})))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(after.status.as_deref(), Some("终稿"));
    assert_eq!(after.name, before.name);
    assert_eq!(after.remarks, before.remarks);
    assert_eq!(after.writer, before.writer);
    assert_eq!(after.script_id, before.script_id);
    assert_eq!(after.submit_date, before.submit_date);
    assert_eq!(after.avg_score, before.avg_score);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_null_clears_and_bad_date_is_ignored(pool: PgPool) {
    let created = ScriptRepo::create(
        &pool,
        &CreateScript {
            remarks: Some("drop me".into()),
            submit_date: NaiveDate::from_ymd_opt(2025, 5, 5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let updated = ScriptRepo::update(
        &pool,
        created.id,
        &patch(serde_json::json!({"remarks": null, "submitDate": "not a date"})),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.remarks, None);
    assert_eq!(updated.submit_date, NaiveDate::from_ymd_opt(2025, 5, 5).unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_returns_none(pool: PgPool) {
    let result = ScriptRepo::update(&pool, 999_999, &patch(serde_json::json!({"name": "x"})))
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_row_once(pool: PgPool) {
    let script = ScriptRepo::create(&pool, &named("Doomed")).await.unwrap();

    assert!(ScriptRepo::delete(&pool, script.id).await.unwrap());
    assert!(ScriptRepo::find_by_id(&pool, script.id).await.unwrap().is_none());
    assert!(!ScriptRepo::delete(&pool, script.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn options_are_distinct_and_non_blank(pool: PgPool) {
    for (writer, team) in [("Lin", "A组"), ("Lin", "B组"), ("  ", "A组"), ("Zhao", "")] {
        ScriptRepo::create(
            &pool,
            &CreateScript {
                writer: Some(writer.into()),
                team: Some(team.into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let options = ScriptRepo::options(&pool).await.unwrap();
    assert_eq!(options.writers, vec!["Lin".to_string(), "Zhao".to_string()]);
    assert_eq!(options.teams, vec!["A组".to_string(), "B组".to_string()]);
    assert!(options.producers.is_empty());
}
