//! Workflow tests against PostgreSQL. Need `DATABASE_URL`; run with
//! `cargo test -- --ignored`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use sqlx::PgPool;
use stratologia_test_support::RecordingNotifier;

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_submit_and_approve_round_trip(pool: PgPool) {
    // Arrange
    let notifier = Arc::new(RecordingNotifier::new());
    let app = common::build_pg_test_app(pool.clone(), notifier.clone());

    // Act
    let (status, json) = common::post_json(
        app.clone(),
        "/applications",
        &serde_json::json!({
            "citizen_national_id": "AB123",
            "type": "enlistment",
            "desired_branch": "navy"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "pending");
    let id = json["id"].as_i64().unwrap();

    let (status, json) = common::post_empty(app.clone(), &format!("/applications/{id}/approve")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "approved");
    assert_eq!(notifier.sent().len(), 1);

    let stored: String = sqlx::query_scalar("SELECT status FROM applications WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "approved");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_repeat_submission_creates_one_citizen(pool: PgPool) {
    let app = common::build_pg_test_app(pool.clone(), Arc::new(RecordingNotifier::new()));
    let body = serde_json::json!({
        "citizen_national_id": "XY999",
        "type": "deferment",
        "desired_branch": "army"
    });

    common::post_json(app.clone(), "/applications", &body).await;
    common::post_json(app, "/applications", &body).await;

    let citizens: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM citizens")
        .fetch_one(&pool)
        .await
        .unwrap();
    let applications: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(citizens, 1);
    assert_eq!(applications, 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_approve_missing_application_returns_404(pool: PgPool) {
    let app = common::build_pg_test_app(pool, Arc::new(RecordingNotifier::new()));

    let (status, json) = common::post_empty(app, "/applications/12345/approve").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "application_not_found");
}
