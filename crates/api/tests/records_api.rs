//! HTTP-level integration tests for the CRUD dashboard endpoints.
//!
//! Each test starts its own session, so every table begins with the two
//! seed rows (Alice, 30) and (Bob, 25).

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json, start_session};
use serde_json::{json, Value};

async fn rows(app: &axum::Router, session: &str) -> Vec<Value> {
    let json = body_json(get(app, "/api/v1/records", Some(session)).await).await;
    json["data"]["rows"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_seed_rows_and_columns() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = get(&app, "/api/v1/records", Some(&s)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["columns"], json!(["ID", "Name", "Age"]));
    assert_eq!(
        json["data"]["rows"],
        json!([
            { "id": 1, "name": "Alice", "age": 30 },
            { "id": 2, "name": "Bob", "age": 25 }
        ])
    );
    assert!(json["data"]["message"].is_null());
}

#[tokio::test]
async fn empty_table_reports_info_message() {
    let app = build_test_app();
    let s = start_session(&app).await;

    delete(&app, "/api/v1/records/1", Some(&s)).await;
    delete(&app, "/api/v1/records/2", Some(&s)).await;

    let json = body_json(get(&app, "/api/v1/records", Some(&s)).await).await;
    assert_eq!(json["data"]["rows"], json!([]));
    assert_eq!(json["data"]["message"], "No entries to display.");

    let ids = body_json(get(&app, "/api/v1/records/ids", Some(&s)).await).await;
    assert_eq!(ids["data"], json!([]));
}

#[tokio::test]
async fn ids_lists_select_options() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let json = body_json(get(&app, "/api/v1/records/ids", Some(&s)).await).await;
    assert_eq!(json["data"], json!([1, 2]));
}

#[tokio::test]
async fn get_single_record() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = get(&app, "/api/v1/records/2", Some(&s)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Bob");

    let response = get(&app, "/api/v1/records/99", Some(&s)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_read_shows_new_row() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = post_json(
        &app,
        "/api/v1/records",
        Some(&s),
        json!({ "name": "  Carol  ", "age": 41 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], 3);
    assert_eq!(json["data"]["name"], "Carol");
    assert_eq!(json["data"]["message"], "Entry added successfully!");

    let rows = rows(&app, &s).await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2], json!({ "id": 3, "name": "Carol", "age": 41 }));
}

#[tokio::test]
async fn create_with_empty_name_is_rejected() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = post_json(
        &app,
        "/api/v1/records",
        Some(&s),
        json!({ "name": "   ", "age": 20 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Name cannot be empty!");
    assert_eq!(rows(&app, &s).await.len(), 2);
}

#[tokio::test]
async fn create_with_long_name_is_rejected() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = post_json(
        &app,
        "/api/v1/records",
        Some(&s),
        json!({ "name": "a".repeat(51), "age": 20 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Name is too long! Please keep it under 50 characters."
    );
}

#[tokio::test]
async fn create_with_negative_age_is_rejected() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = post_json(
        &app,
        "/api/v1/records",
        Some(&s),
        json!({ "name": "Dan", "age": -3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Age cannot be negative!");
}

#[tokio::test]
async fn create_with_fractional_age_is_bad_request() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = post_json(
        &app,
        "/api/v1/records",
        Some(&s),
        json!({ "name": "Bob", "age": 30.5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
    assert_eq!(rows(&app, &s).await.len(), 2);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_changes_only_target_row() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = put_json(
        &app,
        "/api/v1/records/1",
        Some(&s),
        json!({ "name": "Alicia", "age": 31 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["message"],
        "Entry updated successfully!"
    );

    assert_eq!(
        rows(&app, &s).await,
        vec![
            json!({ "id": 1, "name": "Alicia", "age": 31 }),
            json!({ "id": 2, "name": "Bob", "age": 25 }),
        ]
    );
}

#[tokio::test]
async fn update_missing_row_is_not_found() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = put_json(
        &app,
        "/api/v1/records/7",
        Some(&s),
        json!({ "name": "Zed", "age": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_update_leaves_row_unchanged() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = put_json(
        &app,
        "/api/v1/records/2",
        Some(&s),
        json!({ "name": "", "age": 99 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(rows(&app, &s).await[1], json!({ "id": 2, "name": "Bob", "age": 25 }));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_exactly_one_row() {
    let app = build_test_app();
    let s = start_session(&app).await;

    post_json(&app, "/api/v1/records", Some(&s), json!({ "name": "Carol", "age": 41 })).await;

    let response = delete(&app, "/api/v1/records/2", Some(&s)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Bob");
    assert_eq!(json["data"]["message"], "Entry deleted successfully!");

    let ids: Vec<i64> = rows(&app, &s)
        .await
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn delete_missing_row_is_not_found() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = delete(&app, "/api/v1/records/5", Some(&s)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(rows(&app, &s).await.len(), 2);
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = build_test_app();
    let s = start_session(&app).await;

    let response = get(&app, "/api/v1/records/abc", Some(&s)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = delete(&app, "/api/v1/records/abc", Some(&s)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    assert_eq!(rows(&app, &s).await.len(), 2);
}

#[tokio::test]
async fn ids_follow_max_plus_one_after_delete() {
    let app = build_test_app();
    let s = start_session(&app).await;

    delete(&app, "/api/v1/records/2", Some(&s)).await;
    let response =
        post_json(&app, "/api/v1/records", Some(&s), json!({ "name": "Eve", "age": 22 })).await;
    assert_eq!(body_json(response).await["data"]["id"], 2);
}
