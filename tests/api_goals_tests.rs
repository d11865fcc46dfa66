// SPDX-License-Identifier: MIT

//! Integration tests for the goal singleton: default-on-read, overwrite on
//! create, partial patch, and delete-as-reset.

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, empty_request, json_request};

#[tokio::test]
async fn test_get_returns_default_goal_when_none_saved() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(empty_request(Method::GET, "/goals/u1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], "goal-u1");
    assert_eq!(body["userId"], "u1");
    assert_eq!(body["type"], "count");
    assert_eq!(body["target"], 1);
    assert_eq!(body["frequency"], "daily");
}

#[tokio::test]
async fn test_create_overwrites_and_keeps_id() {
    let (app, _state) = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/goals",
            json!({"userId": "u1", "type": "duration", "target": 30}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = body_json(response).await;
    let first_id = first["id"].as_str().unwrap().to_string();

    // Second create for the same user replaces the goal, not adds one.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/goals",
            json!({"userId": "u1", "type": "count", "target": 2}),
        ))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(second["id"], first_id.as_str());
    assert_eq!(second["type"], "count");

    let response = app
        .oneshot(empty_request(Method::GET, "/goals/u1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["target"], 2);
}

#[tokio::test]
async fn test_create_rejects_zero_target() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/goals",
            json!({"userId": "u1", "type": "count", "target": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_patch_merges_fields() {
    let (app, _state) = create_test_app();

    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/goals",
            json!({
                "userId": "u1",
                "type": "duration",
                "target": 30,
                "frequency": "weekly",
                "weeklyTarget": 210
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            "/goals/u1",
            json!({"target": 45}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["target"], 45);
    assert_eq!(body["type"], "duration"); // untouched fields survive
    assert_eq!(body["weeklyTarget"], 210);
}

#[tokio::test]
async fn test_delete_resets_to_default() {
    let (app, _state) = create_test_app();

    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/goals",
            json!({"userId": "u1", "type": "duration", "target": 60}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request(Method::DELETE, "/goals/u1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["type"], "count");
    assert_eq!(body["target"], 1);
    assert_eq!(body["id"], "goal-u1");
}
