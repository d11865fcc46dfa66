// SPDX-License-Identifier: MIT

//! Integration tests for the statistics endpoint: totals, type filter, and
//! date-range filter.

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app_with, empty_request, seeded_store};

#[tokio::test]
async fn test_stats_totals_over_full_set() {
    let (app, _state) = create_test_app_with(seeded_store());

    let response = app
        .oneshot(empty_request(Method::GET, "/activities-stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totalActivities"], 5);
    assert_eq!(body["totalDuration"], 30 + 45 + 120 + 40 + 60);
    assert_eq!(body["averageDuration"], 59.0);
    assert_eq!(body["activitiesByType"]["RUN"], 1);
    assert_eq!(body["activitiesByType"]["HIKE"], 1);
    assert_eq!(body["activitiesByDate"]["2024-05-29"], 1);
}

#[tokio::test]
async fn test_stats_single_type_filter() {
    let (app, _state) = create_test_app_with(seeded_store());

    let response = app
        .oneshot(empty_request(Method::GET, "/activities-stats?type=HIKE"))
        .await
        .unwrap();
    let body = body_json(response).await;

    assert_eq!(body["totalActivities"], 1);
    assert_eq!(body["totalDuration"], 120);
    assert_eq!(body["averageDuration"], 120.0);
    assert!(body["activitiesByType"].get("RUN").is_none());
}

#[tokio::test]
async fn test_stats_date_range_inclusive() {
    let (app, _state) = create_test_app_with(seeded_store());

    let uri =
        "/activities-stats?startDate=2024-05-26T07:30:00Z&endDate=2024-05-28T19:00:00Z";
    let response = app
        .oneshot(empty_request(Method::GET, uri))
        .await
        .unwrap();
    let body = body_json(response).await;

    // a2, a3, a4 fall in range; both boundaries count.
    assert_eq!(body["totalActivities"], 3);
    assert_eq!(body["totalDuration"], 45 + 120 + 40);
}

#[tokio::test]
async fn test_stats_empty_store() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(empty_request(Method::GET, "/activities-stats"))
        .await
        .unwrap();
    let body = body_json(response).await;

    assert_eq!(body["totalActivities"], 0);
    assert_eq!(body["averageDuration"], 0.0);
}
