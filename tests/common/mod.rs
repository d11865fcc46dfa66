// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{header, Method, Request};
use fitlog::config::Config;
use fitlog::models::{Activity, ActivityType};
use fitlog::routes::create_router;
use fitlog::store::ActivityStore;
use fitlog::AppState;
use http_body_util::BodyExt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Create a test app with an empty store and no artificial latency.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(ActivityStore::new())
}

/// Create a test app over a pre-seeded store.
#[allow(dead_code)]
pub fn create_test_app_with(store: ActivityStore) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        store: RwLock::new(store),
    });
    (create_router(state.clone()), state)
}

/// Five activities across five days, unsorted order matching head-insert.
#[allow(dead_code)]
pub fn seeded_store() -> ActivityStore {
    ActivityStore::with_activities(vec![
        make_activity("a1", "Morning Run", ActivityType::Run, "2024-05-29T06:00:00Z", 30),
        make_activity("a2", "Evening Walk", ActivityType::Walk, "2024-05-28T19:00:00Z", 45),
        make_activity("a3", "Trail Hike", ActivityType::Hike, "2024-05-27T09:00:00Z", 120),
        make_activity("a4", "Lake Swim", ActivityType::Swim, "2024-05-26T07:30:00Z", 40),
        make_activity("a5", "Gym Workout", ActivityType::Workout, "2024-05-25T18:00:00Z", 60),
    ])
}

#[allow(dead_code)]
pub fn make_activity(
    id: &str,
    title: &str,
    activity_type: ActivityType,
    date: &str,
    duration: u32,
) -> Activity {
    Activity {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        activity_type,
        duration,
        date: date.parse().expect("valid date"),
        time: "06:00".to_string(),
    }
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Build a bodiless request.
#[allow(dead_code)]
pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// Collect a response body into JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}
