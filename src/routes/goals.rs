// SPDX-License-Identifier: MIT

//! Goal routes. The goal is a singleton keyed by user id: create and patch
//! both overwrite the same record, and delete resets it to the default.

use crate::error::Result;
use crate::models::{CreateGoalRequest, Goal, UpdateGoalRequest};
use crate::routes::simulate_delay;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;

const READ_DELAY: Duration = Duration::from_millis(250);
const WRITE_DELAY: Duration = Duration::from_millis(300);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", post(create_goal))
        .route(
            "/goals/{user_id}",
            get(get_goal).patch(patch_goal).delete(reset_goal),
        )
}

/// Get the user's goal, falling back to the default record.
async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Goal>> {
    simulate_delay(&state, READ_DELAY).await;

    let store = state.store.read().await;
    Ok(Json(store.goal(&user_id)))
}

/// Create (or overwrite) the user's goal.
async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>)> {
    simulate_delay(&state, WRITE_DELAY).await;

    let mut store = state.store.write().await;
    let goal = store.upsert_goal(req)?;
    tracing::info!(user_id = %goal.user_id, "Goal saved");
    Ok((StatusCode::CREATED, Json(goal)))
}

/// Apply a partial update; the result replaces the singleton wholesale.
async fn patch_goal(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Json<Goal>> {
    simulate_delay(&state, WRITE_DELAY).await;

    let mut store = state.store.write().await;
    let goal = store.patch_goal(&user_id, req);
    tracing::info!(user_id = %user_id, "Goal updated");
    Ok(Json(goal))
}

/// Reset the user's goal to the fixed default record.
async fn reset_goal(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Goal>> {
    simulate_delay(&state, WRITE_DELAY).await;

    let mut store = state.store.write().await;
    let goal = store.reset_goal(&user_id);
    tracing::info!(user_id = %user_id, "Goal reset to default");
    Ok(Json(goal))
}
