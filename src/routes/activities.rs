// SPDX-License-Identifier: MIT

//! Activity CRUD, bulk delete, and statistics routes.

use crate::error::{ApiError, Result};
use crate::models::{
    Activity, ActivityPage, ActivityStats, BulkDeleteRequest, BulkDeleteResponse,
    CreateActivityRequest, ListParams, StatsParams, UpdateActivityRequest,
};
use crate::routes::simulate_delay;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;

// Per-operation artificial delays (reads 250-500ms, writes 300-350ms).
const LIST_DELAY: Duration = Duration::from_millis(400);
const DETAIL_DELAY: Duration = Duration::from_millis(250);
const STATS_DELAY: Duration = Duration::from_millis(500);
const CREATE_DELAY: Duration = Duration::from_millis(350);
const UPDATE_DELAY: Duration = Duration::from_millis(300);
const DELETE_DELAY: Duration = Duration::from_millis(300);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/bulk-delete", post(bulk_delete_activities))
        .route(
            "/activities/{id}",
            get(get_activity)
                .put(update_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
        .route("/activities-stats", get(get_stats))
}

/// List activities with filtering, sorting, and pagination.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ActivityPage>> {
    tracing::debug!(
        page = params.page,
        limit = params.limit,
        types = ?params.types,
        search = ?params.search,
        "Listing activities"
    );

    simulate_delay(&state, LIST_DELAY).await;

    let store = state.store.read().await;
    let page = store.list(&params)?;
    Ok(Json(page))
}

/// Get a single activity by id.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    simulate_delay(&state, DETAIL_DELAY).await;

    let store = state.store.read().await;
    Ok(Json(store.get(&id)?))
}

/// Create an activity. Responds 201 with the stored record.
async fn create_activity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>)> {
    simulate_delay(&state, CREATE_DELAY).await;

    let mut store = state.store.write().await;
    let activity = store.create(req)?;
    tracing::info!(id = %activity.id, title = %activity.title, "Activity created");
    Ok((StatusCode::CREATED, Json(activity)))
}

/// Update an activity. PUT and PATCH both merge provided fields over the
/// stored record (see DESIGN.md).
async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateActivityRequest>,
) -> Result<Json<Activity>> {
    simulate_delay(&state, UPDATE_DELAY).await;

    let mut store = state.store.write().await;
    let activity = store.update(&id, req)?;
    tracing::info!(id = %activity.id, "Activity updated");
    Ok(Json(activity))
}

/// Delete an activity. Responds 204 with no body.
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    simulate_delay(&state, DELETE_DELAY).await;

    let mut store = state.store.write().await;
    store.delete(&id)?;
    tracing::info!(id = %id, "Activity deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete all matching ids in one pass; ids not found are silently ignored.
/// A malformed body (ids missing or not an array) is a validation error, not
/// the extractor's default 422.
async fn bulk_delete_activities(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Result<Json<BulkDeleteResponse>> {
    let Json(req) =
        payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    if req.ids.is_empty() {
        return Err(ApiError::validation("ids must be a non-empty array"));
    }

    simulate_delay(&state, DELETE_DELAY).await;

    let mut store = state.store.write().await;
    let deleted_count = store.bulk_delete(&req.ids);
    tracing::info!(requested = req.ids.len(), deleted_count, "Bulk delete");

    Ok(Json(BulkDeleteResponse {
        message: format!("{} activities deleted", deleted_count),
        deleted_count,
    }))
}

/// Compute statistics over the type/date-filtered activity set.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> Result<Json<ActivityStats>> {
    simulate_delay(&state, STATS_DELAY).await;

    let store = state.store.read().await;
    Ok(Json(store.stats(&params)))
}
