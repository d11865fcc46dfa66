// SPDX-License-Identifier: MIT

//! Sync service: typed reads through the query cache and the mutation
//! protocol (confirmed write -> direct cache patch -> invalidation).
//!
//! Reads never hit the network when a fresh slot exists; mutations patch the
//! affected slots first so the UI reflects a known-successful write before
//! any invalidation-triggered refetch resolves. No optimistic write happens
//! before the server confirms.

use std::sync::Arc;

use crate::client::api::ActivityApi;
use crate::client::cache::{
    EntityKind, KeyPrefix, QueryCache, QueryKey, Scope, DETAIL_STALE_AFTER, GOAL_STALE_AFTER,
    LIST_STALE_AFTER, STATS_STALE_AFTER,
};
use crate::client::filters::ActivityFilters;
use crate::error::Result;
use crate::models::{
    Activity, ActivityPage, ActivityStats, BulkDeleteResponse, CreateActivityRequest,
    CreateGoalRequest, Goal, ListParams, StatsParams, UpdateActivityRequest, UpdateGoalRequest,
};

/// Client-side data layer: one cache, one API, explicit lifecycle.
pub struct SyncService {
    api: Arc<dyn ActivityApi>,
    cache: QueryCache,
}

impl SyncService {
    pub fn new(api: Arc<dyn ActivityApi>) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
        }
    }

    /// Direct cache access (peek for rendering, tests).
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // ─── Keys ────────────────────────────────────────────────────

    pub fn list_key(params: &ListParams) -> QueryKey {
        let mut key = QueryKey::new(EntityKind::Activities, Scope::List)
            .with_param("page", params.page)
            .with_param("limit", params.limit)
            .with_param("sortBy", format!("{:?}", params.sort_by).to_lowercase())
            .with_param("sortOrder", format!("{:?}", params.sort_order).to_lowercase());
        if let Some(types) = &params.types {
            key = key.with_param("types", types);
        }
        if let Some(search) = &params.search {
            key = key.with_param("search", search);
        }
        if let Some(start) = &params.start_date {
            key = key.with_param("startDate", start.to_rfc3339());
        }
        if let Some(end) = &params.end_date {
            key = key.with_param("endDate", end.to_rfc3339());
        }
        key
    }

    pub fn detail_key(id: &str) -> QueryKey {
        QueryKey::new(EntityKind::Activities, Scope::Detail).with_param("id", id)
    }

    pub fn stats_key(params: &StatsParams) -> QueryKey {
        let mut key = QueryKey::new(EntityKind::Activities, Scope::Stats);
        if let Some(t) = params.activity_type {
            key = key.with_param("type", t);
        }
        if let Some(start) = &params.start_date {
            key = key.with_param("startDate", start.to_rfc3339());
        }
        if let Some(end) = &params.end_date {
            key = key.with_param("endDate", end.to_rfc3339());
        }
        key
    }

    pub fn goal_key(user_id: &str) -> QueryKey {
        QueryKey::new(EntityKind::Goals, Scope::Detail).with_param("userId", user_id)
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// List activities for the current filter state.
    pub async fn activities(&self, filters: &ActivityFilters) -> Result<Arc<ActivityPage>> {
        self.activities_with(&filters.to_params()).await
    }

    pub async fn activities_with(&self, params: &ListParams) -> Result<Arc<ActivityPage>> {
        let key = Self::list_key(params);
        self.cache
            .fetch(&key, LIST_STALE_AFTER, || self.api.list_activities(params))
            .await
    }

    pub async fn activity(&self, id: &str) -> Result<Arc<Activity>> {
        let key = Self::detail_key(id);
        self.cache
            .fetch(&key, DETAIL_STALE_AFTER, || self.api.get_activity(id))
            .await
    }

    pub async fn stats(&self, params: &StatsParams) -> Result<Arc<ActivityStats>> {
        let key = Self::stats_key(params);
        self.cache
            .fetch(&key, STATS_STALE_AFTER, || self.api.get_stats(params))
            .await
    }

    pub async fn goal(&self, user_id: &str) -> Result<Arc<Goal>> {
        let key = Self::goal_key(user_id);
        self.cache
            .fetch(&key, GOAL_STALE_AFTER, || self.api.get_goal(user_id))
            .await
    }

    // ─── Mutations ───────────────────────────────────────────────

    /// Create an activity. On success the new record is written into the
    /// detail slot and prepended to the default list slot, then list and
    /// stats slots are invalidated. On failure the cache is untouched.
    pub async fn create_activity(&self, req: CreateActivityRequest) -> Result<Activity> {
        let created = self.api.create_activity(&req).await?;

        self.cache
            .set_data(&Self::detail_key(&created.id), created.clone());

        let default_key = Self::list_key(&ListParams::default());
        let prepend = created.clone();
        self.cache.patch::<ActivityPage, _>(&default_key, |page| {
            page.activities.insert(0, prepend);
            page.total += 1;
            page.total_pages = page.total.div_ceil(page.limit.max(1));
        });

        self.invalidate_activity_views();
        tracing::debug!(id = %created.id, "Activity created and cached");
        Ok(created)
    }

    /// Update an activity; patches the detail slot and every cached list
    /// slot in place before invalidating.
    pub async fn update_activity(
        &self,
        id: &str,
        req: UpdateActivityRequest,
    ) -> Result<Activity> {
        let updated = self.api.update_activity(id, &req).await?;

        self.cache.set_data(&Self::detail_key(id), updated.clone());
        self.patch_cached_lists(|page| {
            for activity in page.activities.iter_mut() {
                if activity.id == updated.id {
                    *activity = updated.clone();
                }
            }
        });

        self.invalidate_activity_views();
        Ok(updated)
    }

    /// Delete an activity; evicts the detail slot and removes the record
    /// from cached list slots before invalidating.
    pub async fn delete_activity(&self, id: &str) -> Result<()> {
        self.api.delete_activity(id).await?;

        self.cache.remove(&Self::detail_key(id));
        self.patch_cached_lists(|page| {
            let before = page.activities.len();
            page.activities.retain(|a| a.id != id);
            page.total -= (before - page.activities.len()) as u32;
            page.total_pages = page.total.div_ceil(page.limit.max(1));
        });

        self.invalidate_activity_views();
        Ok(())
    }

    /// Bulk delete; ids not present on the server are silently ignored.
    pub async fn bulk_delete_activities(&self, ids: &[String]) -> Result<BulkDeleteResponse> {
        let response = self.api.bulk_delete_activities(ids).await?;

        for id in ids {
            self.cache.remove(&Self::detail_key(id));
        }
        self.patch_cached_lists(|page| {
            let before = page.activities.len();
            page.activities.retain(|a| !ids.contains(&a.id));
            page.total -= (before - page.activities.len()) as u32;
            page.total_pages = page.total.div_ceil(page.limit.max(1));
        });

        self.invalidate_activity_views();
        Ok(response)
    }

    /// Create or overwrite the goal. The cached goal is replaced wholesale
    /// on every mutation response; there is no merge.
    pub async fn save_goal(&self, req: CreateGoalRequest) -> Result<Goal> {
        let goal = self.api.create_goal(&req).await?;
        self.cache.set_data(&Self::goal_key(&goal.user_id), goal.clone());
        Ok(goal)
    }

    pub async fn update_goal(&self, user_id: &str, req: UpdateGoalRequest) -> Result<Goal> {
        let goal = self.api.update_goal(user_id, &req).await?;
        self.cache.set_data(&Self::goal_key(user_id), goal.clone());
        Ok(goal)
    }

    pub async fn reset_goal(&self, user_id: &str) -> Result<Goal> {
        let goal = self.api.reset_goal(user_id).await?;
        self.cache.set_data(&Self::goal_key(user_id), goal.clone());
        Ok(goal)
    }

    // ─── Internals ───────────────────────────────────────────────

    fn patch_cached_lists<F>(&self, patch: F)
    where
        F: Fn(&mut ActivityPage),
    {
        let prefix = KeyPrefix::scoped(EntityKind::Activities, Scope::List);
        for key in self.cache.keys_matching(&prefix) {
            self.cache.patch::<ActivityPage, _>(&key, &patch);
        }
    }

    fn invalidate_activity_views(&self) {
        self.cache
            .invalidate(&KeyPrefix::scoped(EntityKind::Activities, Scope::List));
        self.cache
            .invalidate(&KeyPrefix::scoped(EntityKind::Activities, Scope::Stats));
    }
}
