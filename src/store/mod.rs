// SPDX-License-Identifier: MIT

//! In-memory activity store backing the development API server.
//!
//! Implements the exact filtering/sorting/pagination/statistics contract the
//! HTTP layer exposes, so the client and its tests are written against the
//! same semantics a real backend would provide.

use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use validator::Validate;

use crate::error::{ApiError, Result};
use crate::models::{
    Activity, ActivityPage, ActivityStats, ActivityType, CreateActivityRequest, CreateGoalRequest,
    Goal, ListParams, SortField, SortOrder, StatsParams, UpdateActivityRequest, UpdateGoalRequest,
};

/// In-memory store: activity list (most-recent-first) and one goal per user.
#[derive(Debug, Default)]
pub struct ActivityStore {
    activities: Vec<Activity>,
    goals: HashMap<String, Goal>,
    next_id: u64,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records (tests and dev fixtures).
    /// Keeps the given order, which becomes the unsorted list order.
    pub fn with_activities(activities: Vec<Activity>) -> Self {
        let next_id = activities.len() as u64;
        Self {
            activities,
            goals: HashMap::new(),
            next_id,
        }
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    // ─── Activities ──────────────────────────────────────────────

    /// List activities: filter, sort, then paginate.
    ///
    /// Filters apply in order: type set, inclusive date range, case-insensitive
    /// substring search over title or description.
    pub fn list(&self, params: &ListParams) -> Result<ActivityPage> {
        if params.page < 1 {
            return Err(ApiError::validation("page must be greater than 0"));
        }
        if params.limit < 1 {
            return Err(ApiError::validation("limit must be greater than 0"));
        }

        let types = params
            .parsed_types()
            .map_err(ApiError::validation)?;

        let mut matched: Vec<Activity> = self
            .activities
            .iter()
            .filter(|a| types.is_empty() || types.contains(&a.activity_type))
            .filter(|a| in_date_range(a, params.start_date, params.end_date))
            .filter(|a| matches_search(a, params.search.as_deref()))
            .cloned()
            .collect();

        matched.sort_by(|a, b| compare_activities(a, b, params.sort_by, params.sort_order));

        let total = matched.len() as u32;
        let total_pages = total.div_ceil(params.limit);

        let start = (params.page as usize - 1)
            .checked_mul(params.limit as usize)
            .ok_or_else(|| ApiError::validation("page number causes overflow"))?;

        let activities = if start < matched.len() {
            let end = start.saturating_add(params.limit as usize).min(matched.len());
            matched[start..end].to_vec()
        } else {
            vec![]
        };

        Ok(ActivityPage {
            activities,
            total,
            page: params.page,
            limit: params.limit,
            total_pages,
        })
    }

    pub fn get(&self, id: &str) -> Result<Activity> {
        self.activities
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| ApiError::activity_not_found(id))
    }

    /// Create an activity. Requires title and type; defaults duration to 0 and
    /// description/time to empty. New records go to the head of the list so
    /// the default view is most-recent-first.
    pub fn create(&mut self, req: CreateActivityRequest) -> Result<Activity> {
        req.validate()?;

        // validate() guarantees title and type are present
        let title = req.title.unwrap_or_default();
        let activity_type = req
            .activity_type
            .ok_or_else(|| ApiError::validation("type is required"))?;

        self.next_id += 1;
        let activity = Activity {
            id: format!("act-{}", self.next_id),
            title,
            description: req.description.unwrap_or_default(),
            activity_type,
            duration: req.duration.unwrap_or(0),
            date: req.date.unwrap_or_else(|| Utc::now().fixed_offset()),
            time: req.time.unwrap_or_default(),
        };

        self.activities.insert(0, activity.clone());
        tracing::debug!(id = %activity.id, "Activity created");
        Ok(activity)
    }

    /// Merge provided fields over the stored record. Both PUT and PATCH use
    /// these semantics (see DESIGN.md).
    pub fn update(&mut self, id: &str, req: UpdateActivityRequest) -> Result<Activity> {
        let activity = self
            .activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ApiError::activity_not_found(id))?;

        if let Some(title) = req.title {
            activity.title = title;
        }
        if let Some(description) = req.description {
            activity.description = description;
        }
        if let Some(activity_type) = req.activity_type {
            activity.activity_type = activity_type;
        }
        if let Some(duration) = req.duration {
            activity.duration = duration;
        }
        if let Some(date) = req.date {
            activity.date = date;
        }
        if let Some(time) = req.time {
            activity.time = time;
        }

        Ok(activity.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        if self.activities.len() == before {
            return Err(ApiError::activity_not_found(id));
        }
        Ok(())
    }

    /// Remove all matching ids in one pass. Unknown ids are silently ignored;
    /// the return value is the count actually removed.
    pub fn bulk_delete(&mut self, ids: &[String]) -> u32 {
        let before = self.activities.len();
        self.activities.retain(|a| !ids.contains(&a.id));
        (before - self.activities.len()) as u32
    }

    // ─── Statistics ──────────────────────────────────────────────

    /// Compute statistics over the type/date-filtered set (search does not
    /// apply to stats). Pure with respect to the stored data.
    pub fn stats(&self, params: &StatsParams) -> ActivityStats {
        let filtered: Vec<&Activity> = self
            .activities
            .iter()
            .filter(|a| params.activity_type.map_or(true, |t| a.activity_type == t))
            .filter(|a| in_date_range(a, params.start_date, params.end_date))
            .collect();

        let total_activities = filtered.len() as u32;
        let total_duration: u32 = filtered.iter().map(|a| a.duration).sum();
        let average_duration = if total_activities == 0 {
            0.0
        } else {
            f64::from(total_duration) / f64::from(total_activities)
        };

        let mut activities_by_type: HashMap<String, u32> = HashMap::new();
        let mut activities_by_date: HashMap<String, u32> = HashMap::new();
        for a in &filtered {
            *activities_by_type
                .entry(a.activity_type.to_string())
                .or_insert(0) += 1;
            *activities_by_date
                .entry(crate::time_utils::day_key(a.date.date_naive()))
                .or_insert(0) += 1;
        }

        ActivityStats {
            total_activities,
            total_duration,
            average_duration,
            activities_by_type,
            activities_by_date,
        }
    }

    // ─── Goals ───────────────────────────────────────────────────

    /// Read the user's goal, falling back to the default record.
    pub fn goal(&self, user_id: &str) -> Goal {
        self.goals
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Goal::default_for_user(user_id))
    }

    /// Create or overwrite the user's goal singleton. An existing goal keeps
    /// its id; there is never more than one goal per user.
    pub fn upsert_goal(&mut self, req: CreateGoalRequest) -> Result<Goal> {
        req.validate()?;

        let id = self
            .goals
            .get(&req.user_id)
            .and_then(|g| g.id.clone())
            .unwrap_or_else(|| format!("goal-{}", req.user_id));

        let goal = Goal {
            id: Some(id),
            user_id: req.user_id.clone(),
            goal_type: req.goal_type,
            target: req.target,
            frequency: req.frequency,
            weekly_target: req.weekly_target,
        };

        self.goals.insert(req.user_id, goal.clone());
        Ok(goal)
    }

    /// Apply provided fields over the stored (or default) goal and replace
    /// the singleton wholesale.
    pub fn patch_goal(&mut self, user_id: &str, req: UpdateGoalRequest) -> Goal {
        let mut goal = self.goal(user_id);
        if let Some(goal_type) = req.goal_type {
            goal.goal_type = goal_type;
        }
        if let Some(target) = req.target {
            goal.target = target;
        }
        if let Some(frequency) = req.frequency {
            goal.frequency = frequency;
        }
        if let Some(weekly_target) = req.weekly_target {
            goal.weekly_target = Some(weekly_target);
        }

        self.goals.insert(user_id.to_string(), goal.clone());
        goal
    }

    /// Restore the fixed default goal record.
    pub fn reset_goal(&mut self, user_id: &str) -> Goal {
        let goal = Goal::default_for_user(user_id);
        self.goals.insert(user_id.to_string(), goal.clone());
        goal
    }
}

fn in_date_range(
    activity: &Activity,
    start: Option<chrono::DateTime<chrono::FixedOffset>>,
    end: Option<chrono::DateTime<chrono::FixedOffset>>,
) -> bool {
    // Bounds are inclusive on both ends.
    if let Some(start) = start {
        if activity.date < start {
            return false;
        }
    }
    if let Some(end) = end {
        if activity.date > end {
            return false;
        }
    }
    true
}

fn matches_search(activity: &Activity, search: Option<&str>) -> bool {
    match search {
        None => true,
        Some(term) if term.is_empty() => true,
        Some(term) => {
            let needle = term.to_lowercase();
            activity.title.to_lowercase().contains(&needle)
                || activity.description.to_lowercase().contains(&needle)
        }
    }
}

/// Compare two activities on the requested sort field.
///
/// Missing values are pushed toward the end regardless of direction: if the
/// field is absent on both sides the order is unchanged (the sort is stable);
/// if absent on exactly one side, that item sorts after the other.
fn compare_activities(a: &Activity, b: &Activity, field: SortField, order: SortOrder) -> Ordering {
    match field {
        SortField::Date => ordered(Some(a.date), Some(b.date), order),
        SortField::Title => ordered(
            Some(a.title.to_lowercase()),
            Some(b.title.to_lowercase()),
            order,
        ),
        SortField::Duration => ordered(Some(a.duration), Some(b.duration), order),
        SortField::Type => ordered(
            Some(a.activity_type.to_string()),
            Some(b.activity_type.to_string()),
            order,
        ),
        SortField::Time => ordered(non_empty(&a.time), non_empty(&b.time), order),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn ordered<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
    }
}
