// SPDX-License-Identifier: MIT

//! Data models shared by the server, store, and client layers.

pub mod activity;
pub mod goal;
pub mod stats;

pub use activity::{
    Activity, ActivityPage, ActivityType, BulkDeleteRequest, BulkDeleteResponse,
    CreateActivityRequest, ListParams, SortField, SortOrder, UpdateActivityRequest,
};
pub use goal::{CreateGoalRequest, Goal, GoalFrequency, GoalType, UpdateGoalRequest};
pub use stats::{ActivityStats, StatsParams};
