// SPDX-License-Identifier: MIT

//! Aggregate statistics over a filtered activity set.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::ActivityType;

/// Query parameters for `/activities-stats`.
///
/// Unlike the list endpoint, the stats filter takes a single `type` and no
/// search term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<FixedOffset>>,
}

/// Computed statistics for a filtered activity set.
///
/// Pure function of its inputs: recomputing on an unchanged set yields an
/// identical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_activities: u32,
    /// Sum of duration minutes.
    pub total_duration: u32,
    /// 0.0 when there are no activities.
    pub average_duration: f64,
    /// Activity count per type name.
    pub activities_by_type: HashMap<String, u32>,
    /// Activity count per ISO date-only key ("YYYY-MM-DD").
    pub activities_by_date: HashMap<String, u32>,
}
