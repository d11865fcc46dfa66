// SPDX-License-Identifier: MIT

//! Activity model and list/mutation request types.
//!
//! Wire naming is camelCase throughout; dates cross the boundary as ISO-8601
//! strings. Activities keep their original UTC offset (`DateTime<FixedOffset>`)
//! so day-level bucketing reflects the wall-clock date the user logged.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Kind of logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Run,
    Walk,
    Hike,
    Ride,
    Swim,
    Workout,
    Hiit,
    Other,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityType::Run => "RUN",
            ActivityType::Walk => "WALK",
            ActivityType::Hike => "HIKE",
            ActivityType::Ride => "RIDE",
            ActivityType::Swim => "SWIM",
            ActivityType::Workout => "WORKOUT",
            ActivityType::Hiit => "HIIT",
            ActivityType::Other => "OTHER",
        };
        f.write_str(s)
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUN" => Ok(ActivityType::Run),
            "WALK" => Ok(ActivityType::Walk),
            "HIKE" => Ok(ActivityType::Hike),
            "RIDE" => Ok(ActivityType::Ride),
            "SWIM" => Ok(ActivityType::Swim),
            "WORKOUT" => Ok(ActivityType::Workout),
            "HIIT" => Ok(ActivityType::Hiit),
            "OTHER" => Ok(ActivityType::Other),
            other => Err(format!("unknown activity type: {}", other)),
        }
    }
}

/// A logged activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Server-assigned ID. Present on every read and mutation-success path.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Duration in minutes.
    #[serde(default)]
    pub duration: u32,
    pub date: DateTime<FixedOffset>,
    /// Free-form "HH:MM" display time, redundant with `date`.
    #[serde(default)]
    pub time: String,
}

/// Payload for creating an activity. `title` and `type` are required;
/// everything else gets a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[validate(required(message = "title is required"))]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[validate(required(message = "type is required"))]
    pub activity_type: Option<ActivityType>,
    pub duration: Option<u32>,
    pub date: Option<DateTime<FixedOffset>>,
    pub time: Option<String>,
}

/// Partial update payload. Provided fields are merged over the stored record
/// for both PUT and PATCH (see DESIGN.md).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub duration: Option<u32>,
    pub date: Option<DateTime<FixedOffset>>,
    pub time: Option<String>,
}

/// Sort field for activity lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Title,
    Duration,
    Type,
    Time,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for activity lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Comma-delimited set of activity type names, e.g. "RUN,HIKE".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
    /// Case-insensitive substring match on title or description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Inclusive lower date bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<FixedOffset>>,
    /// Inclusive upper date bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<FixedOffset>>,
    #[serde(default = "default_sort_by")]
    pub sort_by: SortField,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
}

pub(crate) fn default_page() -> u32 {
    1
}
pub(crate) fn default_limit() -> u32 {
    8
}
fn default_sort_by() -> SortField {
    SortField::Date
}
fn default_sort_order() -> SortOrder {
    SortOrder::Desc
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            types: None,
            search: None,
            start_date: None,
            end_date: None,
            sort_by: default_sort_by(),
            sort_order: default_sort_order(),
        }
    }
}

impl ListParams {
    /// Parse the delimited `types` filter into typed values.
    /// Unknown names are rejected so typos don't silently match nothing.
    pub fn parsed_types(&self) -> Result<Vec<ActivityType>, String> {
        match &self.types {
            None => Ok(Vec::new()),
            Some(raw) => raw
                .split(',')
                .filter(|s| !s.is_empty())
                .map(ActivityType::from_str)
                .collect(),
        }
    }
}

/// One page of activities with pre-pagination totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPage {
    pub activities: Vec<Activity>,
    /// Count of matching activities before pagination.
    pub total: u32,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// Request body for `POST /activities/bulk-delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// Response for bulk delete. IDs that don't exist are silently ignored;
/// `deleted_count` reports only actual removals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub message: String,
    pub deleted_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_round_trip() {
        for name in ["RUN", "WALK", "HIKE", "RIDE", "SWIM", "WORKOUT", "HIIT", "OTHER"] {
            let t: ActivityType = name.parse().unwrap();
            assert_eq!(t.to_string(), name);
        }
        assert!("JOG".parse::<ActivityType>().is_err());
    }

    #[test]
    fn test_activity_serializes_type_as_wire_name() {
        let activity = Activity {
            id: "a1".to_string(),
            title: "Morning Run".to_string(),
            description: String::new(),
            activity_type: ActivityType::Run,
            duration: 30,
            date: "2024-05-29T06:00:00Z".parse().unwrap(),
            time: "06:00".to_string(),
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "RUN");
        assert_eq!(json["date"], "2024-05-29T06:00:00+00:00");
    }

    #[test]
    fn test_list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, ListParams::default());
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 8);
        assert_eq!(params.sort_by, SortField::Date);
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_parsed_types_rejects_unknown() {
        let params = ListParams {
            types: Some("RUN,HIKE".to_string()),
            ..ListParams::default()
        };
        assert_eq!(
            params.parsed_types().unwrap(),
            vec![ActivityType::Run, ActivityType::Hike]
        );

        let bad = ListParams {
            types: Some("RUN,JOG".to_string()),
            ..ListParams::default()
        };
        assert!(bad.parsed_types().is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let missing: CreateActivityRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.validate().is_err());

        let ok: CreateActivityRequest =
            serde_json::from_str(r#"{"title":"Run","type":"RUN"}"#).unwrap();
        assert!(ok.validate().is_ok());

        let empty_title: CreateActivityRequest =
            serde_json::from_str(r#"{"title":"","type":"RUN"}"#).unwrap();
        assert!(empty_title.validate().is_err());
    }
}
