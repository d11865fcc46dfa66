// SPDX-License-Identifier: MIT

//! Performance goal model.
//!
//! Exactly one goal exists per user; creating a goal when one already exists
//! overwrites it. The richer schema (frequency + weeklyTarget) is canonical;
//! `frequency` defaults to daily so payloads from the frequency-less schema
//! variant still parse.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// What the goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// Number of activities.
    Count,
    /// Total minutes of activity.
    Duration,
}

/// Cadence the goal is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalFrequency {
    #[default]
    Daily,
    Weekly,
}

/// A user's performance goal (singleton per user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    /// Per-day target (count or minutes depending on `type`).
    pub target: u32,
    #[serde(default)]
    pub frequency: GoalFrequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_target: Option<u32>,
}

impl Goal {
    /// The fixed record that `DELETE /goals/{userId}` restores.
    pub fn default_for_user(user_id: &str) -> Self {
        Self {
            id: Some(format!("goal-{}", user_id)),
            user_id: user_id.to_string(),
            goal_type: GoalType::Count,
            target: 1,
            frequency: GoalFrequency::Daily,
            weekly_target: None,
        }
    }
}

/// Payload for creating (or overwriting) a user's goal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub user_id: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    #[validate(range(min = 1, message = "target must be positive"))]
    pub target: u32,
    #[serde(default)]
    pub frequency: GoalFrequency,
    pub weekly_target: Option<u32>,
}

/// Partial goal update; provided fields replace the stored ones and the
/// resulting record replaces the singleton wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[serde(rename = "type")]
    pub goal_type: Option<GoalType>,
    pub target: Option<u32>,
    pub frequency: Option<GoalFrequency>,
    pub weekly_target: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_defaults_to_daily() {
        let goal: Goal =
            serde_json::from_str(r#"{"userId":"u1","type":"count","target":3}"#).unwrap();
        assert_eq!(goal.frequency, GoalFrequency::Daily);
        assert_eq!(goal.weekly_target, None);
    }

    #[test]
    fn test_goal_wire_shape() {
        let goal = Goal {
            id: Some("g1".to_string()),
            user_id: "u1".to_string(),
            goal_type: GoalType::Duration,
            target: 30,
            frequency: GoalFrequency::Weekly,
            weekly_target: Some(210),
        };

        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["type"], "duration");
        assert_eq!(json["weeklyTarget"], 210);
        assert_eq!(json["userId"], "u1");
    }

    #[test]
    fn test_create_goal_requires_positive_target() {
        use validator::Validate;
        let req: CreateGoalRequest =
            serde_json::from_str(r#"{"userId":"u1","type":"count","target":0}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
