// SPDX-License-Identifier: MIT

//! Goal progress aggregation.
//!
//! Pure, synchronous transforms from (activities, goal) to per-day and
//! per-week achievement status. Days with no activities produce no entry;
//! the calendar renders those as "none" rather than "partial".

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{Activity, Goal, GoalFrequency, GoalType};
use crate::time_utils::week_start;

/// Achievement status for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub activity_count: u32,
    /// Total minutes on this day.
    pub total_duration: u32,
    pub achieved: bool,
}

/// Achievement status for one Sunday-started week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekProgress {
    /// The Sunday this week starts on.
    pub week_start: NaiveDate,
    pub activity_count: u32,
    pub total_duration: u32,
    pub achieved: bool,
}

/// The per-day threshold implied by the goal.
///
/// Daily goals use `target` directly. Weekly goals spread `weekly_target`
/// across the week with a ceiling division so a weekly goal can render
/// day-by-day progress. A missing weekly target counts as 0, which makes any
/// activity achieve the day (see DESIGN.md).
pub fn daily_threshold(goal: &Goal) -> u32 {
    match goal.frequency {
        GoalFrequency::Daily => goal.target,
        GoalFrequency::Weekly => goal.weekly_target.unwrap_or(0).div_ceil(7),
    }
}

/// Bucket activities by calendar day and classify each day against the goal.
///
/// Days are taken from each activity's stamped wall-clock date (the offset it
/// was logged with), not UTC-normalized, matching how the UI buckets "today".
/// Output is sorted by date ascending.
pub fn daily_progress(activities: &[Activity], goal: &Goal) -> Vec<DayProgress> {
    let threshold = daily_threshold(goal);

    day_buckets(activities)
        .into_iter()
        .map(|(date, (activity_count, total_duration))| DayProgress {
            date,
            activity_count,
            total_duration,
            achieved: metric(goal.goal_type, activity_count, total_duration) >= threshold,
        })
        .collect()
}

/// Aggregate daily buckets into Sunday-started weeks and compare against the
/// weekly target directly (no division). Weeks without a weekly target fall
/// back to 7x the daily target.
pub fn weekly_progress(activities: &[Activity], goal: &Goal) -> Vec<WeekProgress> {
    let weekly_target = match goal.frequency {
        GoalFrequency::Weekly => goal.weekly_target.unwrap_or(0),
        GoalFrequency::Daily => goal.target.saturating_mul(7),
    };

    let mut weeks: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for (date, (count, duration)) in day_buckets(activities) {
        let entry = weeks.entry(week_start(date)).or_insert((0, 0));
        entry.0 += count;
        entry.1 += duration;
    }

    weeks
        .into_iter()
        .map(|(start, (activity_count, total_duration))| WeekProgress {
            week_start: start,
            activity_count,
            total_duration,
            achieved: metric(goal.goal_type, activity_count, total_duration) >= weekly_target,
        })
        .collect()
}

fn metric(goal_type: GoalType, count: u32, duration: u32) -> u32 {
    match goal_type {
        GoalType::Count => count,
        GoalType::Duration => duration,
    }
}

fn day_buckets(activities: &[Activity]) -> BTreeMap<NaiveDate, (u32, u32)> {
    let mut days: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for activity in activities {
        let entry = days.entry(activity.date.date_naive()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += activity.duration;
    }
    days
}
