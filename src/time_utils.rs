// SPDX-License-Identifier: MIT

//! Shared helpers for calendar bucketing.

use chrono::{Datelike, NaiveDate};

/// ISO date-only key ("YYYY-MM-DD") for grouping by calendar day.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The Sunday that starts the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_sunday = date.weekday().num_days_from_sunday();
    date - chrono::Duration::days(i64::from(days_from_sunday))
}
