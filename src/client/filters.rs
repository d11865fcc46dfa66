// SPDX-License-Identifier: MIT

//! Filter state for the activity list view.
//!
//! Holds "what the user asked for", decoupled from what is cached. Every
//! update other than a page change resets pagination to page 1 in the same
//! transition, so a filter change never leaves the view on a page that no
//! longer exists.

use chrono::{DateTime, FixedOffset};

use crate::models::{ActivityType, ListParams, SortField, SortOrder};

/// Current list filters.
///
/// The type filter is a comma-delimited string of type names (not a Vec) so
/// the whole state stays serializable as flat query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityFilters {
    pub page: u32,
    pub limit: u32,
    pub types: String,
    pub search: String,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ActivityFilters {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 8,
            types: String::new(),
            search: String::new(),
            start_date: None,
            end_date: None,
            sort_by: SortField::Date,
            sort_order: SortOrder::Desc,
        }
    }
}

/// A single filter transition.
#[derive(Debug, Clone)]
pub enum FilterUpdate {
    Page(u32),
    Limit(u32),
    Search(String),
    Types(String),
    StartDate(Option<DateTime<FixedOffset>>),
    EndDate(Option<DateTime<FixedOffset>>),
    SortBy(SortField),
    SortOrder(SortOrder),
}

impl ActivityFilters {
    /// Apply one update. Any change other than `Page` also resets `page` to 1
    /// as part of the same transition.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Page(page) => {
                self.page = page;
                return;
            }
            FilterUpdate::Limit(limit) => self.limit = limit,
            FilterUpdate::Search(search) => self.search = search,
            FilterUpdate::Types(types) => self.types = types,
            FilterUpdate::StartDate(date) => self.start_date = date,
            FilterUpdate::EndDate(date) => self.end_date = date,
            FilterUpdate::SortBy(field) => self.sort_by = field,
            FilterUpdate::SortOrder(order) => self.sort_order = order,
        }
        self.page = 1;
    }

    /// Add or remove one type from the delimited set (resets page).
    pub fn toggle_type(&mut self, activity_type: ActivityType) {
        let name = activity_type.to_string();
        let mut names: Vec<&str> = self
            .types
            .split(',')
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(pos) = names.iter().position(|n| *n == name) {
            names.remove(pos);
        } else {
            names.push(&name);
        }

        let joined = names.join(",");
        self.apply(FilterUpdate::Types(joined));
    }

    /// Reset to the documented defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True iff any field differs from the default and is non-empty.
    pub fn has_active_filters(&self) -> bool {
        *self != Self::default()
    }

    /// The query parameters this state maps to.
    pub fn to_params(&self) -> ListParams {
        ListParams {
            page: self.page,
            limit: self.limit,
            types: if self.types.is_empty() {
                None
            } else {
                Some(self.types.clone())
            },
            search: if self.search.is_empty() {
                None
            } else {
                Some(self.search.clone())
            },
            start_date: self.start_date,
            end_date: self.end_date,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }
}
