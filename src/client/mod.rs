// SPDX-License-Identifier: MIT

//! Client-side data layer: remote access, query cache, filter state, and the
//! sync service tying them together.

pub mod api;
pub mod cache;
pub mod filters;
pub mod sync;

pub use api::{ActivityApi, RemoteClient};
pub use cache::{CachedQuery, EntityKind, KeyPrefix, QueryCache, QueryKey, Scope};
pub use filters::{ActivityFilters, FilterUpdate};
pub use sync::SyncService;
