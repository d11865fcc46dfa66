// SPDX-License-Identifier: MIT

//! Fitlog: fitness activity tracking data layer.
//!
//! This crate provides the activities API server (in-memory, for development
//! and testing) and the client-side synchronization layer: remote access,
//! query cache with invalidation, filter state, and goal progress
//! aggregation.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod routes;
pub mod store;
pub mod time_utils;

use config::Config;
use store::ActivityStore;
use tokio::sync::RwLock;

/// Shared application state for the API server.
pub struct AppState {
    pub config: Config,
    pub store: RwLock<ActivityStore>,
}
