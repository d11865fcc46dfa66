// SPDX-License-Identifier: MIT

//! Fitlog API Server
//!
//! Serves the activities/goals HTTP contract from an in-memory store, with
//! simulated per-request latency so clients exercise their loading states.

use fitlog::{config::Config, store::ActivityStore, AppState};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        simulate_latency = config.simulate_latency,
        "Starting Fitlog API"
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        store: RwLock::new(ActivityStore::new()),
    });

    let app = fitlog::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitlog=debug".parse().expect("valid directive"))
                .add_directive("info".parse().expect("valid directive")),
        )
        .with(format)
        .init();
}
