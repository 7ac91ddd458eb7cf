// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI-Fit Planner API Server
//!
//! Stores fitness preferences and generates workout plans through an
//! external language-model API.

use aifit_planner::{
    config::Config,
    db::PostgresDb,
    services::{PlanGenerator, PlannerService},
    AppState,
};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting AI-Fit Planner API");

    // Connect to Postgres and bring the schema up to date
    let db = PostgresDb::connect(&config.database_url, config.database_max_connections).await?;
    db.run_migrations().await?;

    // One generation client for the life of the process
    let generator = PlanGenerator::from_config(&config);
    tracing::info!(
        base_url = %config.generation_base_url,
        model = %config.generation_model,
        "Plan generator initialized"
    );

    let planner = PlannerService::new(db, generator);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        planner,
    });

    // Build router
    let app = aifit_planner::routes::create_router(state);

    // Start server
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

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("aifit_planner=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
