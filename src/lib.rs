// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! AI-Fit Planner: personalised workout plans from a short questionnaire
//!
//! This crate provides the backend API that stores a user's fitness
//! preferences and asks a language model for a matching 3-day plan.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::PlannerService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub planner: PlannerService,
}
