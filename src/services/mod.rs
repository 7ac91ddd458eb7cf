// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod generator;
pub mod planner;

pub use generator::PlanGenerator;
pub use planner::{CreatedPlan, PlanRequest, PlannerService};
