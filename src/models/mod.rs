// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod plan;
pub mod user;
pub mod workout;

pub use plan::{FitnessPlan, FocusArea, NewPlan};
pub use user::User;
pub use workout::{DayPlan, Exercise, PlanShapeError, WorkoutPlan, WorkoutPlanDocument};
