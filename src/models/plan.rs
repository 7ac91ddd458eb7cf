// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness plan and focus-area records.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::WorkoutPlan;

/// Stored fitness plan row.
#[derive(Debug, Clone, FromRow)]
pub struct FitnessPlan {
    pub id: i32,
    /// Owner (`users.id`)
    pub user_id: i32,
    pub gender: String,
    pub goal: String,
    /// Generated schedule, NULL until one is attached
    pub workout_plan: Option<Json<WorkoutPlan>>,
    pub created_at: DateTime<Utc>,
}

impl FitnessPlan {
    /// The attached workout document, if any.
    pub fn workout(&self) -> Option<&WorkoutPlan> {
        self.workout_plan.as_ref().map(|json| &json.0)
    }

    /// Creation time as RFC3339 with a `Z` suffix.
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Focus-area tag attached to a plan.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FocusArea {
    pub id: i32,
    /// Parent plan (`fitness_plans.id`)
    pub plan_id: i32,
    pub area: String,
}

/// Values for a new plan row.
#[derive(Debug, Clone, Copy)]
pub struct NewPlan<'a> {
    pub user_id: i32,
    pub gender: &'a str,
    pub goal: &'a str,
    pub workout_plan: Option<&'a WorkoutPlan>,
}
