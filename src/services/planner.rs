// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan creation workflow.
//!
//! Sequential glue over the database and the generation client:
//! 1. Resolve the caller's user record
//! 2. Insert the plan row
//! 3. Insert the focus-area tags
//! 4. Optionally generate a schedule and store it on the same row
//!
//! Writes are independent statements. A failure after the plan insert
//! leaves the plan row in place; plans are append-only history.

use crate::db::PostgresDb;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::{FitnessPlan, FocusArea, NewPlan, User, WorkoutPlan};
use crate::services::generator::PlanGenerator;

/// Preferences submitted from the planner form.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub gender: String,
    pub goal: String,
    pub focus_areas: Vec<String>,
    /// Schedule generated ahead of time, if the client already has one
    pub workout_plan: Option<WorkoutPlan>,
}

/// A stored plan together with its focus areas.
#[derive(Debug, Clone)]
pub struct CreatedPlan {
    pub plan: FitnessPlan,
    pub focus_areas: Vec<FocusArea>,
}

/// Orchestrates plan persistence and generation.
#[derive(Clone)]
pub struct PlannerService {
    db: PostgresDb,
    generator: PlanGenerator,
}

impl PlannerService {
    pub fn new(db: PostgresDb, generator: PlanGenerator) -> Self {
        Self { db, generator }
    }

    /// Find the caller's user record.
    ///
    /// The record is created on first visit (`PUT /api/me`); a caller who
    /// skipped that gets `UserNotFound`.
    pub async fn resolve_user(&self, identity: &AuthUser) -> Result<User, AppError> {
        self.db
            .get_user_by_external_id(&identity.external_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(identity.external_id.clone()))
    }

    /// Create the caller's user record if this is their first visit.
    pub async fn sync_user(&self, identity: &AuthUser) -> Result<User, AppError> {
        let email = identity.email.as_deref().ok_or_else(|| {
            AppError::BadRequest("Identity token does not carry an email address".to_string())
        })?;

        self.db.ensure_user(&identity.external_id, email).await
    }

    /// Persist a plan and its focus areas.
    pub async fn create_plan(
        &self,
        identity: &AuthUser,
        request: &PlanRequest,
    ) -> Result<CreatedPlan, AppError> {
        let user = self.resolve_user(identity).await?;
        self.insert_plan_with_areas(&user, request, request.workout_plan.as_ref())
            .await
    }

    /// Persist the preferences, generate a schedule, and attach it to the
    /// same plan row.
    ///
    /// If generation fails the plan row stays, without a schedule.
    pub async fn create_and_generate(
        &self,
        identity: &AuthUser,
        request: &PlanRequest,
    ) -> Result<CreatedPlan, AppError> {
        let user = self.resolve_user(identity).await?;
        let created = self.insert_plan_with_areas(&user, request, None).await?;
        let plan_id = created.plan.id;

        let workout_plan = self
            .generator
            .generate(&request.goal, &request.focus_areas)
            .await
            .inspect_err(|e| {
                tracing::warn!(plan_id, error = %e, "Plan saved without a generated schedule");
            })?;

        let plan = self
            .db
            .set_workout_plan(plan_id, user.id, &workout_plan)
            .await?
            .ok_or_else(|| AppError::Database(format!("Plan {} vanished before update", plan_id)))?;

        tracing::info!(plan_id, user_id = user.id, "Generated schedule attached to plan");

        Ok(CreatedPlan {
            plan,
            focus_areas: created.focus_areas,
        })
    }

    /// Generate a schedule without storing anything.
    pub async fn generate(
        &self,
        goal: &str,
        focus_areas: &[String],
    ) -> Result<WorkoutPlan, AppError> {
        self.generator.generate(goal, focus_areas).await
    }

    /// Replace the schedule on one of the caller's plans.
    pub async fn attach_workout_plan(
        &self,
        identity: &AuthUser,
        plan_id: i32,
        workout_plan: &WorkoutPlan,
    ) -> Result<CreatedPlan, AppError> {
        let user = self.resolve_user(identity).await?;

        let plan = self
            .db
            .set_workout_plan(plan_id, user.id, workout_plan)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", plan_id)))?;
        let focus_areas = self.db.get_focus_areas(plan.id).await?;

        tracing::info!(plan_id, user_id = user.id, "Schedule attached to plan");

        Ok(CreatedPlan { plan, focus_areas })
    }

    /// All of the caller's plans, newest first.
    pub async fn list_plans(&self, identity: &AuthUser) -> Result<Vec<FitnessPlan>, AppError> {
        let user = self.resolve_user(identity).await?;
        self.db.list_plans_for_user(user.id).await
    }

    /// The caller's most recent plan with its focus areas.
    pub async fn latest_plan(&self, identity: &AuthUser) -> Result<CreatedPlan, AppError> {
        let user = self.resolve_user(identity).await?;

        let plan = self
            .db
            .get_latest_plan_for_user(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("No fitness plans yet".to_string()))?;
        let focus_areas = self.db.get_focus_areas(plan.id).await?;

        Ok(CreatedPlan { plan, focus_areas })
    }

    async fn insert_plan_with_areas(
        &self,
        user: &User,
        request: &PlanRequest,
        workout_plan: Option<&WorkoutPlan>,
    ) -> Result<CreatedPlan, AppError> {
        let plan = self
            .db
            .insert_plan(NewPlan {
                user_id: user.id,
                gender: &request.gender,
                goal: &request.goal,
                workout_plan,
            })
            .await?;

        tracing::info!(
            plan_id = plan.id,
            user_id = user.id,
            goal = %plan.goal,
            has_schedule = workout_plan.is_some(),
            "Fitness plan created"
        );

        let focus_areas = self
            .db
            .insert_focus_areas(plan.id, &request.focus_areas)
            .await?;

        Ok(CreatedPlan { plan, focus_areas })
    }
}
