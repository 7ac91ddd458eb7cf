// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness plan and plan generation routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FitnessPlan, WorkoutPlan, WorkoutPlanDocument};
use crate::services::{CreatedPlan, PlanRequest};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Plan routes (require authentication via session token).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/fitness-plans", get(list_plans).post(create_plan))
        .route("/api/fitness-plans/latest", get(latest_plan))
        .route("/api/fitness-plans/generate", post(create_generated_plan))
        .route(
            "/api/fitness-plans/{plan_id}/workout-plan",
            put(attach_workout_plan),
        )
        .route("/api/generate-exercise", post(generate_exercise))
}

// ─── Request Bodies ──────────────────────────────────────────

/// Planner form submission.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanBody {
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub gender: String,
    #[validate(length(min = 1, max = 256), custom(function = "not_blank"))]
    pub goal: String,
    #[serde(default)]
    #[validate(length(max = 16), custom(function = "valid_focus_areas"))]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub workout_plan: Option<WorkoutPlan>,
}

impl CreatePlanBody {
    /// Validate the form and any pre-generated schedule.
    fn into_request(self) -> Result<PlanRequest> {
        self.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if let Some(plan) = &self.workout_plan {
            plan.check_shape()
                .map_err(|e| AppError::BadRequest(format!("workoutPlan: {}", e)))?;
        }

        Ok(PlanRequest {
            gender: self.gender,
            goal: self.goal,
            focus_areas: self.focus_areas,
            workout_plan: self.workout_plan,
        })
    }
}

/// Generation-only request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[validate(length(min = 1, max = 256), custom(function = "not_blank"))]
    pub goal: String,
    #[serde(default)]
    #[validate(length(max = 16), custom(function = "valid_focus_areas"))]
    pub focus_areas: Vec<String>,
}

/// Schedule to attach to an existing plan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachWorkoutBody {
    pub workout_plan: WorkoutPlan,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn valid_focus_areas(areas: &[String]) -> std::result::Result<(), ValidationError> {
    let bad = areas
        .iter()
        .any(|area| area.trim().is_empty() || area.chars().count() > 256);
    if bad {
        return Err(ValidationError::new("focus_area"));
    }
    Ok(())
}

// ─── Responses ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanResponse {
    pub message: String,
    pub plan_id: i32,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlanResponse {
    pub message: String,
    pub plan_id: i32,
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<DayPlan>"))]
    pub workout_plan: WorkoutPlan,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: i32,
    pub gender: String,
    pub goal: String,
    pub has_workout_plan: bool,
    pub created_at: String,
}

impl From<&FitnessPlan> for PlanSummary {
    fn from(plan: &FitnessPlan) -> Self {
        Self {
            id: plan.id,
            gender: plan.gender.clone(),
            goal: plan.goal.clone(),
            has_workout_plan: plan.workout_plan.is_some(),
            created_at: plan.created_at_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetail {
    pub id: i32,
    pub gender: String,
    pub goal: String,
    pub focus_areas: Vec<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<DayPlan> | null"))]
    pub workout_plan: Option<WorkoutPlan>,
    pub created_at: String,
}

impl From<CreatedPlan> for PlanDetail {
    fn from(created: CreatedPlan) -> Self {
        let CreatedPlan { plan, focus_areas } = created;
        Self {
            id: plan.id,
            created_at: plan.created_at_rfc3339(),
            gender: plan.gender,
            goal: plan.goal,
            focus_areas: focus_areas.into_iter().map(|f| f.area).collect(),
            workout_plan: plan.workout_plan.map(|json| json.0),
        }
    }
}

// ─── Handlers ────────────────────────────────────────────────

/// Save the planner form, optionally with a schedule generated earlier.
async fn create_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<CreatePlanBody>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePlanResponse>)> {
    let Json(body) = body?;
    let request = body.into_request()?;
    let created = state.planner.create_plan(&user, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePlanResponse {
            message: "Fitness plan created successfully".to_string(),
            plan_id: created.plan.id,
        }),
    ))
}

/// Save the planner form and generate its schedule in one call.
async fn create_generated_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<CreatePlanBody>, JsonRejection>,
) -> Result<(StatusCode, Json<GeneratedPlanResponse>)> {
    let Json(mut body) = body?;
    if body.workout_plan.take().is_some() {
        tracing::debug!("Ignoring client-supplied schedule on generate request");
    }
    let request = body.into_request()?;

    let created = state.planner.create_and_generate(&user, &request).await?;
    let plan_id = created.plan.id;
    let workout_plan = created
        .plan
        .workout_plan
        .map(|json| json.0)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Plan {} has no schedule", plan_id)))?;

    Ok((
        StatusCode::CREATED,
        Json(GeneratedPlanResponse {
            message: "Fitness plan created successfully".to_string(),
            plan_id,
            workout_plan,
        }),
    ))
}

/// List the caller's plans, newest first.
async fn list_plans(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PlanSummary>>> {
    let plans = state.planner.list_plans(&user).await?;
    Ok(Json(plans.iter().map(PlanSummary::from).collect()))
}

/// The caller's most recent plan.
async fn latest_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PlanDetail>> {
    let latest = state.planner.latest_plan(&user).await?;
    Ok(Json(latest.into()))
}

/// Store a schedule on an existing plan, in place.
async fn attach_workout_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(plan_id): Path<i32>,
    body: std::result::Result<Json<AttachWorkoutBody>, JsonRejection>,
) -> Result<Json<PlanDetail>> {
    let Json(body) = body?;
    body.workout_plan
        .check_shape()
        .map_err(|e| AppError::BadRequest(format!("workoutPlan: {}", e)))?;

    let updated = state
        .planner
        .attach_workout_plan(&user, plan_id, &body.workout_plan)
        .await?;
    Ok(Json(updated.into()))
}

/// Generate a schedule without storing it.
async fn generate_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<WorkoutPlanDocument>> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::info!(
        external_id = %user.external_id,
        goal = %body.goal,
        areas = ?body.focus_areas,
        "Generating exercise plan"
    );

    let workout_plan = state.planner.generate(&body.goal, &body.focus_areas).await?;
    Ok(Json(WorkoutPlanDocument { workout_plan }))
}
