// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Postgres client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (external identity to internal id)
//! - Fitness plans (preferences plus generated schedule)
//! - Focus areas (tags attached to a plan)
//!
//! Every operation is a single statement; nothing here opens a transaction.

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::{FitnessPlan, FocusArea, NewPlan, User, WorkoutPlan};

/// Migrations embedded at compile time from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

const PLAN_COLUMNS: &str = "id, user_id, gender, goal, workout_plan, created_at";

/// Postgres database client.
#[derive(Clone)]
pub struct PostgresDb {
    pool: Option<PgPool>,
}

impl PostgresDb {
    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .context("failed to connect to Postgres")?;

        tracing::info!(max_connections, "Connected to Postgres");

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a mock database client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { pool: None }
    }

    /// Apply all pending embedded migrations.
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        MIGRATOR
            .run(self.pool()?)
            .await
            .context("failed to run database migrations")?;

        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Helper to get the pool or return an error if offline.
    fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Look up a user by the identity provider's subject.
    pub async fn get_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, external_id, email FROM users WHERE external_id = $1",
        )
        .bind(external_id)
        .fetch_optional(self.pool()?)
        .await?;

        Ok(user)
    }

    /// Return the user for `external_id`, creating it on first sight.
    ///
    /// Concurrent first visits are safe: the loser of the insert race reads
    /// the winner's row. An email already owned by another identity is a
    /// `Conflict`.
    pub async fn ensure_user(&self, external_id: &str, email: &str) -> Result<User, AppError> {
        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (external_id, email) VALUES ($1, $2) \
             ON CONFLICT (external_id) DO NOTHING \
             RETURNING id, external_id, email",
        )
        .bind(external_id)
        .bind(email)
        .fetch_optional(self.pool()?)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict(
                "Email address is already linked to another account".to_string(),
            ),
            other => AppError::from(other),
        })?;

        if let Some(user) = inserted {
            tracing::info!(user_id = user.id, "Created user record");
            return Ok(user);
        }

        self.get_user_by_external_id(external_id)
            .await?
            .ok_or_else(|| {
                AppError::Database(format!("User {} missing after upsert", external_id))
            })
    }

    // ─── Plan Operations ─────────────────────────────────────────

    /// Insert a new plan row. `created_at` is assigned by the database.
    pub async fn insert_plan(&self, plan: NewPlan<'_>) -> Result<FitnessPlan, AppError> {
        let sql = format!(
            "INSERT INTO fitness_plans (user_id, gender, goal, workout_plan) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {PLAN_COLUMNS}"
        );

        let row = sqlx::query_as::<_, FitnessPlan>(&sql)
            .bind(plan.user_id)
            .bind(plan.gender)
            .bind(plan.goal)
            .bind(plan.workout_plan.map(Json))
            .fetch_one(self.pool()?)
            .await?;

        Ok(row)
    }

    /// Replace the workout document of a plan owned by `user_id`.
    ///
    /// Returns `None` if no such plan exists for that user.
    pub async fn set_workout_plan(
        &self,
        plan_id: i32,
        user_id: i32,
        workout_plan: &WorkoutPlan,
    ) -> Result<Option<FitnessPlan>, AppError> {
        let sql = format!(
            "UPDATE fitness_plans SET workout_plan = $1 \
             WHERE id = $2 AND user_id = $3 \
             RETURNING {PLAN_COLUMNS}"
        );

        let row = sqlx::query_as::<_, FitnessPlan>(&sql)
            .bind(Json(workout_plan))
            .bind(plan_id)
            .bind(user_id)
            .fetch_optional(self.pool()?)
            .await?;

        Ok(row)
    }

    /// All plans for a user, newest first.
    pub async fn list_plans_for_user(&self, user_id: i32) -> Result<Vec<FitnessPlan>, AppError> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM fitness_plans \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, FitnessPlan>(&sql)
            .bind(user_id)
            .fetch_all(self.pool()?)
            .await?;

        Ok(rows)
    }

    /// The most recently created plan for a user.
    pub async fn get_latest_plan_for_user(
        &self,
        user_id: i32,
    ) -> Result<Option<FitnessPlan>, AppError> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM fitness_plans \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );

        let row = sqlx::query_as::<_, FitnessPlan>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool()?)
            .await?;

        Ok(row)
    }

    // ─── Focus Area Operations ───────────────────────────────────

    /// Insert one tag per area for `plan_id` in a single statement.
    ///
    /// Rows come back in submission order.
    pub async fn insert_focus_areas(
        &self,
        plan_id: i32,
        areas: &[String],
    ) -> Result<Vec<FocusArea>, AppError> {
        if areas.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO focus_areas (plan_id, area) ");
        builder.push_values(areas, |mut row, area| {
            row.push_bind(plan_id).push_bind(area.as_str());
        });
        builder.push(" RETURNING id, plan_id, area");

        let mut rows = builder
            .build_query_as::<FocusArea>()
            .fetch_all(self.pool()?)
            .await?;
        rows.sort_by_key(|r| r.id);

        Ok(rows)
    }

    /// Tags for a plan, in insertion order.
    pub async fn get_focus_areas(&self, plan_id: i32) -> Result<Vec<FocusArea>, AppError> {
        let rows = sqlx::query_as::<_, FocusArea>(
            "SELECT id, plan_id, area FROM focus_areas WHERE plan_id = $1 ORDER BY id",
        )
        .bind(plan_id)
        .fetch_all(self.pool()?)
        .await?;

        Ok(rows)
    }
}
