// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan document: the day-by-day exercise schedule.
//!
//! Stored as JSONB on `fitness_plans.workout_plan` in its bare list form:
//! `[{"day": 1, "exercises": [{"name", "sets", "reps", "rest"}]}]`.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of days every plan covers.
pub const PLAN_DAYS: usize = 3;
/// Allowed number of exercises per day.
pub const EXERCISES_PER_DAY: RangeInclusive<usize> = 5..=7;

/// One exercise entry within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1, max = 20))]
    pub sets: u32,
    /// Repetition range, e.g. "10-12"
    #[validate(length(min = 1, max = 50))]
    pub reps: String,
    /// Rest between sets, e.g. "60s"
    #[validate(length(min = 1, max = 50))]
    pub rest: String,
}

/// Exercises for a single training day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayPlan {
    pub day: u32,
    #[validate(nested)]
    pub exercises: Vec<Exercise>,
}

/// Ordered list of day plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutPlan {
    pub days: Vec<DayPlan>,
}

/// Envelope the generation API is asked to return, also used as the
/// response body of the generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlanDocument {
    pub workout_plan: WorkoutPlan,
}

/// Why a document does not describe a usable plan.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanShapeError {
    #[error("expected 3 days, got {0}")]
    DayCount(usize),

    #[error("entry {index} is day {found}, expected day {expected}")]
    DayOrder {
        index: usize,
        expected: usize,
        found: u32,
    },

    #[error("day {day} has {count} exercises, expected 5 to 7")]
    ExerciseCount { day: u32, count: usize },

    #[error("day {day}: {message}")]
    Exercise { day: u32, message: String },
}

impl WorkoutPlan {
    pub fn new(days: Vec<DayPlan>) -> Self {
        Self { days }
    }

    /// Check the document against the plan rules: days 1..=3 in order,
    /// 5 to 7 well-formed exercises each.
    pub fn check_shape(&self) -> Result<(), PlanShapeError> {
        if self.days.len() != PLAN_DAYS {
            return Err(PlanShapeError::DayCount(self.days.len()));
        }

        for (index, day) in self.days.iter().enumerate() {
            let expected = index + 1;
            if day.day as usize != expected {
                return Err(PlanShapeError::DayOrder {
                    index,
                    expected,
                    found: day.day,
                });
            }

            if !EXERCISES_PER_DAY.contains(&day.exercises.len()) {
                return Err(PlanShapeError::ExerciseCount {
                    day: day.day,
                    count: day.exercises.len(),
                });
            }

            day.validate().map_err(|e| PlanShapeError::Exercise {
                day: day.day,
                message: e.to_string(),
            })?;

            if day.exercises.iter().any(|ex| ex.name.trim().is_empty()) {
                return Err(PlanShapeError::Exercise {
                    day: day.day,
                    message: "exercise name is blank".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Total number of exercises across all days.
    pub fn exercise_count(&self) -> usize {
        self.days.iter().map(|d| d.exercises.len()).sum()
    }
}
