// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan generation via an OpenAI-compatible chat-completions API.
//!
//! One request per plan: no retries, no streaming, and the HTTP client's
//! default timeout. The response is parsed and checked against the plan
//! shape before anyone gets to persist it.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{WorkoutPlan, WorkoutPlanDocument};
use serde::{Deserialize, Serialize};

/// Chat-completions client for generating workout plans.
#[derive(Clone)]
pub struct PlanGenerator {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl PlanGenerator {
    /// Create a generator talking to `base_url` (e.g. `https://openrouter.ai/api/v1`).
    pub fn new(base_url: String, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            max_tokens,
        }
    }

    /// Create a generator from application config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.generation_base_url.clone(),
            config.generation_api_key.clone(),
            config.generation_model.clone(),
            config.generation_max_tokens,
        )
    }

    /// Generate a 3-day plan for `goal` emphasising `focus_areas`.
    pub async fn generate(
        &self,
        goal: &str,
        focus_areas: &[String],
    ) -> Result<WorkoutPlan, AppError> {
        let prompt = build_prompt(goal, focus_areas);
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            model = %self.model,
            goal = %goal,
            areas = focus_areas.len(),
            "Requesting workout plan"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GenerationFailed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GenerationFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::GenerationFailed(format!("Unreadable completion: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::GenerationFailed("No content received".to_string()))?;

        let plan = parse_plan(&content)?;

        tracing::info!(
            days = plan.days.len(),
            exercises = plan.exercise_count(),
            "Workout plan generated"
        );

        Ok(plan)
    }
}

/// Build the natural-language request sent to the model.
pub fn build_prompt(goal: &str, focus_areas: &[String]) -> String {
    let areas = if focus_areas.is_empty() {
        "the full body".to_string()
    } else {
        focus_areas.join(", ")
    };

    format!(
        "Create a 3-days workout plan for a user with the goal of {goal} and focus areas on {areas}. \
         For each day, provide a list of 5-7 exercises with sets, reps, and rest times. \
         Return the response as a JSON object with the following structure: \
         {{ \"workoutPlan\": [ {{ \"day\": 1, \"exercises\": [ {{ \"name\": \"Exercise Name\", \
         \"sets\": 3, \"reps\": \"10-12\", \"rest\": \"60s\" }} ] }} ] }}."
    )
}

/// Parse model output into a plan, rejecting anything off-shape.
pub fn parse_plan(content: &str) -> Result<WorkoutPlan, AppError> {
    let document: WorkoutPlanDocument = serde_json::from_str(content)
        .map_err(|e| AppError::MalformedResponse(format!("Invalid plan JSON: {}", e)))?;

    document
        .workout_plan
        .check_shape()
        .map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    Ok(document.workout_plan)
}

// ─── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
