// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use aifit_planner::config::Config;
use aifit_planner::db::PostgresDb;
use aifit_planner::routes::create_router;
use aifit_planner::services::{PlanGenerator, PlannerService};
use aifit_planner::AppState;
use axum::{http::StatusCode, routing::post, Json, Router};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Server URL (no database name) for integration tests, if configured.
#[allow(dead_code)]
pub fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .ok()
        .map(|url| url.trim_end_matches('/').to_string())
}

/// Skip test with message if no test database is configured.
#[macro_export]
macro_rules! require_database {
    () => {
        if crate::common::database_url().is_none() {
            eprintln!("⚠️  Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Create a session token the way the identity provider does.
#[allow(dead_code)]
pub fn create_test_jwt(external_id: &str, email: Option<&str>, signing_key: &[u8]) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<&'a str>,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: external_id,
        email,
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Build app state around `db`, generating plans via `generation_base_url`.
#[allow(dead_code)]
pub fn create_app_with(db: PostgresDb, generation_base_url: Option<String>) -> (Router, Arc<AppState>) {
    let mut config = Config::test_default();
    if let Some(url) = generation_base_url {
        config.generation_base_url = url;
    }

    let planner = PlannerService::new(db, PlanGenerator::from_config(&config));
    let state = Arc::new(AppState { config, planner });

    (create_router(state.clone()), state)
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_app_with(PostgresDb::new_mock(), None)
}

/// A valid generated plan: 3 days of 6 exercises.
#[allow(dead_code)]
pub fn sample_plan_json() -> Value {
    let days: Vec<Value> = (1..=3)
        .map(|day| {
            let exercises: Vec<Value> = (1..=6)
                .map(|i| {
                    json!({
                        "name": format!("Day {day} exercise {i}"),
                        "sets": 3,
                        "reps": "10-12",
                        "rest": "60s"
                    })
                })
                .collect();
            json!({ "day": day, "exercises": exercises })
        })
        .collect();
    Value::Array(days)
}

/// Serve a fixed chat completion whose message content is `content`.
///
/// Returns the base URL to hand to the plan generator.
#[allow(dead_code)]
pub async fn fake_generation_api(content: Option<String>) -> String {
    let reply = json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    });

    let app = Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let reply = reply.clone();
            async move { (StatusCode::OK, Json(reply)) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/v1", addr)
}

/// A temporary database with migrations applied, dropped by [`TestDb::drop_db`].
#[allow(dead_code)]
pub struct TestDb {
    pub pool: PgPool,
    pub db: PostgresDb,
    name: String,
}

#[allow(dead_code)]
impl TestDb {
    /// Create a uniquely-named database on the `TEST_DATABASE_URL` server.
    pub async fn create() -> Self {
        let base_url = database_url().expect("TEST_DATABASE_URL must be set");
        let maint_pool = maintenance_pool(&base_url).await;

        let name = format!("aifit_test_{}", uuid::Uuid::new_v4().simple());
        maint_pool
            .execute(format!("CREATE DATABASE {name}").as_str())
            .await
            .unwrap_or_else(|e| panic!("failed to create temp database {name}: {e}"));
        maint_pool.close().await;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&format!("{base_url}/{name}"))
            .await
            .unwrap_or_else(|e| panic!("failed to connect to temp database {name}: {e}"));

        let db = PostgresDb::from_pool(pool.clone());
        db.run_migrations().await.expect("migrations should succeed");

        Self { pool, db, name }
    }

    /// Row count of `table`.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Close connections and drop the database.
    pub async fn drop_db(self) {
        self.pool.close().await;

        let base_url = database_url().expect("TEST_DATABASE_URL must be set");
        let maint_pool = maintenance_pool(&base_url).await;

        let terminate = format!(
            "SELECT pg_terminate_backend(pid) \
             FROM pg_stat_activity \
             WHERE datname = '{}' AND pid <> pg_backend_pid()",
            self.name
        );
        let _ = maint_pool.execute(terminate.as_str()).await;

        let stmt = format!("DROP DATABASE IF EXISTS {}", self.name);
        let _ = maint_pool.execute(stmt.as_str()).await;
        maint_pool.close().await;
    }
}

#[allow(dead_code)]
async fn maintenance_pool(base_url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&format!("{base_url}/postgres"))
        .await
        .expect("failed to connect to maintenance database")
}
