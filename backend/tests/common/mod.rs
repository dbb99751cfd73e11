//! Common test utilities for integration tests
//!
//! Each `TestApp` owns a private in-memory SQLite database with
//! migrations applied.

#![allow(dead_code)]

use std::sync::Arc;

use bmigo_backend::{
    config::AppConfig, db, repositories::SqliteHistoryRepository, state::AppState, telemetry,
};
use bmigo_shared::{BiologicalSex, CalculateRequest, HeightEntry, WeightEntry, WeightUnit};
use sqlx::SqlitePool;

/// Test application wrapper
pub struct TestApp {
    pub state: AppState,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Create a new test application over a fresh database
    pub async fn new() -> Self {
        let config = AppConfig::default();
        telemetry::init_tracing(&config);

        let pool = db::create_memory_pool()
            .await
            .expect("Failed to create test database pool");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(config, Arc::new(SqliteHistoryRepository::new(pool.clone())));
        Self { state, pool }
    }

    /// Number of rows in the history table
    pub async fn row_count(&self) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM history")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count history rows");
        count
    }
}

/// Metric form submission
pub fn metric_request(
    sex: BiologicalSex,
    height_cm: f64,
    weight_kg: &str,
    age: i32,
) -> CalculateRequest {
    CalculateRequest {
        sex,
        age,
        height: HeightEntry::Cm { value: height_cm },
        weight: WeightEntry {
            value: weight_kg.to_string(),
            unit: WeightUnit::Kg,
        },
        indian_mode: false,
        athlete_mode: false,
    }
}
