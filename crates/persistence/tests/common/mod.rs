//! Shared fixtures for repository tests against a real PostgreSQL database.
//!
//! Tests connect through `TEST_DATABASE_URL` and are skipped when it is unset.

#![allow(dead_code)]

use std::sync::OnceLock;
use std::time::Duration;

use domain::models::NewRegistration;
use persistence::db::run_migrations;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};

static DB_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Exclusive handle on the test database. Tests share one schema, so each
/// holds the guard for its whole body.
pub struct TestDb {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

impl TestDb {
    /// Connects, migrates and empties the tables. `None` when no database
    /// is configured.
    pub async fn connect() -> Option<Self> {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return None;
        };

        let guard = DB_LOCK.get_or_init(|| Mutex::new(())).lock().await;
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await
            .expect("Failed to connect to test database");
        run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let db = Self {
            pool,
            _guard: guard,
        };
        db.cleanup().await;
        Some(db)
    }

    pub async fn cleanup(&self) {
        sqlx::query("TRUNCATE exam_proctor_registrations, registration_windows RESTART IDENTITY")
            .execute(&self.pool)
            .await
            .expect("Failed to clean test tables");
    }

    pub async fn row_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM exam_proctor_registrations")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}

/// A fully derived row for direct ledger inserts.
pub fn registration(emp_code: &str, exam_date: &str, ts: i64, role: &str) -> NewRegistration {
    NewRegistration {
        emp_code: emp_code.to_string(),
        prefix_name: "นาย".to_string(),
        first_name: "สมชาย".to_string(),
        last_name: "ใจดี".to_string(),
        full_name: "นายสมชาย ใจดี".to_string(),
        full_name_eng: String::new(),
        position_name: "อาจารย์".to_string(),
        level_name: "ปริญญาโท".to_string(),
        level_code: "60".to_string(),
        section_name: String::new(),
        department_name: "คณะวิทยาศาสตร์".to_string(),
        exam_date: exam_date.to_string(),
        registration_timestamp: ts,
        registration_datetime: "2025-11-01T08:00:00.000".to_string(),
        confirmed_data: true,
        confirmed_exam: true,
        status: "registered".to_string(),
        sequence_number: "00400000".to_string(),
        phone_number: "0812345678".to_string(),
        user_type: "employee".to_string(),
        user_role: role.to_string(),
        gender: "ชาย".to_string(),
    }
}
