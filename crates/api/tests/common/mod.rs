//! Common test utilities for integration tests.
//!
//! The router is wired to the in-memory ledger and window store and to a stub
//! HR login service, so no database or network is needed.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use domain::models::LoginRequest;
use domain::services::{InMemoryLedger, InMemoryWindowStore};
use proctor_registration_api::{
    app::{create_app_with_stores, Stores},
    config::{
        CapacityLimits, Config, DatabaseConfig, HrLoginConfig, LoggingConfig, RegistrationConfig,
        SecurityConfig, ServerConfig, WindowConfig,
    },
    services::{HrLoginService, LoginError},
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const API_KEY: &str = "test-api-key";
pub const ADMIN_EMP_CODE: &str = "900001";

pub fn test_config() -> Config {
    let now = Utc::now();
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            api_key: API_KEY.to_string(),
            cors_origins: vec![],
            admin_roles: vec![
                "admin".to_string(),
                "administrator".to_string(),
                "ผู้ดูแล".to_string(),
            ],
            admin_emp_codes: vec![ADMIN_EMP_CODE.to_string()],
        },
        registration: RegistrationConfig {
            exam_date: "2568-12-07".to_string(),
            allowed_level_codes: ["40", "50", "60", "70", "80", "90"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            default_status: "registered".to_string(),
        },
        window: WindowConfig {
            opens_at: (now - Duration::days(1)).to_rfc3339(),
            closes_at: (now + Duration::days(1)).to_rfc3339(),
            timezone: "Asia/Bangkok".to_string(),
            utc_offset_minutes: 420,
        },
        capacity: CapacityLimits {
            primary: 100,
            reserve: 20,
            total: 0,
        },
        hr_login: HrLoginConfig {
            url: "http://127.0.0.1:9/login_api.php".to_string(),
            api_key: String::new(),
            timeout_ms: 1_000,
            session_timeout_secs: 600,
        },
    }
}

/// Config whose window closed yesterday.
pub fn closed_window_config() -> Config {
    let now = Utc::now();
    let mut config = test_config();
    config.window.opens_at = (now - Duration::days(3)).to_rfc3339();
    config.window.closes_at = (now - Duration::days(1)).to_rfc3339();
    config
}

/// Behaviour of the stub HR login service.
#[derive(Debug, Clone)]
pub enum StubHrLogin {
    /// Accepts `username`/`password` and returns `data`.
    Accept {
        username: String,
        password: String,
        data: Value,
    },
    TimesOut,
}

#[async_trait]
impl HrLoginService for StubHrLogin {
    async fn authenticate(&self, request: &LoginRequest) -> Result<Value, LoginError> {
        match self {
            StubHrLogin::Accept {
                username,
                password,
                data,
            } if *username == request.username && *password == request.password => {
                Ok(data.clone())
            }
            StubHrLogin::Accept { .. } => Err(LoginError::InvalidCredentials(
                "ชื่อผู้ใช้หรือรหัสผ่านไม่ถูกต้อง".to_string(),
            )),
            StubHrLogin::TimesOut => Err(LoginError::Timeout(1_000)),
        }
    }
}

pub fn default_hr_login() -> StubHrLogin {
    StubHrLogin::Accept {
        username: "653004".to_string(),
        password: "secret".to_string(),
        data: json!({
            "user_id": "653004",
            "raw_data": {
                "EMP_CODE": "653004",
                "PREFIX_NAME": "นางสาว",
                "FIRST_NAME": "สมศรี",
                "LAST_NAME": "ใจงาม",
                "POSITION_NAME": "นักวิชาการศึกษา",
                "LEVEL_NAME": "ปริญญาโท",
                "LEVEL_CODE": "60",
                "DEPARTMENT_NAME": "คณะวิทยาศาสตร์",
                "PHONE": "0812345678",
                "USER_TYPE": "Employee"
            }
        }),
    }
}

pub struct TestApp {
    pub router: Router,
    pub ledger: Arc<InMemoryLedger>,
    pub windows: Arc<InMemoryWindowStore>,
}

pub fn create_test_app(config: Config) -> TestApp {
    create_test_app_with_hr(config, default_hr_login())
}

pub fn create_test_app_with_hr(config: Config, hr_login: StubHrLogin) -> TestApp {
    let ledger = Arc::new(InMemoryLedger::new());
    let windows = Arc::new(InMemoryWindowStore::new());
    let stores = Stores {
        ledger: ledger.clone(),
        windows: windows.clone(),
        hr_login: Arc::new(hr_login),
    };
    TestApp {
        router: create_app_with_stores(config, stores),
        ledger,
        windows,
    }
}

/// GET request carrying the API key header.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("X-API-Key", API_KEY)
        .body(Body::empty())
        .unwrap()
}

/// POST request with a JSON body and the API key header.
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("X-API-Key", API_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends a request and parses the body as JSON (`Null` when empty).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// A complete, valid submission for `emp_code`.
pub fn registration_body(emp_code: &str, timestamp: i64) -> Value {
    json!({
        "emp_code": emp_code,
        "confirmed_data": true,
        "confirmed_exam": true,
        "registration_timestamp": timestamp,
        "registration_datetime": "2024-01-01T00:00:00.123456Z",
        "prefix_name": "นาย",
        "first_name": "สมชาย",
        "last_name": "ใจดี",
        "level_name": "ปริญญาตรี",
        "level_code": "50",
        "department_name": "คณะวิทยาศาสตร์",
        "phone": "0812345678"
    })
}
