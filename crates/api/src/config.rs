use domain::models::{CapacityConfig, WindowDefaults};
use domain::services::{AdmissionPolicy, RoleMarkers};
use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub registration: RegistrationConfig,
    pub window: WindowConfig,
    pub capacity: CapacityLimits,
    pub hr_login: HrLoginConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret expected in `X-API-Key` or `?api_key=`. Empty disables
    /// the check.
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Substrings that mark a role or user type as administrative.
    #[serde(default = "default_admin_roles")]
    pub admin_roles: Vec<String>,

    /// Employee codes always treated as administrators.
    #[serde(default)]
    pub admin_emp_codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    #[serde(default = "default_exam_date")]
    pub exam_date: String,

    #[serde(default = "default_allowed_level_codes")]
    pub allowed_level_codes: Vec<String>,

    #[serde(default = "default_status")]
    pub default_status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default)]
    pub opens_at: String,

    #[serde(default)]
    pub closes_at: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Offset applied to naive datetimes, minutes east of UTC.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapacityLimits {
    #[serde(default)]
    pub primary: i64,

    #[serde(default)]
    pub reserve: i64,

    /// Falls back to `primary + reserve` when zero or negative.
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HrLoginConfig {
    #[serde(default)]
    pub url: String,

    /// Key sent to the HR service as `X-API-KEY`.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_hr_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: i64,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_admin_roles() -> Vec<String> {
    domain::services::classification::DEFAULT_ADMIN_MARKERS
        .iter()
        .map(|m| m.to_string())
        .collect()
}
fn default_exam_date() -> String {
    domain::services::admission::DEFAULT_EXAM_DATE.to_string()
}
fn default_allowed_level_codes() -> Vec<String> {
    shared::validation::DEFAULT_ALLOWED_LEVEL_CODES
        .iter()
        .map(|c| c.to_string())
        .collect()
}
fn default_status() -> String {
    domain::services::admission::DEFAULT_STATUS.to_string()
}
fn default_timezone() -> String {
    "Asia/Bangkok".to_string()
}
fn default_utc_offset_minutes() -> i32 {
    420
}
fn default_hr_timeout_ms() -> u64 {
    10_000
}
fn default_session_timeout() -> i64 {
    600
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with PR__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("PR")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .with_list_parse_key("security.admin_roles")
                    .with_list_parse_key("security.admin_emp_codes")
                    .with_list_parse_key("registration.allowed_level_codes")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 2
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            api_key = "test-key"
            cors_origins = []
            admin_emp_codes = ["653004"]

            [registration]
            exam_date = "2568-12-07"

            [window]
            opens_at = "2025-11-01 08:00:00"
            closes_at = "2025-11-05 16:30:00"

            [capacity]
            primary = 100
            reserve = 20
            total = 0

            [hr_login]
            url = "http://localhost:9999/login_api.php"
            timeout_ms = 10000
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Skip validation in tests to allow partial configs
        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "PR__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.hr_login.timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "hr_login.timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    pub fn capacity(&self) -> CapacityConfig {
        CapacityConfig::new(
            self.capacity.primary,
            self.capacity.reserve,
            self.capacity.total,
        )
    }

    pub fn admin_markers(&self) -> RoleMarkers {
        RoleMarkers::new(&self.security.admin_roles)
    }

    /// Static admission rules derived from configuration.
    pub fn admission_policy(&self) -> AdmissionPolicy {
        AdmissionPolicy {
            capacity: self.capacity(),
            default_exam_date: self.registration.exam_date.clone(),
            default_status: self.registration.default_status.clone(),
            allowed_level_codes: self.registration.allowed_level_codes.clone(),
            admin_markers: self.admin_markers(),
        }
    }

    pub fn window_defaults(&self) -> WindowDefaults {
        WindowDefaults {
            opens_at: self.window.opens_at.clone(),
            closes_at: self.window.closes_at.clone(),
            timezone: self.window.timezone.clone(),
            utc_offset_minutes: self.window.utc_offset_minutes,
        }
    }
}
