//! Window store backed by `registration_windows`.

use domain::models::RegistrationWindow;
use domain::services::WindowStore;
use domain::StoreError;
use sqlx::PgPool;

use super::map_sqlx_error;
use crate::entities::WindowEntity;
use crate::metrics::QueryTimer;

/// Repository for registration windows.
#[derive(Clone)]
pub struct WindowRepository {
    pool: PgPool,
}

impl WindowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WindowStore for WindowRepository {
    async fn latest(&self) -> Result<Option<RegistrationWindow>, StoreError> {
        let timer = QueryTimer::new("latest_registration_window");
        let result = sqlx::query_as::<_, WindowEntity>(
            r#"
            SELECT id, opens_at, closes_at, timezone, created_at
            FROM registration_windows
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn insert(&self, window: RegistrationWindow) -> Result<RegistrationWindow, StoreError> {
        let timer = QueryTimer::new("insert_registration_window");
        let result = sqlx::query_as::<_, WindowEntity>(
            r#"
            INSERT INTO registration_windows (opens_at, closes_at, timezone)
            VALUES ($1, $2, $3)
            RETURNING id, opens_at, closes_at, timezone, created_at
            "#,
        )
        .bind(window.opens_at)
        .bind(window.closes_at)
        .bind(&window.timezone)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(map_sqlx_error)?.into())
    }
}
