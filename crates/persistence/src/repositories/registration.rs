//! Registration ledger backed by `exam_proctor_registrations`.

use domain::models::stats::normalize_group_counts;
use domain::models::{GroupCount, GroupField, NewRegistration, Registration};
use domain::services::RegistrationLedger;
use domain::StoreError;
use sqlx::PgPool;

use super::map_sqlx_error;
use crate::entities::registration::{RegistrationEntity, REGISTRATION_COLUMNS};
use crate::metrics::{record_pool_metrics, QueryTimer};

/// Repository for registration rows.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RegistrationLedger for RegistrationRepository {
    async fn find_by_employee_code(
        &self,
        emp_code: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let timer = QueryTimer::new("find_registration_by_emp_code");
        let sql = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM exam_proctor_registrations WHERE emp_code = $1 LIMIT 1"
        );
        let result = sqlx::query_as::<_, RegistrationEntity>(&sql)
            .bind(emp_code)
            .fetch_optional(&self.pool)
            .await;
        timer.record();

        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn exists(&self, emp_code: &str) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("registration_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM exam_proctor_registrations WHERE emp_code = $1
            )
            "#,
        )
        .bind(emp_code)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        result.map_err(map_sqlx_error)
    }

    async fn insert(&self, record: NewRegistration) -> Result<Registration, StoreError> {
        let timer = QueryTimer::new("insert_registration");
        let sql = format!(
            r#"
            INSERT INTO exam_proctor_registrations (
                emp_code, prefix_name, first_name, last_name, full_name, full_name_eng,
                position_name, level_name, level_code, section_name, department_name,
                exam_date, registration_timestamp, registration_datetime,
                confirmed_data, confirmed_exam, status, sequence_number,
                phone_number, user_type, user_role, gender
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, RegistrationEntity>(&sql)
            .bind(&record.emp_code)
            .bind(&record.prefix_name)
            .bind(&record.first_name)
            .bind(&record.last_name)
            .bind(&record.full_name)
            .bind(&record.full_name_eng)
            .bind(&record.position_name)
            .bind(&record.level_name)
            .bind(&record.level_code)
            .bind(&record.section_name)
            .bind(&record.department_name)
            .bind(&record.exam_date)
            .bind(record.registration_timestamp)
            .bind(&record.registration_datetime)
            .bind(record.confirmed_data)
            .bind(record.confirmed_exam)
            .bind(&record.status)
            .bind(&record.sequence_number)
            .bind(&record.phone_number)
            .bind(&record.user_type)
            .bind(&record.user_role)
            .bind(&record.gender)
            .fetch_one(&self.pool)
            .await;
        timer.record();

        Ok(result.map_err(map_sqlx_error)?.into())
    }

    async fn count_non_admin(&self) -> Result<i64, StoreError> {
        let timer = QueryTimer::new("count_non_admin_registrations");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM exam_proctor_registrations
            WHERE user_role <> 'admin'
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();

        result.map_err(map_sqlx_error)
    }

    async fn rank_of(
        &self,
        exam_date: &str,
        registration_timestamp: i64,
    ) -> Result<i64, StoreError> {
        let timer = QueryTimer::new("registration_queue_rank");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM exam_proctor_registrations
            WHERE exam_date = $1 AND registration_timestamp <= $2
            "#,
        )
        .bind(exam_date)
        .bind(registration_timestamp)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        result.map_err(map_sqlx_error)
    }

    async fn list_all(&self, limit: i64) -> Result<Vec<Registration>, StoreError> {
        let timer = QueryTimer::new("list_registrations");
        let sql = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM exam_proctor_registrations \
             ORDER BY registration_timestamp ASC, id ASC LIMIT $1"
        );
        let result = sqlx::query_as::<_, RegistrationEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();

        Ok(result
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn group_count(&self, field: GroupField) -> Result<Vec<GroupCount>, StoreError> {
        let timer = QueryTimer::new("group_registrations");
        // The column name comes from a closed enum, never from input.
        let column = field.column();
        let sql = format!(
            "SELECT {column} AS label, COUNT(*) AS count \
             FROM exam_proctor_registrations GROUP BY {column}"
        );
        let result = sqlx::query_as::<_, (Option<String>, i64)>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();

        Ok(normalize_group_counts(result.map_err(map_sqlx_error)?))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        record_pool_metrics(&self.pool);
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
