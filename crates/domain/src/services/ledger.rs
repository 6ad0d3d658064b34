//! Registration ledger storage contract.

use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::StoreError;
use crate::models::stats::normalize_group_counts;
use crate::models::{GroupCount, GroupField, NewRegistration, Registration};

/// Storage for committed registrations, one row per employee code.
#[async_trait::async_trait]
pub trait RegistrationLedger: Send + Sync {
    /// Finds the registration for an employee code.
    async fn find_by_employee_code(&self, emp_code: &str)
        -> Result<Option<Registration>, StoreError>;

    /// Whether the employee code already holds a registration.
    async fn exists(&self, emp_code: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_employee_code(emp_code).await?.is_some())
    }

    /// Appends a registration.
    ///
    /// Returns [`StoreError::Conflict`] when the employee code is already
    /// present.
    async fn insert(&self, record: NewRegistration) -> Result<Registration, StoreError>;

    /// Count of registrations whose role is not `admin`.
    async fn count_non_admin(&self) -> Result<i64, StoreError>;

    /// Count of registrations for `exam_date` submitted at or before
    /// `registration_timestamp`.
    async fn rank_of(&self, exam_date: &str, registration_timestamp: i64)
        -> Result<i64, StoreError>;

    /// Registrations ordered by submission time, oldest first. `limit` must
    /// already be clamped by the caller.
    async fn list_all(&self, limit: i64) -> Result<Vec<Registration>, StoreError>;

    /// Counts grouped by `field`, normalized and sorted.
    async fn group_count(&self, field: GroupField) -> Result<Vec<GroupCount>, StoreError>;

    /// Connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// In-process ledger.
///
/// Enforces the same unique employee code constraint as the database schema.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    rows: RwLock<Vec<Registration>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, admins included.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn group_value(row: &Registration, field: GroupField) -> &str {
    match field {
        GroupField::UserType => &row.user_type,
        GroupField::UserRole => &row.user_role,
        GroupField::Department => &row.department_name,
        GroupField::Level => &row.level_name,
        GroupField::Gender => &row.gender,
    }
}

#[async_trait::async_trait]
impl RegistrationLedger for InMemoryLedger {
    async fn find_by_employee_code(
        &self,
        emp_code: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.emp_code == emp_code).cloned())
    }

    async fn insert(&self, record: NewRegistration) -> Result<Registration, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.emp_code == record.emp_code) {
            return Err(StoreError::Conflict(format!(
                "emp_code {} already registered",
                record.emp_code
            )));
        }

        let id = rows.last().map(|r| r.id + 1).unwrap_or(1);
        let registration = record.into_registration(id, Utc::now());
        rows.push(registration.clone());
        Ok(registration)
    }

    async fn count_non_admin(&self) -> Result<i64, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| !r.is_admin()).count() as i64)
    }

    async fn rank_of(
        &self,
        exam_date: &str,
        registration_timestamp: i64,
    ) -> Result<i64, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| r.exam_date == exam_date && r.registration_timestamp <= registration_timestamp)
            .count() as i64)
    }

    async fn list_all(&self, limit: i64) -> Result<Vec<Registration>, StoreError> {
        let rows = self.rows.read().await;
        let mut items: Vec<Registration> = rows.clone();
        items.sort_by(|a, b| {
            a.registration_timestamp
                .cmp(&b.registration_timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        items.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(items)
    }

    async fn group_count(&self, field: GroupField) -> Result<Vec<GroupCount>, StoreError> {
        let rows = self.rows.read().await;
        Ok(normalize_group_counts(
            rows.iter()
                .map(|r| (Some(group_value(r, field).to_string()), 1)),
        ))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::fixtures::new_registration;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let ledger = InMemoryLedger::new();
        let a = ledger
            .insert(new_registration("1", "d", 10, "user"))
            .await
            .unwrap();
        let b = ledger
            .insert(new_registration("2", "d", 20, "user"))
            .await
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(ledger.len().await, 2);
    }

    #[tokio::test]
    async fn test_insert_duplicate_conflicts() {
        let ledger = InMemoryLedger::new();
        ledger
            .insert(new_registration("653004", "d", 10, "user"))
            .await
            .unwrap();
        let err = ledger
            .insert(new_registration("653004", "d", 11, "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_exists_default_method() {
        let ledger = InMemoryLedger::new();
        assert!(!ledger.exists("1").await.unwrap());
        ledger
            .insert(new_registration("1", "d", 10, "user"))
            .await
            .unwrap();
        assert!(ledger.exists("1").await.unwrap());
    }

    #[tokio::test]
    async fn test_count_non_admin_excludes_admins() {
        let ledger = InMemoryLedger::new();
        ledger.insert(new_registration("1", "d", 1, "user")).await.unwrap();
        ledger.insert(new_registration("2", "d", 2, "admin")).await.unwrap();
        ledger.insert(new_registration("3", "d", 3, "user")).await.unwrap();
        assert_eq!(ledger.count_non_admin().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rank_of_counts_same_exam_date_only() {
        let ledger = InMemoryLedger::new();
        ledger.insert(new_registration("1", "a", 100, "user")).await.unwrap();
        ledger.insert(new_registration("2", "a", 200, "user")).await.unwrap();
        ledger.insert(new_registration("3", "b", 50, "user")).await.unwrap();

        assert_eq!(ledger.rank_of("a", 100).await.unwrap(), 1);
        assert_eq!(ledger.rank_of("a", 200).await.unwrap(), 2);
        assert_eq!(ledger.rank_of("b", 50).await.unwrap(), 1);
        assert_eq!(ledger.rank_of("a", 99).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rank_ties_share_position() {
        let ledger = InMemoryLedger::new();
        ledger.insert(new_registration("1", "a", 100, "user")).await.unwrap();
        ledger.insert(new_registration("2", "a", 100, "user")).await.unwrap();
        assert_eq!(ledger.rank_of("a", 100).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_all_orders_by_timestamp_and_limits() {
        let ledger = InMemoryLedger::new();
        ledger.insert(new_registration("1", "a", 300, "user")).await.unwrap();
        ledger.insert(new_registration("2", "a", 100, "user")).await.unwrap();
        ledger.insert(new_registration("3", "a", 200, "user")).await.unwrap();

        let all = ledger.list_all(10).await.unwrap();
        let codes: Vec<&str> = all.iter().map(|r| r.emp_code.as_str()).collect();
        assert_eq!(codes, vec!["2", "3", "1"]);

        let limited = ledger.list_all(2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].emp_code, "2");
    }

    #[tokio::test]
    async fn test_group_count_normalizes_blank_labels() {
        let ledger = InMemoryLedger::new();
        let mut blank = new_registration("1", "a", 1, "user");
        blank.department_name = String::new();
        ledger.insert(blank).await.unwrap();
        ledger.insert(new_registration("2", "a", 2, "user")).await.unwrap();
        ledger.insert(new_registration("3", "a", 3, "user")).await.unwrap();

        let counts = ledger.group_count(GroupField::Department).await.unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].label, "คณะวิทยาศาสตร์");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].label, "ไม่ระบุ");
        assert_eq!(counts[1].count, 1);
    }
}
