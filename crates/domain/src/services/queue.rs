//! Queue position lookup.

use std::sync::Arc;

use crate::errors::StoreError;
use crate::models::{Registration, RegistrationDetail};
use crate::services::ledger::RegistrationLedger;

/// Computes a registration's 1-based position among registrations for the
/// same exam date.
///
/// Positions are count based, so identical timestamps share a position.
#[derive(Clone)]
pub struct QueueRanker {
    ledger: Arc<dyn RegistrationLedger>,
}

impl QueueRanker {
    pub fn new(ledger: Arc<dyn RegistrationLedger>) -> Self {
        Self { ledger }
    }

    pub async fn rank_of(
        &self,
        exam_date: &str,
        registration_timestamp: i64,
    ) -> Result<i64, StoreError> {
        self.ledger.rank_of(exam_date, registration_timestamp).await
    }

    /// Pairs a stored registration with its current position.
    pub async fn detail(&self, registration: Registration) -> Result<RegistrationDetail, StoreError> {
        let queue_number = self
            .rank_of(&registration.exam_date, registration.registration_timestamp)
            .await?;
        Ok(RegistrationDetail {
            registration,
            queue_number,
        })
    }

    /// Looks up an employee's registration with its position.
    pub async fn detail_for(&self, emp_code: &str) -> Result<Option<RegistrationDetail>, StoreError> {
        match self.ledger.find_by_employee_code(emp_code).await? {
            Some(registration) => Ok(Some(self.detail(registration).await?)),
            None => Ok(None),
        }
    }
}
