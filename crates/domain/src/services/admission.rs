//! The admission gate: ordered checks guarding writes to the ledger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::datetime::truncate_to_millis;
use shared::validation::{
    is_blank, validate_level_code, validate_registration_timestamp, DEFAULT_ALLOWED_LEVEL_CODES,
};

use crate::errors::{AdmissionError, StoreError};
use crate::models::{
    AdmissionReceipt, CapacityConfig, NewRegistration, RegistrationCandidate, RegistrationWindow,
    WindowStatus,
};
use crate::services::classification::{derive_gender, normalize_user_type, resolve_user_role, RoleMarkers};
use crate::services::ledger::RegistrationLedger;
use crate::services::queue::QueueRanker;

/// Default exam date label when neither the request nor configuration names one.
pub const DEFAULT_EXAM_DATE: &str = "2568-12-07";

/// Default registration status.
pub const DEFAULT_STATUS: &str = "registered";

/// Static admission rules, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    pub capacity: CapacityConfig,
    pub default_exam_date: String,
    pub default_status: String,
    pub allowed_level_codes: Vec<String>,
    pub admin_markers: RoleMarkers,
}

impl AdmissionPolicy {
    pub fn new(capacity: CapacityConfig) -> Self {
        Self {
            capacity,
            default_exam_date: DEFAULT_EXAM_DATE.to_string(),
            default_status: DEFAULT_STATUS.to_string(),
            allowed_level_codes: DEFAULT_ALLOWED_LEVEL_CODES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            admin_markers: RoleMarkers::default(),
        }
    }
}

/// `last3(emp_code) + last5(timestamp)`, by characters.
pub fn sequence_number(emp_code: &str, registration_timestamp: &str) -> String {
    format!(
        "{}{}",
        last_chars(emp_code, 3),
        last_chars(registration_timestamp, 5)
    )
}

fn last_chars(value: &str, n: usize) -> &str {
    let count = value.chars().count();
    if count <= n {
        return value;
    }
    match value.char_indices().nth(count - n) {
        Some((idx, _)) => &value[idx..],
        None => value,
    }
}

/// Parses a client timestamp. Integral floats such as `1.7e12` are accepted.
fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_blank(v))
}

/// Decides whether a submission may be recorded, and records it.
#[derive(Clone)]
pub struct AdmissionGate {
    ledger: Arc<dyn RegistrationLedger>,
    ranker: QueueRanker,
    policy: Arc<AdmissionPolicy>,
}

impl AdmissionGate {
    pub fn new(ledger: Arc<dyn RegistrationLedger>, policy: AdmissionPolicy) -> Self {
        Self {
            ranker: QueueRanker::new(ledger.clone()),
            ledger,
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    /// Runs a submission through the gate.
    ///
    /// `window` is the snapshot read once for this request and `now` the
    /// server time it is judged against.
    pub async fn submit(
        &self,
        window: &RegistrationWindow,
        now: DateTime<Utc>,
        candidate: RegistrationCandidate,
    ) -> Result<AdmissionReceipt, AdmissionError> {
        let emp_code = candidate.emp_code.trim().to_string();
        let result = self.evaluate(window, now, candidate).await;
        match &result {
            Ok(receipt) => tracing::info!(
                emp_code = %emp_code,
                registration_id = receipt.registration_id,
                queue_number = receipt.queue_number,
                user_role = %receipt.user_role,
                outcome = "admitted",
                "Registration admitted"
            ),
            Err(AdmissionError::Storage(message)) => tracing::error!(
                emp_code = %emp_code,
                error = %message,
                outcome = "storage_error",
                "Registration failed"
            ),
            Err(err) => tracing::info!(
                emp_code = %emp_code,
                outcome = err.outcome(),
                "Registration rejected"
            ),
        }
        result
    }

    async fn evaluate(
        &self,
        window: &RegistrationWindow,
        now: DateTime<Utc>,
        candidate: RegistrationCandidate,
    ) -> Result<AdmissionReceipt, AdmissionError> {
        match window.status_at(now) {
            WindowStatus::BeforeOpen => {
                return Err(AdmissionError::WindowNotYetOpen {
                    opens_at: window.opens_at,
                })
            }
            WindowStatus::AfterClose => {
                return Err(AdmissionError::WindowClosed {
                    closes_at: window.closes_at,
                })
            }
            WindowStatus::Open => {}
        }

        let emp_code = candidate.emp_code.trim().to_string();
        let mut missing = Vec::new();
        if is_blank(&emp_code) {
            missing.push("emp_code");
        }
        if is_blank(&candidate.registration_timestamp) {
            missing.push("registration_timestamp");
        }
        if is_blank(&candidate.registration_datetime) {
            missing.push("registration_datetime");
        }
        if !missing.is_empty() {
            return Err(AdmissionError::MissingFields(missing));
        }

        let registration_timestamp = parse_timestamp(&candidate.registration_timestamp)
            .filter(|ts| validate_registration_timestamp(*ts).is_ok())
            .ok_or(AdmissionError::InvalidField("registration_timestamp"))?;

        if !candidate.confirmed_data || !candidate.confirmed_exam {
            return Err(AdmissionError::ConfirmationRequired);
        }

        let level_code = candidate.level_code.trim().to_string();
        if validate_level_code(&level_code, &self.policy.allowed_level_codes).is_err() {
            return Err(AdmissionError::IneligibleLevel(level_code));
        }

        if let Some(existing) = self.ledger.find_by_employee_code(&emp_code).await? {
            let detail = self.ranker.detail(existing).await?;
            return Err(AdmissionError::AlreadyRegistered(Box::new(detail)));
        }

        let user_type = normalize_user_type(&candidate.user_type);
        let user_role = resolve_user_role(
            candidate.user_role.as_deref(),
            &user_type,
            &self.policy.admin_markers,
        );

        // Read-then-decide: concurrent submissions near the limit may all pass.
        if !user_role.is_admin() {
            let registered = self.ledger.count_non_admin().await?;
            if self.policy.capacity.is_full(registered) {
                return Err(AdmissionError::CapacityExceeded {
                    registered,
                    capacity: self.policy.capacity.total_capacity,
                });
            }
        }

        let timestamp_text = registration_timestamp.to_string();
        let sequence = match non_blank(candidate.sequence_number.as_deref()) {
            Some(seq) => seq.trim().to_string(),
            None => sequence_number(&emp_code, &timestamp_text),
        };
        let gender = match non_blank(candidate.gender.as_deref()) {
            Some(g) => g.trim().to_string(),
            None => derive_gender(&candidate.prefix_name).label().to_string(),
        };
        let exam_date = non_blank(candidate.exam_date.as_deref())
            .map(|d| d.trim().to_string())
            .unwrap_or_else(|| self.policy.default_exam_date.clone());
        let status = non_blank(candidate.status.as_deref())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| self.policy.default_status.clone());

        let record = NewRegistration {
            emp_code: emp_code.clone(),
            prefix_name: candidate.prefix_name,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            full_name: candidate.full_name,
            full_name_eng: candidate.full_name_eng,
            position_name: candidate.position_name,
            level_name: candidate.level_name,
            level_code,
            section_name: candidate.section_name,
            department_name: candidate.department_name,
            exam_date,
            registration_timestamp,
            registration_datetime: truncate_to_millis(&candidate.registration_datetime),
            confirmed_data: true,
            confirmed_exam: true,
            status,
            sequence_number: sequence,
            phone_number: candidate.phone_number,
            user_type,
            user_role: user_role.as_str().to_string(),
            gender,
        };

        let registration = match self.ledger.insert(record).await {
            Ok(registration) => registration,
            Err(StoreError::Conflict(reason)) => {
                tracing::warn!(
                    emp_code = %emp_code,
                    reason = %reason,
                    "Concurrent registration won the insert"
                );
                return Err(self.recover_conflict(&emp_code).await);
            }
            Err(err) => return Err(err.into()),
        };

        let queue_number = self
            .ranker
            .rank_of(&registration.exam_date, registration.registration_timestamp)
            .await?;

        Ok(AdmissionReceipt {
            registration_id: registration.id,
            queue_number,
            sequence_number: registration.sequence_number,
            phone_number: registration.phone_number,
            user_type: registration.user_type,
            user_role: registration.user_role,
            level_name: registration.level_name,
            level_code: registration.level_code,
            gender: registration.gender,
        })
    }

    /// Answers an insert-time uniqueness violation with the winner's record.
    async fn recover_conflict(&self, emp_code: &str) -> AdmissionError {
        match self.ranker.detail_for(emp_code).await {
            Ok(Some(detail)) => AdmissionError::AlreadyRegistered(Box::new(detail)),
            Ok(None) => AdmissionError::Storage(format!(
                "registration for {emp_code} conflicted but could not be read back"
            )),
            Err(err) => err.into(),
        }
    }
}
