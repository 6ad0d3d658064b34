//! Aggregate statistics models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::services::classification::UNSPECIFIED_LABEL;

/// Ledger attributes that can be grouped for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    UserType,
    UserRole,
    Department,
    Level,
    Gender,
}

impl GroupField {
    pub const ALL: [GroupField; 5] = [
        GroupField::UserType,
        GroupField::UserRole,
        GroupField::Department,
        GroupField::Level,
        GroupField::Gender,
    ];

    /// Column holding the attribute in `exam_proctor_registrations`.
    pub fn column(&self) -> &'static str {
        match self {
            GroupField::UserType => "user_type",
            GroupField::UserRole => "user_role",
            GroupField::Department => "department_name",
            GroupField::Level => "level_name",
            GroupField::Gender => "gender",
        }
    }
}

impl std::fmt::Display for GroupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// One bucket of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub label: String,
    pub count: i64,
}

/// Admin dashboard statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationStats {
    /// Non-admin registrations.
    pub total: i64,
    pub by_user_type: Vec<GroupCount>,
    pub by_user_role: Vec<GroupCount>,
    pub by_department: Vec<GroupCount>,
    pub by_level: Vec<GroupCount>,
    pub by_gender: Vec<GroupCount>,
}

impl RegistrationStats {
    /// Stores the breakdown for `field`.
    pub fn set_breakdown(&mut self, field: GroupField, counts: Vec<GroupCount>) {
        match field {
            GroupField::UserType => self.by_user_type = counts,
            GroupField::UserRole => self.by_user_role = counts,
            GroupField::Department => self.by_department = counts,
            GroupField::Level => self.by_level = counts,
            GroupField::Gender => self.by_gender = counts,
        }
    }
}

/// Normalizes raw `(label, count)` rows.
///
/// Null and blank labels collapse into [`UNSPECIFIED_LABEL`] (merging their
/// counts). Output is sorted by count descending, then label ascending.
pub fn normalize_group_counts<I>(rows: I) -> Vec<GroupCount>
where
    I: IntoIterator<Item = (Option<String>, i64)>,
{
    let mut merged: BTreeMap<String, i64> = BTreeMap::new();
    for (label, count) in rows {
        let label = match label {
            Some(l) if !l.trim().is_empty() => l,
            _ => UNSPECIFIED_LABEL.to_string(),
        };
        *merged.entry(label).or_insert(0) += count;
    }

    let mut items: Vec<GroupCount> = merged
        .into_iter()
        .map(|(label, count)| GroupCount { label, count })
        .collect();
    items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    items
}
