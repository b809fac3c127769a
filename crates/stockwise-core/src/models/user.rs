//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// Admin approval state gating whether a `user`-role account may log in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub company: String,
    /// Argon2id PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: ApprovalStatus,
    /// Admin who last approved or rejected this account.
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this account passes the approval gate.
    ///
    /// Admins bypass approval entirely.
    pub fn may_log_in(&self) -> bool {
        self.role == UserRole::Admin || self.status == ApprovalStatus::Approved
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub full_name: String,
    pub email: String,
    pub company: String,
    /// Raw password (will be hashed with Argon2id before storage).
    pub password: String,
    pub role: UserRole,
    pub status: ApprovalStatus,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub role: Option<UserRole>,
    pub status: Option<ApprovalStatus>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
}
