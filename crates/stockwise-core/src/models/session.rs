//! Session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StockwiseError, StockwiseResult};
use crate::models::user::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: Uuid,
    pub role: UserRole,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// The authenticated caller, resolved from a live session.
///
/// Passed explicitly into every owner-scoped operation; nothing reads the
/// current caller from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
    pub email: String,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> StockwiseResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(StockwiseError::AuthorizationDenied {
                reason: "access denied: admin only".into(),
            })
        }
    }
}

impl From<&Session> for SessionContext {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            user_id: session.user_id,
            role: session.role,
            email: session.email.clone(),
        }
    }
}
