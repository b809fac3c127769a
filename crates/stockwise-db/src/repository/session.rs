//! SurrealDB implementation of [`SessionRepository`].

use chrono::{DateTime, Utc};
use stockwise_core::error::StockwiseResult;
use stockwise_core::models::session::{CreateSession, Session};
use stockwise_core::repository::SessionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use super::user::{parse_role, parse_uuid, role_to_str};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SessionRow {
    user_id: String,
    role: String,
    email: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    last_seen_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SessionRowWithId {
    record_id: String,
    user_id: String,
    role: String,
    email: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    last_seen_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

fn row_to_session(row: SessionRow, id: Uuid) -> Result<Session, DbError> {
    Ok(Session {
        id,
        user_id: parse_uuid("user", &row.user_id)?,
        role: parse_role(&row.role)?,
        email: row.email,
        token_hash: row.token_hash,
        expires_at: row.expires_at,
        last_seen_at: row.last_seen_at,
        created_at: row.created_at,
    })
}

impl SessionRowWithId {
    fn try_into_session(self) -> Result<Session, DbError> {
        let id = parse_uuid("session", &self.record_id)?;
        row_to_session(
            SessionRow {
                user_id: self.user_id,
                role: self.role,
                email: self.email,
                token_hash: self.token_hash,
                expires_at: self.expires_at,
                last_seen_at: self.last_seen_at,
                created_at: self.created_at,
            },
            id,
        )
    }
}

/// SurrealDB implementation of the Session repository.
#[derive(Clone)]
pub struct SurrealSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SessionRepository for SurrealSessionRepository<C> {
    async fn create(&self, input: CreateSession) -> StockwiseResult<Session> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('session', $id) SET \
                 user_id = $user_id, \
                 role = $role, \
                 email = $email, \
                 token_hash = $token_hash, \
                 expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("role", role_to_str(input.role).to_string()))
            .bind(("email", input.email))
            .bind(("token_hash", input.token_hash))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("session", e))?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: id_str,
        })?;

        row_to_session(row, id).map_err(Into::into)
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> StockwiseResult<Session> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM session \
                 WHERE token_hash = $token_hash",
            )
            .bind(("token_hash", token_hash.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRowWithId> = result.take(0).map_err(DbError::from)?;
        // The token hash is a credential; keep it out of error messages.
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: "token".into(),
        })?;

        row.try_into_session().map_err(Into::into)
    }

    async fn touch(&self, id: Uuid, expires_at: DateTime<Utc>) -> StockwiseResult<()> {
        self.db
            .query(
                "UPDATE type::record('session', $id) SET \
                 expires_at = $expires_at, last_seen_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("expires_at", expires_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_check("session", e))?;

        Ok(())
    }

    async fn invalidate(&self, id: Uuid) -> StockwiseResult<()> {
        self.db
            .query("DELETE type::record('session', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn invalidate_user_sessions(&self, user_id: Uuid) -> StockwiseResult<()> {
        self.db
            .query("DELETE session WHERE user_id = $user_id")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> StockwiseResult<u64> {
        // Count expired sessions first, then delete.
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM session \
                 WHERE expires_at < time::now() \
                 GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE session WHERE expires_at < time::now()")
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
