//! SurrealDB implementation of [`ActivityRepository`].

use chrono::{DateTime, Utc};
use stockwise_core::error::StockwiseResult;
use stockwise_core::models::activity::ActivityRecord;
use stockwise_core::repository::ActivityRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::user::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ActivityRowWithId {
    record_id: String,
    owner_id: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl ActivityRowWithId {
    fn try_into_record(self) -> Result<ActivityRecord, DbError> {
        Ok(ActivityRecord {
            id: parse_uuid("activity", &self.record_id)?,
            owner_id: parse_uuid("owner", &self.owner_id)?,
            message: self.message,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Activity repository.
#[derive(Clone)]
pub struct SurrealActivityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealActivityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ActivityRepository for SurrealActivityRepository<C> {
    async fn list_recent(&self, owner_id: Uuid, limit: u64) -> StockwiseResult<Vec<ActivityRecord>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM activity \
                 WHERE owner_id = $owner_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit",
            )
            .bind(("owner_id", owner_id.to_string()))
            .bind(("limit", limit))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ActivityRowWithId> = result.take(0).map_err(DbError::from)?;

        let records = rows
            .into_iter()
            .map(ActivityRowWithId::try_into_record)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(records)
    }
}
