//! Database-specific error types and conversions.

use stockwise_core::error::StockwiseError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Stored value could not be decoded: {0}")]
    Decode(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Unique constraint violated on {entity}")]
    Duplicate { entity: String },

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

/// Raised inside a stock-out transaction when the quantity guard fails.
pub(crate) const STALE_STOCK_LEVEL: &str = "stale stock level";

impl DbError {
    /// Classify a failed statement, recognising unique-index violations.
    pub(crate) fn from_check(entity: &str, err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Duplicate {
                entity: entity.to_string(),
            }
        } else {
            DbError::Query(message)
        }
    }

    /// Whether a statement failed because another writer got there first,
    /// either through our own quantity guard or a storage-level conflict.
    pub(crate) fn is_write_conflict(err: &surrealdb::Error) -> bool {
        let message = err.to_string();
        message.contains(STALE_STOCK_LEVEL) || message.contains("can be retried")
    }
}

impl From<DbError> for StockwiseError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StockwiseError::NotFound { entity, id },
            DbError::Duplicate { entity } => StockwiseError::AlreadyExists { entity },
            DbError::Hash(msg) => StockwiseError::Crypto(msg),
            other => StockwiseError::Database(other.to_string()),
        }
    }
}
