//! Error types for the Stockwise system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StockwiseError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StockwiseError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Message safe to hand back to an API caller.
    ///
    /// Storage and crypto failures are collapsed to a generic message so
    /// internals never reach the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("{} not found", capitalize(entity)),
            Self::AlreadyExists { entity } => format!("{} already exists", capitalize(entity)),
            Self::AuthenticationFailed { reason } | Self::AuthorizationDenied { reason } => {
                reason.clone()
            }
            Self::Validation { message } => message.clone(),
            Self::Database(_) | Self::Crypto(_) | Self::Internal(_) => {
                "internal server error".to_string()
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub type StockwiseResult<T> = Result<T, StockwiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_hides_id() {
        let err = StockwiseError::not_found("product", "1234");
        assert_eq!(err.public_message(), "Product not found");
    }

    #[test]
    fn storage_errors_are_generic() {
        let err = StockwiseError::Database("connection reset by peer".into());
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn validation_message_passes_through() {
        let err = StockwiseError::validation("insufficient stock");
        assert_eq!(err.public_message(), "insufficient stock");
    }
}
