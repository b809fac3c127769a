//! Authentication error types.

use stockwise_core::error::StockwiseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    #[error("account is pending approval")]
    AccountPendingApproval,

    #[error("account was rejected")]
    AccountRejected,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for StockwiseError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::Unauthorized => {
                StockwiseError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::AccountPendingApproval | AuthError::AccountRejected => {
                StockwiseError::AuthorizationDenied {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => StockwiseError::Crypto(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_gate_maps_to_forbidden() {
        let err: StockwiseError = AuthError::AccountPendingApproval.into();
        assert!(matches!(err, StockwiseError::AuthorizationDenied { .. }));
        assert_eq!(err.public_message(), "account is pending approval");
    }

    #[test]
    fn credential_failures_map_to_unauthenticated() {
        let err: StockwiseError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, StockwiseError::AuthenticationFailed { .. }));
        assert_eq!(err.public_message(), "invalid credentials");
    }
}
