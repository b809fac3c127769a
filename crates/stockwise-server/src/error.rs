//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stockwise_core::error::StockwiseError;
use tracing::{debug, error};

/// Error type returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub StockwiseError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            StockwiseError::Validation { .. } => StatusCode::BAD_REQUEST,
            StockwiseError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            StockwiseError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            StockwiseError::NotFound { .. } => StatusCode::NOT_FOUND,
            StockwiseError::AlreadyExists { .. } => StatusCode::CONFLICT,
            StockwiseError::Database(_)
            | StockwiseError::Crypto(_)
            | StockwiseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StockwiseError> for ApiError {
    fn from(err: StockwiseError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected request body");
        Self(StockwiseError::validation("invalid request body"))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected path parameter");
        Self(StockwiseError::validation("invalid id"))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected query string");
        Self(StockwiseError::validation("invalid query parameters"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = Json(json!({
            "success": false,
            "error": self.0.public_message(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        let cases = [
            (StockwiseError::validation("x"), StatusCode::BAD_REQUEST),
            (
                StockwiseError::AuthenticationFailed {
                    reason: "unauthorized".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                StockwiseError::AuthorizationDenied {
                    reason: "account is pending approval".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (StockwiseError::not_found("product", "1"), StatusCode::NOT_FOUND),
            (
                StockwiseError::AlreadyExists {
                    entity: "email".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                StockwiseError::Database("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }
}
