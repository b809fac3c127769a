//! Stockwise Server: configuration, shared state and the HTTP API.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::{SESSION_COOKIE, build_router};
pub use state::AppState;
