//! Stockwise Auth: password verification, account approval and
//! server-side cookie sessions.

pub mod account;
pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use account::{AccountService, AdminSeed, RegisterInput};
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, Authenticated, LoginInput, LoginOutput, ResolvedSession};
