//! Authentication configuration.

/// Configuration for the account and session services.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Optional pepper prepended to passwords before Argon2id
    /// hashing and verification.
    pub pepper: Option<String>,
    /// Minimum password length accepted at registration.
    pub min_password_length: usize,
    /// Session lifetime in seconds (default: 86_400 = 24 hours). The
    /// window slides forward while the session is in use.
    pub session_lifetime_secs: u64,
    /// Minimum age in seconds of the last recorded touch before a
    /// resolved session is written back (default: 300 = 5 minutes).
    pub session_touch_interval_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pepper: None,
            min_password_length: 6,
            session_lifetime_secs: 86_400,
            session_touch_interval_secs: 300,
        }
    }
}
