//! Authentication service: login, session resolution and logout.

use chrono::{Duration, Utc};
use stockwise_core::error::{StockwiseError, StockwiseResult};
use stockwise_core::models::session::{CreateSession, Session, SessionContext};
use stockwise_core::models::user::{ApprovalStatus, User, UserRole};
use stockwise_core::repository::{SessionRepository, UserRepository};
use tracing::{info, warn};
use uuid::Uuid;

use crate::account::normalize_email;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Identity confirmed by a successful credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Raw opaque session token (set as the cookie value, not stored).
    pub token: String,
    pub session: Session,
    pub user: User,
}

/// A resolved session and whether its expiry was just pushed forward.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub context: SessionContext,
    /// Set when the stored expiry moved; the client-side cookie should be
    /// re-issued with a fresh lifetime.
    pub extended: bool,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Check an email/password pair and the approval gate.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> StockwiseResult<Authenticated> {
        let user = self.verify_credentials(email, password).await?;
        Ok(Authenticated {
            user_id: user.id,
            role: user.role,
        })
    }

    /// Authenticate and open a new session.
    pub async fn login(&self, input: LoginInput) -> StockwiseResult<LoginOutput> {
        let user = self.verify_credentials(&input.email, &input.password).await?;

        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = Utc::now() + self.session_lifetime();

        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id,
                role: user.role,
                email: user.email.clone(),
                token_hash,
                expires_at,
            })
            .await?;

        info!(user_id = %user.id, session_id = %session.id, role = ?user.role, "User logged in");

        Ok(LoginOutput {
            token: raw_token,
            session,
            user,
        })
    }

    /// Turn a raw session token into the caller context.
    ///
    /// Absent, unknown and expired tokens all fail with `unauthorized`.
    pub async fn resolve(&self, raw_token: Option<&str>) -> StockwiseResult<SessionContext> {
        self.resolve_sliding(raw_token).await.map(|r| r.context)
    }

    /// Like [`resolve`](Self::resolve), also reporting whether the session
    /// was extended.
    ///
    /// Expired sessions are deleted on sight. Live sessions have their
    /// expiry pushed forward once the last touch is older than the
    /// configured touch interval.
    pub async fn resolve_sliding(
        &self,
        raw_token: Option<&str>,
    ) -> StockwiseResult<ResolvedSession> {
        let raw_token = raw_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthorized)?;
        let token_hash = token::hash_session_token(raw_token);

        let session = match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(s) => s,
            Err(StockwiseError::NotFound { .. }) => return Err(AuthError::Unauthorized.into()),
            Err(e) => return Err(e),
        };

        let now = Utc::now();
        if session.expires_at <= now {
            if let Err(e) = self.session_repo.invalidate(session.id).await {
                warn!(session_id = %session.id, error = %e, "Failed to remove expired session");
            }
            return Err(AuthError::Unauthorized.into());
        }

        let mut extended = false;
        let touch_interval = Duration::seconds(self.config.session_touch_interval_secs as i64);
        if now - session.last_seen_at >= touch_interval {
            match self
                .session_repo
                .touch(session.id, now + self.session_lifetime())
                .await
            {
                Ok(()) => extended = true,
                Err(e) => {
                    warn!(session_id = %session.id, error = %e, "Failed to extend session");
                }
            }
        }

        Ok(ResolvedSession {
            context: SessionContext::from(&session),
            extended,
        })
    }

    /// Destroy the session behind `raw_token`, if any. Never fails for
    /// a missing or already destroyed session.
    pub async fn logout(&self, raw_token: Option<&str>) -> StockwiseResult<()> {
        let Some(raw_token) = raw_token.filter(|t| !t.is_empty()) else {
            return Ok(());
        };
        let token_hash = token::hash_session_token(raw_token);

        match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(session) => {
                self.session_repo.invalidate(session.id).await?;
                info!(user_id = %session.user_id, session_id = %session.id, "User logged out");
                Ok(())
            }
            Err(StockwiseError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Delete every expired session and return how many were removed.
    pub async fn purge_expired(&self) -> StockwiseResult<u64> {
        let removed = self.session_repo.cleanup_expired().await?;
        if removed > 0 {
            info!(removed, "Purged expired sessions");
        }
        Ok(removed)
    }

    fn session_lifetime(&self) -> Duration {
        Duration::seconds(self.config.session_lifetime_secs as i64)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> StockwiseResult<User> {
        let email = normalize_email(email);
        let pepper = self.config.pepper.as_deref();

        let user = match self.user_repo.get_by_email(&email).await {
            Ok(u) => u,
            Err(StockwiseError::NotFound { .. }) => {
                password::verify_against_dummy(password, pepper);
                warn!("Login rejected: invalid credentials");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        if !password::verify_password(password, &user.password_hash, pepper)? {
            warn!(user_id = %user.id, "Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.may_log_in() {
            warn!(user_id = %user.id, status = ?user.status, "Login rejected by approval gate");
            return Err(match user.status {
                ApprovalStatus::Rejected => AuthError::AccountRejected,
                _ => AuthError::AccountPendingApproval,
            }
            .into());
        }

        Ok(user)
    }
}
