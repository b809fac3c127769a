//! Account store service: registration, admin approval and admin
//! provisioning.

use chrono::Utc;
use stockwise_core::error::{StockwiseError, StockwiseResult};
use stockwise_core::models::session::SessionContext;
use stockwise_core::models::user::{ApprovalStatus, CreateUser, UpdateUser, User, UserRole};
use stockwise_core::repository::{
    PaginatedResult, Pagination, SessionRepository, UserFilter, UserRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;

/// Input for self-service registration.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub company: Option<String>,
}

/// Bootstrap admin credentials, usually read from configuration.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub company: String,
}

/// Emails are compared and stored trimmed and lower-cased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken() -> StockwiseError {
    StockwiseError::AlreadyExists {
        entity: "email".into(),
    }
}

pub struct AccountService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> AccountService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Create a pending `user`-role account.
    pub async fn register(&self, input: RegisterInput) -> StockwiseResult<User> {
        let full_name = input.full_name.trim().to_string();
        let email = normalize_email(&input.email);
        if full_name.is_empty() || email.is_empty() || input.password.trim().is_empty() {
            return Err(StockwiseError::validation(
                "all required fields must be filled",
            ));
        }
        self.check_password_policy(&input.password)?;
        self.ensure_email_free(&email).await?;

        let user = self
            .user_repo
            .create(CreateUser {
                full_name,
                email,
                company: input.company.map(|c| c.trim().to_string()).unwrap_or_default(),
                password: input.password,
                role: UserRole::User,
                status: ApprovalStatus::Pending,
            })
            .await
            .map_err(|e| match e {
                StockwiseError::AlreadyExists { .. } => email_taken(),
                other => other,
            })?;

        info!(user_id = %user.id, "User registered, awaiting approval");
        Ok(user)
    }

    /// Approve or reject an account on behalf of the admin in `ctx`.
    ///
    /// Rejecting an account also ends all of its sessions.
    pub async fn set_approval_status(
        &self,
        ctx: &SessionContext,
        user_id: Uuid,
        status: ApprovalStatus,
    ) -> StockwiseResult<User> {
        ctx.require_admin()?;
        if status == ApprovalStatus::Pending {
            return Err(StockwiseError::validation(
                "status must be approved or rejected",
            ));
        }

        // Surface a missing account as NotFound before writing.
        self.user_repo.get_by_id(user_id).await?;

        let user = self
            .user_repo
            .update(
                user_id,
                UpdateUser {
                    status: Some(status),
                    reviewed_by: Some(ctx.user_id),
                    reviewed_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;

        if status == ApprovalStatus::Rejected {
            self.session_repo.invalidate_user_sessions(user_id).await?;
        }

        info!(
            user_id = %user.id,
            reviewed_by = %ctx.user_id,
            status = ?status,
            "Account review recorded"
        );
        Ok(user)
    }

    /// `user`-role accounts awaiting review, newest first.
    pub async fn list_pending_users(
        &self,
        ctx: &SessionContext,
        pagination: Pagination,
    ) -> StockwiseResult<PaginatedResult<User>> {
        ctx.require_admin()?;
        self.user_repo
            .list(
                UserFilter {
                    role: Some(UserRole::User),
                    status: Some(ApprovalStatus::Pending),
                },
                pagination,
            )
            .await
    }

    /// All `user`-role accounts regardless of status, newest first.
    pub async fn list_users(
        &self,
        ctx: &SessionContext,
        pagination: Pagination,
    ) -> StockwiseResult<PaginatedResult<User>> {
        ctx.require_admin()?;
        self.user_repo
            .list(
                UserFilter {
                    role: Some(UserRole::User),
                    status: None,
                },
                pagination,
            )
            .await
    }

    /// Ensure an approved admin exists for `seed.email`.
    ///
    /// Safe to run on every start: an existing account with that email
    /// is promoted and approved, its password left as is.
    pub async fn provision_admin(&self, seed: AdminSeed) -> StockwiseResult<User> {
        let email = normalize_email(&seed.email);
        if email.is_empty() || seed.password.is_empty() {
            return Err(StockwiseError::validation(
                "admin email and password must be set",
            ));
        }

        match self.user_repo.get_by_email(&email).await {
            Ok(existing) => {
                if existing.role == UserRole::Admin && existing.status == ApprovalStatus::Approved
                {
                    info!(user_id = %existing.id, "Admin account already provisioned");
                    return Ok(existing);
                }
                let user = self
                    .user_repo
                    .update(
                        existing.id,
                        UpdateUser {
                            role: Some(UserRole::Admin),
                            status: Some(ApprovalStatus::Approved),
                            ..Default::default()
                        },
                    )
                    .await?;
                // Drop sessions that still carry the old role.
                self.session_repo.invalidate_user_sessions(user.id).await?;
                info!(user_id = %user.id, "Existing account promoted to admin");
                Ok(user)
            }
            Err(StockwiseError::NotFound { .. }) => {
                self.check_password_policy(&seed.password)?;
                let user = self
                    .user_repo
                    .create(CreateUser {
                        full_name: seed.full_name.trim().to_string(),
                        email,
                        company: seed.company.trim().to_string(),
                        password: seed.password,
                        role: UserRole::Admin,
                        status: ApprovalStatus::Approved,
                    })
                    .await?;
                info!(user_id = %user.id, "Admin account provisioned");
                Ok(user)
            }
            Err(e) => Err(e),
        }
    }

    fn check_password_policy(&self, password: &str) -> StockwiseResult<()> {
        let min = self.config.min_password_length;
        if password.chars().count() < min {
            return Err(StockwiseError::validation(format!(
                "password must be at least {min} characters"
            )));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> StockwiseResult<()> {
        match self.user_repo.get_by_email(email).await {
            Ok(_) => Err(email_taken()),
            Err(StockwiseError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
