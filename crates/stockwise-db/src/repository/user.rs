//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use stockwise_core::error::StockwiseResult;
use stockwise_core::models::user::{ApprovalStatus, CreateUser, UpdateUser, User, UserRole};
use stockwise_core::repository::{PaginatedResult, Pagination, UserFilter, UserRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    full_name: String,
    email: String,
    company: String,
    password_hash: String,
    role: String,
    status: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    full_name: String,
    email: String,
    company: String,
    password_hash: String,
    role: String,
    status: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(crate) fn parse_role(s: &str) -> Result<UserRole, DbError> {
    match s {
        "user" => Ok(UserRole::User),
        "admin" => Ok(UserRole::Admin),
        other => Err(DbError::Decode(format!("unknown user role: {other}"))),
    }
}

pub(crate) fn role_to_str(role: UserRole) -> &'static str {
    match role {
        UserRole::User => "user",
        UserRole::Admin => "admin",
    }
}

fn parse_status(s: &str) -> Result<ApprovalStatus, DbError> {
    match s {
        "pending" => Ok(ApprovalStatus::Pending),
        "approved" => Ok(ApprovalStatus::Approved),
        "rejected" => Ok(ApprovalStatus::Rejected),
        other => Err(DbError::Decode(format!("unknown approval status: {other}"))),
    }
}

fn status_to_str(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Pending => "pending",
        ApprovalStatus::Approved => "approved",
        ApprovalStatus::Rejected => "rejected",
    }
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let reviewed_by = self
            .reviewed_by
            .as_deref()
            .map(|id| parse_uuid("reviewer", id))
            .transpose()?;
        Ok(User {
            id,
            full_name: self.full_name,
            email: self.email,
            company: self.company,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            status: parse_status(&self.status)?,
            reviewed_by,
            reviewed_at: self.reviewed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = parse_uuid("user", &self.record_id)?;
        UserRow {
            full_name: self.full_name,
            email: self.email,
            company: self.company,
            password_hash: self.password_hash,
            role: self.role,
            status: self.status,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_user(id)
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hash(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hash(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> StockwiseResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 full_name = $full_name, \
                 email = $email, \
                 company = $company, \
                 password_hash = $password_hash, \
                 role = $role, \
                 status = $status, \
                 reviewed_by = NONE, \
                 reviewed_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("full_name", input.full_name))
            .bind(("email", input.email))
            .bind(("company", input.company))
            .bind(("password_hash", password_hash))
            .bind(("role", role_to_str(input.role).to_string()))
            .bind(("status", status_to_str(input.status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> StockwiseResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> StockwiseResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> StockwiseResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.reviewed_by.is_some() {
            sets.push("reviewed_by = $reviewed_by");
        }
        if input.reviewed_at.is_some() {
            sets.push("reviewed_at = $reviewed_at");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(role) = input.role {
            builder = builder.bind(("role", role_to_str(role).to_string()));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status_to_str(status).to_string()));
        }
        if let Some(reviewed_by) = input.reviewed_by {
            builder = builder.bind(("reviewed_by", reviewed_by.to_string()));
        }
        if let Some(reviewed_at) = input.reviewed_at {
            builder = builder.bind(("reviewed_at", reviewed_at));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn list(
        &self,
        filter: UserFilter,
        pagination: Pagination,
    ) -> StockwiseResult<PaginatedResult<User>> {
        let mut conditions = Vec::new();
        if filter.role.is_some() {
            conditions.push("role = $role");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT count() AS total FROM user {where_clause} GROUP ALL");
        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM user {where_clause} \
             ORDER BY created_at DESC \
             LIMIT $limit START $offset"
        );

        let role = filter.role.map(|r| role_to_str(r).to_string());
        let status = filter.status.map(|s| status_to_str(s).to_string());

        let mut count_builder = self.db.query(&count_query);
        let mut list_builder = self
            .db
            .query(&list_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(role) = role {
            count_builder = count_builder.bind(("role", role.clone()));
            list_builder = list_builder.bind(("role", role));
        }
        if let Some(status) = status {
            count_builder = count_builder.bind(("status", status.clone()));
            list_builder = list_builder.bind(("status", status));
        }

        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = list_builder.await.map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(UserRowWithId::try_into_user)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
