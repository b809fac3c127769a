//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Owner-scoped repositories take the
//! owning user's id on every call and must never return another owner's
//! records; a record owned by someone else is reported as not found.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StockwiseResult;
use crate::models::{
    activity::ActivityRecord,
    product::{CreateProduct, InventoryStats, Product, StockOutCommit},
    session::{CreateSession, Session},
    user::{ApprovalStatus, CreateUser, UpdateUser, User, UserRole},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Optional filters for user listings.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub status: Option<ApprovalStatus>,
}

// ---------------------------------------------------------------------------
// Accounts & sessions (global scope)
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Hashes `input.password` and stores the account.
    fn create(&self, input: CreateUser) -> impl Future<Output = StockwiseResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = StockwiseResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = StockwiseResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = StockwiseResult<User>> + Send;
    /// Newest first.
    fn list(
        &self,
        filter: UserFilter,
        pagination: Pagination,
    ) -> impl Future<Output = StockwiseResult<PaginatedResult<User>>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession)
    -> impl Future<Output = StockwiseResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = StockwiseResult<Session>> + Send;
    /// Slide the expiry window of a live session.
    fn touch(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = StockwiseResult<()>> + Send;
    /// Invalidate a single session. Succeeds if it is already gone.
    fn invalidate(&self, id: Uuid) -> impl Future<Output = StockwiseResult<()>> + Send;
    /// Invalidate all sessions for a user (e.g., on rejection).
    fn invalidate_user_sessions(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = StockwiseResult<()>> + Send;
    /// Remove all expired sessions.
    fn cleanup_expired(&self) -> impl Future<Output = StockwiseResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Inventory (owner-scoped)
// ---------------------------------------------------------------------------

pub trait ProductRepository: Send + Sync {
    /// Atomically advance the owner's item-code counter and return the new
    /// value. Values are never handed out twice, even after deletes.
    fn next_item_sequence(
        &self,
        owner_id: Uuid,
    ) -> impl Future<Output = StockwiseResult<u64>> + Send;
    /// Insert the product and append `input.activity` in one transaction.
    fn create(&self, input: CreateProduct)
    -> impl Future<Output = StockwiseResult<Product>> + Send;
    fn get_by_id(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = StockwiseResult<Product>> + Send;
    /// Newest first.
    fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> impl Future<Output = StockwiseResult<Vec<Product>>> + Send;
    fn set_quantity(
        &self,
        owner_id: Uuid,
        id: Uuid,
        quantity: i64,
    ) -> impl Future<Output = StockwiseResult<Product>> + Send;
    /// Apply a stock-out: update or delete the product and append the
    /// activity entry, all or nothing. Returns `false` without writing
    /// anything when the stored quantity no longer matches
    /// `input.expected_quantity`.
    fn commit_stock_out(
        &self,
        input: StockOutCommit,
    ) -> impl Future<Output = StockwiseResult<bool>> + Send;
    /// Remove the product if present. Removing a missing product is not an
    /// error.
    fn delete(&self, owner_id: Uuid, id: Uuid)
    -> impl Future<Output = StockwiseResult<()>> + Send;
    fn stats(
        &self,
        owner_id: Uuid,
        created_since: DateTime<Utc>,
        low_stock_threshold: i64,
    ) -> impl Future<Output = StockwiseResult<InventoryStats>> + Send;
}

// ---------------------------------------------------------------------------
// Activity (append-only, owner-scoped)
// ---------------------------------------------------------------------------

/// Entries are written only alongside product mutations (see
/// [`ProductRepository::create`] and [`ProductRepository::commit_stock_out`]);
/// no update or delete operations exist.
pub trait ActivityRepository: Send + Sync {
    /// Newest first.
    fn list_recent(
        &self,
        owner_id: Uuid,
        limit: u64,
    ) -> impl Future<Output = StockwiseResult<Vec<ActivityRecord>>> + Send;
}
