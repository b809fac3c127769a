//! SurrealDB repository implementations.

mod activity;
mod product;
mod session;
mod user;

use surrealdb_types::SurrealValue;

pub use activity::SurrealActivityRepository;
pub use product::SurrealProductRepository;
pub use session::SurrealSessionRepository;
pub use user::SurrealUserRepository;

/// Row struct for `count() ... GROUP ALL` queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}
