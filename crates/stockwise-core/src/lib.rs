//! Stockwise Core: domain models, the shared error taxonomy and the
//! repository traits every storage backend implements.

pub mod error;
pub mod models;
pub mod repository;
