//! Domain models for Stockwise.
//!
//! These are the core types shared across all crates.

pub mod activity;
pub mod product;
pub mod session;
pub mod user;
