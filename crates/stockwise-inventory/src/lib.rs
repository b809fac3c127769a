//! Stockwise Inventory: owner-scoped product records, stock-in and
//! stock-out transactions, and the dashboard aggregates derived from them.

pub mod activity;
pub mod config;
pub mod locks;
pub mod service;
mod stock;

pub use config::InventoryConfig;
pub use service::{InventoryService, StockInRequest, StockOutResult};
