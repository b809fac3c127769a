//! Product (inventory line) domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of every human-readable item code.
pub const ITEM_CODE_PREFIX: &str = "ITEM-";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Sequential code unique within `owner_id`, assigned once at creation.
    pub item_code: String,
    #[serde(rename = "productName")]
    pub name: String,
    pub quantity: i64,
    pub brand: String,
    pub manufacturing_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Repository input for a new, already validated product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub owner_id: Uuid,
    pub item_code: String,
    pub name: String,
    pub quantity: i64,
    pub brand: String,
    pub manufacturing_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub description: Option<String>,
    /// Activity message appended in the same transaction as the insert.
    pub activity: String,
}

/// A checked stock-out ready to be committed.
///
/// `expected_quantity` is the quantity the caller observed; the commit is
/// rejected if the stored quantity no longer matches it. A `remaining` of
/// zero removes the product.
#[derive(Debug, Clone)]
pub struct StockOutCommit {
    pub owner_id: Uuid,
    pub product_id: Uuid,
    pub expected_quantity: i64,
    pub remaining: i64,
    pub activity: String,
}

/// Dashboard counters for one owner.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: u64,
    pub stock_in_today: u64,
    pub low_stock_items: u64,
}

/// Render a per-owner sequence number as an item code (`ITEM-00042`).
pub fn format_item_code(sequence: u64) -> String {
    format!("{ITEM_CODE_PREFIX}{sequence:05}")
}
