//! Inventory configuration.

/// Configuration for the inventory service.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Products with a quantity strictly below this count as low stock.
    pub low_stock_threshold: i64,
    /// Number of activity entries returned when the caller gives no limit.
    pub recent_activity_limit: u64,
    /// Upper bound on any requested activity limit.
    pub max_recent_activity_limit: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
            recent_activity_limit: 10,
            max_recent_activity_limit: 100,
        }
    }
}
