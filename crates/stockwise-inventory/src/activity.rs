//! Activity feed messages and dashboard aggregates.

use chrono::{DateTime, Local, NaiveTime, Utc};
use stockwise_core::error::StockwiseResult;
use stockwise_core::models::activity::ActivityRecord;
use stockwise_core::models::product::InventoryStats;
use stockwise_core::models::session::SessionContext;
use stockwise_core::repository::{ActivityRepository, ProductRepository};

use crate::service::InventoryService;

pub fn added_message(quantity: i64, name: &str) -> String {
    format!("Added {quantity} units of {name}")
}

pub fn removed_message(quantity: i64, name: &str) -> String {
    format!("Removed {quantity} units of {name}")
}

pub fn removed_all_message(name: &str) -> String {
    format!("Removed all units of {name} from inventory")
}

/// Midnight of `now`'s local calendar day, in UTC.
///
/// Falls back to UTC midnight on the rare days where local midnight
/// does not exist.
pub(crate) fn start_of_local_day(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|m| m.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

impl<P: ProductRepository, A: ActivityRepository> InventoryService<P, A> {
    /// Dashboard counters for the caller, recomputed on every call.
    pub async fn stats(&self, ctx: &SessionContext) -> StockwiseResult<InventoryStats> {
        let since = start_of_local_day(Local::now());
        self.products
            .stats(ctx.user_id, since, self.config.low_stock_threshold)
            .await
    }

    /// The caller's latest activity entries, newest first.
    ///
    /// `limit` defaults to the configured value and is clamped to
    /// `1..=max_recent_activity_limit`.
    pub async fn recent_activity(
        &self,
        ctx: &SessionContext,
        limit: Option<u64>,
    ) -> StockwiseResult<Vec<ActivityRecord>> {
        let limit = limit
            .unwrap_or(self.config.recent_activity_limit)
            .clamp(1, self.config.max_recent_activity_limit.max(1));
        self.activity.list_recent(ctx.user_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn messages() {
        assert_eq!(added_message(12, "Gauze"), "Added 12 units of Gauze");
        assert_eq!(removed_message(3, "Gauze"), "Removed 3 units of Gauze");
        assert_eq!(
            removed_all_message("Gauze"),
            "Removed all units of Gauze from inventory"
        );
    }

    #[test]
    fn local_day_starts_at_midnight() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();
        let start = start_of_local_day(now).with_timezone(&Local);
        assert_eq!(start.date_naive(), now.date_naive());
        assert_eq!(start.time(), NaiveTime::MIN);
        assert!(start <= now);
    }
}
