//! Stock-out transactions.

use stockwise_core::error::{StockwiseError, StockwiseResult};
use stockwise_core::models::product::{Product, StockOutCommit};
use stockwise_core::models::session::SessionContext;
use stockwise_core::repository::{ActivityRepository, ProductRepository};
use tracing::debug;
use uuid::Uuid;

use crate::activity;
use crate::service::{InventoryService, StockOutResult};

/// Reload-and-retry budget when another writer changes the quantity between
/// our read and our commit.
const MAX_COMMIT_ATTEMPTS: u32 = 5;

impl<P: ProductRepository, A: ActivityRepository> InventoryService<P, A> {
    /// Remove `amount` units from a product, deleting it when nothing is
    /// left. Fails with `insufficient stock` without touching anything
    /// when `amount` exceeds the quantity on hand.
    pub async fn stock_out(
        &self,
        ctx: &SessionContext,
        id: Uuid,
        amount: i64,
    ) -> StockwiseResult<StockOutResult> {
        if amount <= 0 {
            return Err(StockwiseError::validation("amount must be greater than 0"));
        }

        self.take_stock(ctx, id, Some(amount)).await
    }

    /// Remove every remaining unit of a product, which deletes it.
    pub async fn remove_all(&self, ctx: &SessionContext, id: Uuid) -> StockwiseResult<()> {
        self.take_stock(ctx, id, None).await?;
        Ok(())
    }

    /// `None` takes whatever quantity is on hand at commit time.
    ///
    /// The product lock only serializes callers sharing this service; a
    /// writer in another process shows up as a rejected commit, after which
    /// the product is reloaded and the stock check runs again.
    async fn take_stock(
        &self,
        ctx: &SessionContext,
        id: Uuid,
        amount: Option<i64>,
    ) -> StockwiseResult<StockOutResult> {
        let _guard = self.product_locks.acquire(id).await;

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let product = self.products.get_by_id(ctx.user_id, id).await?;
            let amount = amount.unwrap_or(product.quantity);
            if amount > product.quantity {
                return Err(StockwiseError::validation("insufficient stock"));
            }

            if let Some(outcome) = self.commit(ctx, &product, amount).await? {
                return Ok(outcome);
            }
            debug!(
                owner_id = %ctx.user_id,
                product_id = %id,
                attempt,
                "Stock level changed before commit, reloading"
            );
        }

        Err(StockwiseError::Database(format!(
            "stock level of product {id} kept changing after {MAX_COMMIT_ATTEMPTS} attempts"
        )))
    }

    /// `None` when the stored quantity no longer matches `product`.
    async fn commit(
        &self,
        ctx: &SessionContext,
        product: &Product,
        amount: i64,
    ) -> StockwiseResult<Option<StockOutResult>> {
        let remaining = product.quantity - amount;
        let message = if remaining == 0 {
            activity::removed_all_message(&product.name)
        } else {
            activity::removed_message(amount, &product.name)
        };

        let applied = self
            .products
            .commit_stock_out(StockOutCommit {
                owner_id: ctx.user_id,
                product_id: product.id,
                expected_quantity: product.quantity,
                remaining,
                activity: message,
            })
            .await?;
        if !applied {
            return Ok(None);
        }

        debug!(
            owner_id = %ctx.user_id,
            product_id = %product.id,
            amount,
            remaining,
            "Stock out committed"
        );

        Ok(Some(if remaining == 0 {
            StockOutResult::Deleted
        } else {
            StockOutResult::Remaining(remaining)
        }))
    }
}
