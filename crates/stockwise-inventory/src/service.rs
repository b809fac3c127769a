//! Inventory service: owner-scoped product store.
//!
//! Every operation takes the caller's [`SessionContext`] and only ever
//! sees products owned by `ctx.user_id`. Stock-out and the dashboard
//! aggregates live in sibling modules as further `impl` blocks.

use chrono::NaiveDate;
use serde::Deserialize;
use stockwise_core::error::{StockwiseError, StockwiseResult};
use stockwise_core::models::product::{CreateProduct, Product, format_item_code};
use stockwise_core::models::session::SessionContext;
use stockwise_core::repository::{ActivityRepository, ProductRepository};
use tracing::info;
use uuid::Uuid;

use crate::activity;
use crate::config::InventoryConfig;
use crate::locks::KeyedLocks;

/// Fields supplied when stocking in a new product.
///
/// Dates are `YYYY-MM-DD` strings. Missing fields deserialize to empty
/// values and are reported by [`InventoryService::create_product`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockInRequest {
    pub product_name: String,
    pub quantity: i64,
    pub brand: String,
    pub manufacturing_date: String,
    pub expiration_date: String,
    pub description: Option<String>,
}

/// Outcome of a stock-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOutResult {
    /// The last units left and the product was removed.
    Deleted,
    /// Units still on hand.
    Remaining(i64),
}

struct ValidStockIn {
    name: String,
    quantity: i64,
    brand: String,
    manufacturing_date: NaiveDate,
    expiration_date: NaiveDate,
    description: Option<String>,
}

fn required(value: &str, message: &str) -> StockwiseResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StockwiseError::validation(message));
    }
    Ok(value.to_string())
}

fn parse_date(value: &str, label: &str) -> StockwiseResult<NaiveDate> {
    let value = required(value, &format!("{label} is required"))?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
        StockwiseError::validation(format!("{label} must be a valid date (YYYY-MM-DD)"))
    })
}

impl StockInRequest {
    fn validate(self) -> StockwiseResult<ValidStockIn> {
        let name = required(&self.product_name, "product name is required")?;
        let brand = required(&self.brand, "brand is required")?;
        if self.quantity <= 0 {
            return Err(StockwiseError::validation("quantity must be greater than 0"));
        }
        let manufacturing_date = parse_date(&self.manufacturing_date, "manufacturing date")?;
        let expiration_date = parse_date(&self.expiration_date, "expiration date")?;
        if manufacturing_date >= expiration_date {
            return Err(StockwiseError::validation(
                "expiration date must be after manufacturing date",
            ));
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(ValidStockIn {
            name,
            quantity: self.quantity,
            brand,
            manufacturing_date,
            expiration_date,
            description,
        })
    }
}

/// Inventory service.
///
/// Generic over repository implementations so that the inventory layer
/// has no dependency on the database crate.
pub struct InventoryService<P: ProductRepository, A: ActivityRepository> {
    pub(crate) products: P,
    pub(crate) activity: A,
    pub(crate) config: InventoryConfig,
    /// Serializes mutations of one product.
    pub(crate) product_locks: KeyedLocks,
    /// Serializes item-code assignment per owner.
    owner_locks: KeyedLocks,
}

impl<P: ProductRepository, A: ActivityRepository> InventoryService<P, A> {
    pub fn new(products: P, activity: A, config: InventoryConfig) -> Self {
        Self {
            products,
            activity,
            config,
            product_locks: KeyedLocks::new(),
            owner_locks: KeyedLocks::new(),
        }
    }

    /// The caller's products, newest first.
    pub async fn list_products(&self, ctx: &SessionContext) -> StockwiseResult<Vec<Product>> {
        self.products.list_by_owner(ctx.user_id).await
    }

    /// A product owned by the caller. Missing and foreign products are
    /// both reported as not found.
    pub async fn get_product(&self, ctx: &SessionContext, id: Uuid) -> StockwiseResult<Product> {
        self.products.get_by_id(ctx.user_id, id).await
    }

    /// Validate and store a new product under the next item code,
    /// recording an "Added" activity entry with it.
    pub async fn create_product(
        &self,
        ctx: &SessionContext,
        request: StockInRequest,
    ) -> StockwiseResult<Product> {
        let valid = request.validate()?;

        let _guard = self.owner_locks.acquire(ctx.user_id).await;
        let sequence = self.products.next_item_sequence(ctx.user_id).await?;

        let product = self
            .products
            .create(CreateProduct {
                owner_id: ctx.user_id,
                item_code: format_item_code(sequence),
                activity: activity::added_message(valid.quantity, &valid.name),
                name: valid.name,
                quantity: valid.quantity,
                brand: valid.brand,
                manufacturing_date: valid.manufacturing_date,
                expiration_date: valid.expiration_date,
                description: valid.description,
            })
            .await?;

        info!(
            owner_id = %ctx.user_id,
            product_id = %product.id,
            item_code = %product.item_code,
            quantity = product.quantity,
            "Product stocked in"
        );
        Ok(product)
    }

    /// Stock-in always creates a new product record.
    pub async fn stock_in(
        &self,
        ctx: &SessionContext,
        request: StockInRequest,
    ) -> StockwiseResult<Product> {
        self.create_product(ctx, request).await
    }

    /// Overwrite the quantity of a product. Zero is allowed and keeps the
    /// product; only a stock-out deletes.
    pub async fn update_quantity(
        &self,
        ctx: &SessionContext,
        id: Uuid,
        quantity: i64,
    ) -> StockwiseResult<Product> {
        if quantity < 0 {
            return Err(StockwiseError::validation("quantity cannot be negative"));
        }

        let _guard = self.product_locks.acquire(id).await;
        let product = self.products.set_quantity(ctx.user_id, id, quantity).await?;

        info!(owner_id = %ctx.user_id, product_id = %id, quantity, "Product quantity updated");
        Ok(product)
    }

    /// Delete a product without recording activity.
    pub async fn delete_product(&self, ctx: &SessionContext, id: Uuid) -> StockwiseResult<()> {
        let _guard = self.product_locks.acquire(id).await;
        self.products.get_by_id(ctx.user_id, id).await?;
        self.products.delete(ctx.user_id, id).await?;

        info!(owner_id = %ctx.user_id, product_id = %id, "Product deleted");
        Ok(())
    }
}
