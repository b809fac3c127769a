//! SurrealDB implementation of [`ProductRepository`].
//!
//! Every query filters on `owner_id`, so a product id belonging to another
//! owner behaves exactly like a missing one. Mutations that also write to
//! the activity feed run inside a single `BEGIN/COMMIT` block.

use chrono::{DateTime, NaiveDate, Utc};
use stockwise_core::error::StockwiseResult;
use stockwise_core::models::product::{CreateProduct, InventoryStats, Product, StockOutCommit};
use stockwise_core::repository::ProductRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use super::user::parse_uuid;
use crate::error::{DbError, STALE_STOCK_LEVEL};

#[derive(Debug, SurrealValue)]
struct ProductRow {
    owner_id: String,
    item_code: String,
    name: String,
    quantity: i64,
    brand: String,
    manufacturing_date: String,
    expiration_date: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ProductRowWithId {
    record_id: String,
    owner_id: String,
    item_code: String,
    name: String,
    quantity: i64,
    brand: String,
    manufacturing_date: String,
    expiration_date: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CounterRow {
    last: u64,
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DbError> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| DbError::Decode(format!("invalid {field}: {e}")))
}

impl ProductRow {
    fn into_product(self, id: Uuid) -> Result<Product, DbError> {
        Ok(Product {
            id,
            owner_id: parse_uuid("owner", &self.owner_id)?,
            item_code: self.item_code,
            name: self.name,
            quantity: self.quantity,
            brand: self.brand,
            manufacturing_date: parse_date("manufacturing_date", &self.manufacturing_date)?,
            expiration_date: parse_date("expiration_date", &self.expiration_date)?,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

impl ProductRowWithId {
    fn try_into_product(self) -> Result<Product, DbError> {
        let id = parse_uuid("product", &self.record_id)?;
        ProductRow {
            owner_id: self.owner_id,
            item_code: self.item_code,
            name: self.name,
            quantity: self.quantity,
            brand: self.brand,
            manufacturing_date: self.manufacturing_date,
            expiration_date: self.expiration_date,
            description: self.description,
            created_at: self.created_at,
        }
        .into_product(id)
    }
}

/// SurrealDB implementation of the Product repository.
#[derive(Clone)]
pub struct SurrealProductRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProductRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProductRepository for SurrealProductRepository<C> {
    async fn next_item_sequence(&self, owner_id: Uuid) -> StockwiseResult<u64> {
        let owner_str = owner_id.to_string();

        let result = self
            .db
            .query(
                "UPSERT type::record('item_counter', $owner_id) \
                 SET last = (last ?? 0) + 1 \
                 RETURN AFTER",
            )
            .bind(("owner_id", owner_str.clone()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("item_counter", e))?;

        let rows: Vec<CounterRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "item_counter".into(),
            id: owner_str,
        })?;

        Ok(row.last)
    }

    async fn create(&self, input: CreateProduct) -> StockwiseResult<Product> {
        let id = Uuid::new_v4();

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('product', $id) SET \
                 owner_id = $owner_id, \
                 item_code = $item_code, \
                 name = $name, \
                 quantity = $quantity, \
                 brand = $brand, \
                 manufacturing_date = $manufacturing_date, \
                 expiration_date = $expiration_date, \
                 description = $description; \
                 CREATE type::record('activity', $activity_id) SET \
                 owner_id = $owner_id, \
                 message = $activity; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("item_code", input.item_code))
            .bind(("name", input.name))
            .bind(("quantity", input.quantity))
            .bind(("brand", input.brand))
            .bind(("manufacturing_date", input.manufacturing_date.to_string()))
            .bind(("expiration_date", input.expiration_date.to_string()))
            .bind(("description", input.description))
            .bind(("activity_id", Uuid::new_v4().to_string()))
            .bind(("activity", input.activity))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_check("product", e))?;

        self.get_by_id(input.owner_id, id).await
    }

    async fn get_by_id(&self, owner_id: Uuid, id: Uuid) -> StockwiseResult<Product> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('product', $id) \
                 WHERE owner_id = $owner_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", owner_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: id_str,
        })?;

        Ok(row.into_product(id)?)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> StockwiseResult<Vec<Product>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM product \
                 WHERE owner_id = $owner_id \
                 ORDER BY created_at DESC, item_code DESC",
            )
            .bind(("owner_id", owner_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;

        let products = rows
            .into_iter()
            .map(ProductRowWithId::try_into_product)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(products)
    }

    async fn set_quantity(
        &self,
        owner_id: Uuid,
        id: Uuid,
        quantity: i64,
    ) -> StockwiseResult<Product> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('product', $id) SET quantity = $quantity \
                 WHERE owner_id = $owner_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", owner_id.to_string()))
            .bind(("quantity", quantity))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("product", e))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: id_str,
        })?;

        Ok(row.into_product(id)?)
    }

    async fn commit_stock_out(&self, input: StockOutCommit) -> StockwiseResult<bool> {
        // The quantity guard turns a concurrent writer into a failed
        // transaction instead of a lost update.
        let mutation = if input.remaining == 0 {
            "LET $changed = (DELETE type::record('product', $id) \
             WHERE owner_id = $owner_id AND quantity = $expected \
             RETURN BEFORE);"
        } else {
            "LET $changed = (UPDATE type::record('product', $id) \
             SET quantity = $remaining \
             WHERE owner_id = $owner_id AND quantity = $expected);"
        };

        let query = format!(
            "BEGIN TRANSACTION; \
             {mutation} \
             IF array::len($changed) == 0 {{ THROW '{STALE_STOCK_LEVEL}'; }}; \
             CREATE type::record('activity', $activity_id) SET \
             owner_id = $owner_id, \
             message = $activity; \
             COMMIT TRANSACTION;"
        );

        let response = self
            .db
            .query(&query)
            .bind(("id", input.product_id.to_string()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("expected", input.expected_quantity))
            .bind(("remaining", input.remaining))
            .bind(("activity_id", Uuid::new_v4().to_string()))
            .bind(("activity", input.activity))
            .await;

        let mut response = match response {
            Ok(response) => response,
            Err(e) if DbError::is_write_conflict(&e) => return Ok(false),
            Err(e) => return Err(DbError::from(e).into()),
        };

        // A failed transaction marks every statement as not executed; the
        // cause sits on the row of the statement that threw or on COMMIT.
        let errors = response.take_errors();
        if errors.values().any(DbError::is_write_conflict) {
            return Ok(false);
        }
        let mut errors: Vec<_> = errors.into_iter().collect();
        errors.sort_by_key(|(index, _)| *index);
        let cause = errors
            .iter()
            .position(|(_, e)| !e.to_string().contains("not executed"))
            .unwrap_or(0);
        match errors.into_iter().nth(cause) {
            Some((_, e)) => Err(DbError::from_check("product", e).into()),
            None => Ok(true),
        }
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> StockwiseResult<()> {
        self.db
            .query(
                "DELETE type::record('product', $id) \
                 WHERE owner_id = $owner_id",
            )
            .bind(("id", id.to_string()))
            .bind(("owner_id", owner_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_check("product", e))?;

        Ok(())
    }

    async fn stats(
        &self,
        owner_id: Uuid,
        created_since: DateTime<Utc>,
        low_stock_threshold: i64,
    ) -> StockwiseResult<InventoryStats> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM product \
                 WHERE owner_id = $owner_id GROUP ALL; \
                 SELECT count() AS total FROM product \
                 WHERE owner_id = $owner_id AND created_at >= $since GROUP ALL; \
                 SELECT count() AS total FROM product \
                 WHERE owner_id = $owner_id AND quantity < $threshold GROUP ALL;",
            )
            .bind(("owner_id", owner_id.to_string()))
            .bind(("since", created_since))
            .bind(("threshold", low_stock_threshold))
            .await
            .map_err(DbError::from)?;

        let mut counts = [0u64; 3];
        for (index, slot) in counts.iter_mut().enumerate() {
            let rows: Vec<CountRow> = result.take(index).map_err(DbError::from)?;
            *slot = rows.first().map(|r| r.total).unwrap_or(0);
        }

        Ok(InventoryStats {
            total_items: counts[0],
            stock_in_today: counts[1],
            low_stock_items: counts[2],
        })
    }
}
