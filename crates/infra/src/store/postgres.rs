//! Postgres-backed inventory store.
//!
//! Maps the trait onto three relational tables mirroring the entity model:
//! `products`, `store_inventory` (unique on (store_id, product_id)), and the
//! append-only `sales_history`. Insertion order for listings comes from the
//! serial row id of `store_inventory`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;

use stockline_core::{ActorId, ProductId, SaleId, StoreId, SupplierId};
use stockline_inventory::{Product, SaleEvent, StockRecord};

use super::r#trait::{InventoryStore, StoreError};

pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    fn runtime() -> Result<tokio::runtime::Handle, StoreError> {
        tokio::runtime::Handle::try_current()
            .map_err(|_| StoreError::unavailable("no tokio runtime available"))
    }
}

fn query_failed(err: sqlx::Error) -> StoreError {
    StoreError::unavailable(err.to_string())
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let id: String = row.try_get("id").map_err(query_failed)?;
    let name: String = row.try_get("name").map_err(query_failed)?;
    let category: String = row.try_get("category").map_err(query_failed)?;
    let price: Decimal = row.try_get("price").map_err(query_failed)?;
    let supplier_id: String = row.try_get("supplier_id").map_err(query_failed)?;
    let created_by: String = row.try_get("created_by").map_err(query_failed)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(query_failed)?;
    let last_updated_by: String = row.try_get("last_updated_by").map_err(query_failed)?;
    let last_updated_at: DateTime<Utc> = row.try_get("last_updated_at").map_err(query_failed)?;

    Ok(Product::from_parts(
        ProductId::new(id).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        name,
        category,
        price,
        SupplierId::new(supplier_id).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        ActorId::new(created_by).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        created_at,
        ActorId::new(last_updated_by).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        last_updated_at,
    ))
}

fn record_from_row(row: &PgRow) -> Result<StockRecord, StoreError> {
    let store_id: String = row.try_get("store_id").map_err(query_failed)?;
    let product_id: String = row.try_get("product_id").map_err(query_failed)?;
    let stock_level: i64 = row.try_get("stock_level").map_err(query_failed)?;
    let min_threshold: i64 = row.try_get("min_threshold").map_err(query_failed)?;
    let last_updated_by: String = row.try_get("last_updated_by").map_err(query_failed)?;
    let last_updated_at: DateTime<Utc> = row.try_get("last_updated_at").map_err(query_failed)?;

    Ok(StockRecord::from_parts(
        StoreId::new(store_id).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        ProductId::new(product_id).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        stock_level,
        min_threshold,
        ActorId::new(last_updated_by).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        last_updated_at,
    ))
}

fn sale_from_row(row: &PgRow) -> Result<SaleEvent, StoreError> {
    let id: uuid::Uuid = row.try_get("id").map_err(query_failed)?;
    let store_id: String = row.try_get("store_id").map_err(query_failed)?;
    let product_id: String = row.try_get("product_id").map_err(query_failed)?;
    let quantity: i64 = row.try_get("quantity").map_err(query_failed)?;
    let sold_at: DateTime<Utc> = row.try_get("sale_date").map_err(query_failed)?;
    let recorded_by: String = row.try_get("recorded_by").map_err(query_failed)?;

    Ok(SaleEvent::from_parts(
        SaleId::from_uuid(id),
        StoreId::new(store_id).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        ProductId::new(product_id).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        quantity,
        sold_at,
        ActorId::new(recorded_by).map_err(|e| StoreError::inconsistent(e.to_string()))?,
    ))
}

const JOINED_COLUMNS: &str = r#"
    p.id, p.name, p.category, p.price, p.supplier_id,
    p.created_by, p.created_at, p.last_updated_by AS p_last_updated_by,
    p.last_updated_at AS p_last_updated_at,
    si.store_id, si.product_id, si.stock_level, si.min_threshold,
    si.last_updated_by, si.last_updated_at
"#;

fn pair_from_row(row: &PgRow) -> Result<(Product, StockRecord), StoreError> {
    // Joined rows alias the product's audit columns to avoid the collision
    // with the stock record's.
    let id: String = row.try_get("id").map_err(query_failed)?;
    let name: String = row.try_get("name").map_err(query_failed)?;
    let category: String = row.try_get("category").map_err(query_failed)?;
    let price: Decimal = row.try_get("price").map_err(query_failed)?;
    let supplier_id: String = row.try_get("supplier_id").map_err(query_failed)?;
    let created_by: String = row.try_get("created_by").map_err(query_failed)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(query_failed)?;
    let p_last_updated_by: String = row.try_get("p_last_updated_by").map_err(query_failed)?;
    let p_last_updated_at: DateTime<Utc> = row.try_get("p_last_updated_at").map_err(query_failed)?;

    let product = Product::from_parts(
        ProductId::new(id).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        name,
        category,
        price,
        SupplierId::new(supplier_id).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        ActorId::new(created_by).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        created_at,
        ActorId::new(p_last_updated_by).map_err(|e| StoreError::inconsistent(e.to_string()))?,
        p_last_updated_at,
    );

    let record = record_from_row(row)?;
    Ok((product, record))
}

impl InventoryStore for PostgresInventoryStore {
    fn get(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<Option<StockRecord>, StoreError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();
        let store_id = store_id.as_str().to_string();
        let product_id = product_id.as_str().to_string();

        handle.block_on(async move {
            let row = sqlx::query(
                r#"
                SELECT store_id, product_id, stock_level, min_threshold,
                       last_updated_by, last_updated_at
                FROM store_inventory
                WHERE store_id = $1 AND product_id = $2
                "#,
            )
            .bind(&store_id)
            .bind(&product_id)
            .fetch_optional(&*pool)
            .await
            .map_err(query_failed)?;

            row.as_ref().map(record_from_row).transpose()
        })
    }

    fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();
        let product_id = product_id.as_str().to_string();

        handle.block_on(async move {
            let row = sqlx::query(
                r#"
                SELECT id, name, category, price, supplier_id,
                       created_by, created_at, last_updated_by, last_updated_at
                FROM products
                WHERE id = $1
                "#,
            )
            .bind(&product_id)
            .fetch_optional(&*pool)
            .await
            .map_err(query_failed)?;

            row.as_ref().map(product_from_row).transpose()
        })
    }

    fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<(Product, StockRecord)>, StoreError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();
        let store_id = store_id.as_str().to_string();
        let sql = format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM store_inventory si
            JOIN products p ON p.id = si.product_id
            WHERE si.store_id = $1
            ORDER BY si.id
            "#
        );

        handle.block_on(async move {
            let rows = sqlx::query(&sql)
                .bind(&store_id)
                .fetch_all(&*pool)
                .await
                .map_err(query_failed)?;

            rows.iter().map(pair_from_row).collect()
        })
    }

    fn list_below_threshold(
        &self,
        store_id: &StoreId,
    ) -> Result<Vec<(Product, StockRecord)>, StoreError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();
        let store_id = store_id.as_str().to_string();
        let sql = format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM store_inventory si
            JOIN products p ON p.id = si.product_id
            WHERE si.store_id = $1 AND si.stock_level < si.min_threshold
            ORDER BY si.id
            "#
        );

        handle.block_on(async move {
            let rows = sqlx::query(&sql)
                .bind(&store_id)
                .fetch_all(&*pool)
                .await
                .map_err(query_failed)?;

            rows.iter().map(pair_from_row).collect()
        })
    }

    fn upsert(&self, record: StockRecord) -> Result<(), StoreError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();

        handle.block_on(async move {
            sqlx::query(
                r#"
                INSERT INTO store_inventory (
                    store_id, product_id, stock_level, min_threshold,
                    last_updated_by, last_updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (store_id, product_id)
                DO UPDATE SET
                    stock_level = EXCLUDED.stock_level,
                    min_threshold = EXCLUDED.min_threshold,
                    last_updated_by = EXCLUDED.last_updated_by,
                    last_updated_at = EXCLUDED.last_updated_at
                "#,
            )
            .bind(record.store_id().as_str())
            .bind(record.product_id().as_str())
            .bind(record.stock_level())
            .bind(record.min_threshold())
            .bind(record.last_updated_by().as_str())
            .bind(record.last_updated_at())
            .execute(&*pool)
            .await
            .map_err(query_failed)?;

            Ok(())
        })
    }

    fn upsert_product(&self, product: Product) -> Result<(), StoreError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();

        handle.block_on(async move {
            sqlx::query(
                r#"
                INSERT INTO products (
                    id, name, category, price, supplier_id,
                    created_by, created_at, last_updated_by, last_updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (id)
                DO UPDATE SET
                    name = EXCLUDED.name,
                    category = EXCLUDED.category,
                    price = EXCLUDED.price,
                    supplier_id = EXCLUDED.supplier_id,
                    last_updated_by = EXCLUDED.last_updated_by,
                    last_updated_at = EXCLUDED.last_updated_at
                "#,
            )
            .bind(product.id().as_str())
            .bind(product.name())
            .bind(product.category())
            .bind(product.unit_price())
            .bind(product.supplier_id().as_str())
            .bind(product.created_by().as_str())
            .bind(product.created_at())
            .bind(product.last_updated_by().as_str())
            .bind(product.last_updated_at())
            .execute(&*pool)
            .await
            .map_err(query_failed)?;

            Ok(())
        })
    }

    fn append_sale(&self, sale: SaleEvent) -> Result<(), StoreError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();

        handle.block_on(async move {
            sqlx::query(
                r#"
                INSERT INTO sales_history (
                    id, store_id, product_id, quantity, sale_date, recorded_by
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(sale.id().as_uuid())
            .bind(sale.store_id().as_str())
            .bind(sale.product_id().as_str())
            .bind(sale.quantity())
            .bind(sale.sold_at())
            .bind(sale.recorded_by().as_str())
            .execute(&*pool)
            .await
            .map_err(query_failed)?;

            Ok(())
        })
    }

    fn list_sales(&self, store_id: &StoreId) -> Result<Vec<SaleEvent>, StoreError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();
        let store_id = store_id.as_str().to_string();

        handle.block_on(async move {
            let rows = sqlx::query(
                r#"
                SELECT id, store_id, product_id, quantity, sale_date, recorded_by
                FROM sales_history
                WHERE store_id = $1
                ORDER BY sale_date, id
                "#,
            )
            .bind(&store_id)
            .fetch_all(&*pool)
            .await
            .map_err(query_failed)?;

            rows.iter().map(sale_from_row).collect()
        })
    }
}
