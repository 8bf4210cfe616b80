use std::sync::RwLock;

use stockline_core::{ProductId, StoreId};
use stockline_inventory::{Product, SaleEvent, StockRecord};

use super::r#trait::{InventoryStore, StoreError};

/// In-memory inventory store.
///
/// Rows live in plain vectors so insertion order falls out for free; an
/// upsert that replaces an existing row keeps its original position.
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    products: RwLock<Vec<Product>>,
    records: RwLock<Vec<StockRecord>>,
    sales: RwLock<Vec<SaleEvent>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(what: &str) -> StoreError {
    StoreError::unavailable(format!("{what} lock poisoned"))
}

impl InventoryStore for InMemoryInventoryStore {
    fn get(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<Option<StockRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned("records"))?;
        Ok(records
            .iter()
            .find(|r| r.store_id() == store_id && r.product_id() == product_id)
            .cloned())
    }

    fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned("products"))?;
        Ok(products.iter().find(|p| p.id() == product_id).cloned())
    }

    fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<(Product, StockRecord)>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned("records"))?;
        let products = self.products.read().map_err(|_| poisoned("products"))?;

        let mut rows = Vec::new();
        for record in records.iter().filter(|r| r.store_id() == store_id) {
            let product = products
                .iter()
                .find(|p| p.id() == record.product_id())
                .ok_or_else(|| {
                    StoreError::inconsistent(format!(
                        "stock record {} references missing product",
                        record.key()
                    ))
                })?;
            rows.push((product.clone(), record.clone()));
        }
        Ok(rows)
    }

    fn list_below_threshold(
        &self,
        store_id: &StoreId,
    ) -> Result<Vec<(Product, StockRecord)>, StoreError> {
        let mut rows = self.list_by_store(store_id)?;
        rows.retain(|(_, record)| record.is_below_threshold());
        Ok(rows)
    }

    fn upsert(&self, record: StockRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned("records"))?;
        match records.iter_mut().find(|r| r.key() == record.key()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    fn upsert_product(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| poisoned("products"))?;
        match products.iter_mut().find(|p| p.id() == product.id()) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
        Ok(())
    }

    fn append_sale(&self, sale: SaleEvent) -> Result<(), StoreError> {
        let mut sales = self.sales.write().map_err(|_| poisoned("sales"))?;
        sales.push(sale);
        Ok(())
    }

    fn list_sales(&self, store_id: &StoreId) -> Result<Vec<SaleEvent>, StoreError> {
        let sales = self.sales.read().map_err(|_| poisoned("sales"))?;
        Ok(sales
            .iter()
            .filter(|s| s.store_id() == store_id)
            .cloned()
            .collect())
    }
}
