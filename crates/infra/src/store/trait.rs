use thiserror::Error;

use stockline_core::{LedgerError, ProductId, StoreId};
use stockline_inventory::{Product, SaleEvent, StockRecord};

/// Storage-layer failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transient backend failure (connection, timeout, poisoned lock).
    /// Retriable by the caller; never surfaced as a hang.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend handed back rows that violate referential assumptions
    /// (e.g. a stock record whose product row is gone).
    #[error("storage inconsistent: {0}")]
    Inconsistent(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => LedgerError::StorageUnavailable(msg),
            StoreError::Inconsistent(msg) => {
                LedgerError::StorageUnavailable(format!("inconsistent: {msg}"))
            }
        }
    }
}

/// Durable keyed storage for Product and StockRecord rows and the append-only
/// sales history.
///
/// Individual operations are atomic per key: a concurrent reader never sees a
/// half-written row. Serializing a read-check-write sequence across calls is
/// the ledger service's job, not the store's.
pub trait InventoryStore: Send + Sync + 'static {
    /// Fetch the stock record for a (store, product) pair.
    fn get(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<Option<StockRecord>, StoreError>;

    /// Fetch a product row.
    fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// All (product, stock) pairs for a store, in insertion order. An empty
    /// result is valid and distinct from "unknown store" — the service layer
    /// decides whether empty means not-found.
    fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<(Product, StockRecord)>, StoreError>;

    /// The subset of [`InventoryStore::list_by_store`] where
    /// `stock_level < min_threshold`, insertion order preserved.
    fn list_below_threshold(
        &self,
        store_id: &StoreId,
    ) -> Result<Vec<(Product, StockRecord)>, StoreError>;

    /// Replace-or-insert a stock record, atomic with respect to concurrent
    /// upserts on the same key. At most one record per (store, product) pair.
    fn upsert(&self, record: StockRecord) -> Result<(), StoreError>;

    /// Replace-or-insert a product row.
    fn upsert_product(&self, product: Product) -> Result<(), StoreError>;

    /// Append a sale to the immutable history.
    fn append_sale(&self, sale: SaleEvent) -> Result<(), StoreError>;

    /// Recorded sales for a store, oldest first.
    fn list_sales(&self, store_id: &StoreId) -> Result<Vec<SaleEvent>, StoreError>;
}
