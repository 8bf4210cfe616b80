//! Keyed storage boundary for the inventory ledger.
//!
//! This module defines an infrastructure-facing abstraction for Product and
//! StockRecord rows (plus the append-only sales history) without making any
//! storage assumptions.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use r#trait::{InventoryStore, StoreError};
