//! Infrastructure layer: storage adapters and the ledger service.

pub mod ledger;
pub mod seed;
pub mod store;

pub use ledger::LedgerService;
pub use store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StoreError};
