//! Inventory domain module.
//!
//! This crate contains business rules for the inventory ledger, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod alert;
pub mod product;
pub mod sale;
pub mod stock;

pub use alert::{evaluate_alerts, StockAlert, Urgency, REORDER_BUFFER};
pub use product::Product;
pub use sale::SaleEvent;
pub use stock::{RecordKey, StockRecord};
