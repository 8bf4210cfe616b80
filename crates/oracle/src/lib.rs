//! `stockline-oracle`
//!
//! **Responsibility:** boundary to the external recommendation/forecasting
//! oracle.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It must not depend on ledger entities (Product/StockRecord/etc); callers
//!   convert rows into the fact types defined here.
//! - It must not mutate ledger state.
//! - Whatever the oracle returns is **untrusted** until it passes shape
//!   validation in [`validate`].

pub mod oracle;
pub mod result;
pub mod snapshot;
pub mod validate;

pub use oracle::{RecommendationOracle, ThresholdRuleOracle};
pub use result::{ForecastPoint, OracleError, ProductRestockSuggestion};
pub use snapshot::{InventoryFact, InventorySnapshot, SaleFact, SalesHistory};
