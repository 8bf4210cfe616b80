//! `stockline-core` — shared ledger building blocks.
//!
//! This crate contains the identifier newtypes and the error taxonomy used by
//! every other crate in the workspace. It carries no storage or HTTP concerns.

pub mod error;
pub mod id;

pub use error::{LedgerError, LedgerResult};
pub use id::{ActorId, ProductId, SaleId, StoreId, SupplierId};
