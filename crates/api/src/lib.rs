//! `stockline-api` — HTTP boundary for the inventory ledger.

pub mod app;
