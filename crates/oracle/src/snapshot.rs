use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{ProductId, StoreId};

/// One stock row as presented to the oracle. Mirrors what the ledger knows;
/// carries no advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFact {
    pub product_id: ProductId,
    pub name: String,
    pub stock_level: i64,
    pub min_threshold: i64,
    pub last_updated_by: String,
    pub last_updated_at: DateTime<Utc>,
}

/// Per-store inventory snapshot handed to [`crate::RecommendationOracle::restock_advice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub store_id: StoreId,
    pub items: Vec<InventoryFact>,
}

/// One recorded sale as presented to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFact {
    pub product_id: ProductId,
    pub quantity: i64,
    pub sold_at: DateTime<Utc>,
}

/// Per-store sales history handed to [`crate::RecommendationOracle::demand_forecast`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesHistory {
    pub store_id: StoreId,
    pub sales: Vec<SaleFact>,
}
