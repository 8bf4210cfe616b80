use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{ActorId, LedgerError, LedgerResult, ProductId, SaleId, StoreId};

/// Append-only sale fact. Never mutated or deleted once recorded; the sales
/// history is the immutable feed for derived analytics and forecasting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    id: SaleId,
    store_id: StoreId,
    product_id: ProductId,
    quantity: i64,
    sold_at: DateTime<Utc>,
    recorded_by: ActorId,
}

impl SaleEvent {
    /// Record a sale. Quantity must be strictly positive.
    pub fn record(
        store_id: StoreId,
        product_id: ProductId,
        quantity: i64,
        actor: &ActorId,
        sold_at: DateTime<Utc>,
    ) -> LedgerResult<Self> {
        if quantity <= 0 {
            return Err(LedgerError::invalid_operation(format!(
                "sale quantity must be positive (got {quantity})"
            )));
        }

        Ok(Self {
            id: SaleId::new(),
            store_id,
            product_id,
            quantity,
            sold_at,
            recorded_by: actor.clone(),
        })
    }

    /// Reconstruct a row loaded from storage.
    pub fn from_parts(
        id: SaleId,
        store_id: StoreId,
        product_id: ProductId,
        quantity: i64,
        sold_at: DateTime<Utc>,
        recorded_by: ActorId,
    ) -> Self {
        Self {
            id,
            store_id,
            product_id,
            quantity,
            sold_at,
            recorded_by,
        }
    }

    pub fn id(&self) -> SaleId {
        self.id
    }

    pub fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn sold_at(&self) -> DateTime<Utc> {
        self.sold_at
    }

    pub fn recorded_by(&self) -> &ActorId {
        &self.recorded_by
    }
}
