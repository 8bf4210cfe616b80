use std::sync::Arc;

use stockline_infra::{InMemoryInventoryStore, LedgerService};
use stockline_oracle::{RecommendationOracle, ThresholdRuleOracle};

/// Shared service handles injected into every handler.
pub struct AppServices {
    ledger: LedgerService<InMemoryInventoryStore>,
    oracle: Arc<dyn RecommendationOracle>,
}

impl AppServices {
    /// Dev/test wiring: in-memory store, deterministic local oracle.
    pub fn in_memory() -> Self {
        Self::with_oracle(Arc::new(ThresholdRuleOracle::new()))
    }

    /// In-memory store behind any oracle implementation.
    pub fn with_oracle(oracle: Arc<dyn RecommendationOracle>) -> Self {
        Self {
            ledger: LedgerService::new(Arc::new(InMemoryInventoryStore::new())),
            oracle,
        }
    }

    pub fn ledger(&self) -> &LedgerService<InMemoryInventoryStore> {
        &self.ledger
    }

    pub fn oracle(&self) -> &Arc<dyn RecommendationOracle> {
        &self.oracle
    }
}
