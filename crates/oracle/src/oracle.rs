use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Days;
use serde_json::Value;

use stockline_core::ProductId;

use crate::result::{ForecastPoint, OracleError, ProductRestockSuggestion};
use crate::snapshot::{InventorySnapshot, SalesHistory};

/// External recommendation/forecasting oracle.
///
/// Implementations answer with **raw JSON**; the payload is untrusted until it
/// passes [`crate::validate`]. The trait is async because the production
/// oracle is a networked model call; implementations must fail with
/// [`OracleError::Unavailable`] rather than hang.
#[async_trait]
pub trait RecommendationOracle: Send + Sync + 'static {
    /// "Which products should this store reorder?"
    async fn restock_advice(&self, snapshot: &InventorySnapshot) -> Result<Value, OracleError>;

    /// "How many units will each product sell over the next `horizon_days`?"
    async fn demand_forecast(
        &self,
        history: &SalesHistory,
        horizon_days: u32,
    ) -> Result<Value, OracleError>;
}

/// Deterministic in-process oracle for dev/test wiring.
///
/// Restock advice refills below-threshold rows to threshold plus a fixed
/// buffer; the forecast projects each product's trailing mean daily sales
/// with confidence decaying over the horizon. The point is not intelligence —
/// it is exercising the full advisory path (snapshot out, JSON back,
/// validation in between) without a model endpoint.
#[derive(Debug, Clone)]
pub struct ThresholdRuleOracle {
    /// Units added on top of the threshold gap when suggesting an order.
    buffer: i64,
    /// Days of history assumed when averaging sales into a daily rate.
    window_days: u32,
}

impl ThresholdRuleOracle {
    pub fn new() -> Self {
        Self {
            buffer: 10,
            window_days: 30,
        }
    }

    pub fn with_buffer(mut self, buffer: i64) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days.max(1);
        self
    }
}

impl Default for ThresholdRuleOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecommendationOracle for ThresholdRuleOracle {
    async fn restock_advice(&self, snapshot: &InventorySnapshot) -> Result<Value, OracleError> {
        let suggestions: Vec<ProductRestockSuggestion> = snapshot
            .items
            .iter()
            .filter(|fact| fact.stock_level < fact.min_threshold)
            .map(|fact| ProductRestockSuggestion {
                product_id: fact.product_id.clone(),
                quantity: fact.min_threshold - fact.stock_level + self.buffer,
                reason: Some(format!(
                    "stock {} is below threshold {}",
                    fact.stock_level, fact.min_threshold
                )),
            })
            .collect();

        serde_json::to_value(suggestions).map_err(|e| OracleError::unavailable(e.to_string()))
    }

    async fn demand_forecast(
        &self,
        history: &SalesHistory,
        horizon_days: u32,
    ) -> Result<Value, OracleError> {
        let Some(last_sale) = history.sales.iter().map(|s| s.sold_at).max() else {
            // Nothing to project from; an empty forecast is a valid answer.
            return Ok(Value::Array(Vec::new()));
        };
        let base_date = last_sale.date_naive();

        // Total units per product over the window, keyed in stable order.
        let mut totals: BTreeMap<ProductId, i64> = BTreeMap::new();
        for sale in &history.sales {
            *totals.entry(sale.product_id.clone()).or_insert(0) += sale.quantity;
        }

        let mut points = Vec::new();
        for (product_id, total) in &totals {
            let daily_mean = *total as f64 / f64::from(self.window_days);
            for day in 1..=u64::from(horizon_days) {
                let date = base_date
                    .checked_add_days(Days::new(day))
                    .ok_or_else(|| OracleError::unavailable("forecast date out of range"))?;
                let confidence = (0.95 - 0.02 * (day as f64 - 1.0)).clamp(0.0, 1.0);
                points.push(ForecastPoint {
                    date,
                    product_id: product_id.clone(),
                    predicted_quantity: daily_mean.round() as i64,
                    confidence,
                });
            }
        }

        serde_json::to_value(points).map_err(|e| OracleError::unavailable(e.to_string()))
    }
}
